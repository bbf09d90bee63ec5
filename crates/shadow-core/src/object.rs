//! Object shadows
//!
//! [`ObjectShadow`] owns a live value of a [`Shadowed`] type and a snapshot
//! of its members. Diffing is lazy: queries compare live members to the
//! snapshot, so no operation log is kept.

use crate::baseline::Snapshot;
use crate::change::{ChangeType, PropertyChange, ShadowId, ShadowKind};
use crate::classify::classify_member;
use crate::config::{Depth, ShadowConfig};
use crate::error::{Result, ShadowError};
use crate::member::{AnyMember, MemberValue, Trackable};
use crate::schema::{Schema, Shadowed};
use crate::tracker::{baseline_nested, reset_nested, KeyedTracker, Tracker};
use indexmap::IndexMap;
use std::fmt::{self, Debug, Formatter};
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

/// Change-tracking wrapper around a structured value
///
/// Reads and direct writes go through `Deref`/`DerefMut`. Writes by member
/// name go through [`ObjectShadow::set_value`], the same path used by
/// [`KeyedTracker::reset_key`].
///
/// Two handles are equal when they are the same tracked instance.
#[derive(Clone)]
pub struct ObjectShadow<T: Shadowed> {
    id: ShadowId,
    current: T,
    schema: Arc<Schema<T>>,
    baseline: Snapshot<IndexMap<&'static str, MemberValue>>,
    config: ShadowConfig,
}

impl<T: Shadowed> ObjectShadow<T> {
    /// Wrap a value without capturing a baseline
    ///
    /// Until [`Tracker::baseline`] is called no member is tracked, so the
    /// handle reports no changes.
    #[must_use]
    pub fn wrap(current: T, schema: Arc<Schema<T>>, config: ShadowConfig) -> Self {
        Self {
            id: ShadowId::new(),
            current,
            schema,
            baseline: Snapshot::new(),
            config,
        }
    }

    /// Wrap a value and capture its baseline
    #[must_use]
    pub fn create(current: T, schema: Arc<Schema<T>>, config: ShadowConfig) -> Self {
        let mut shadow = Self::wrap(current, schema, config);
        shadow.capture();
        shadow
    }

    /// Live value
    #[inline]
    #[must_use]
    pub fn current(&self) -> &T {
        &self.current
    }

    /// Unwrap the live value, discarding tracking state
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> T {
        self.current
    }

    /// Schema of the wrapped type
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema<T>> {
        &self.schema
    }

    /// Live member by name
    ///
    /// # Errors
    /// Returns [`ShadowError::KeyNotFound`] for unknown members
    pub fn member(&self, name: &str) -> Result<&dyn AnyMember> {
        Ok(self.schema.lookup(name)?.get(&self.current))
    }

    /// Live member by name, as a concrete type
    ///
    /// # Errors
    /// Returns [`ShadowError::KeyNotFound`] for unknown members and
    /// [`ShadowError::TypeMismatch`] if the member is not a `V`
    pub fn get<V: Trackable>(&self, name: &str) -> Result<&V> {
        let member = self.member(name)?;
        member
            .as_any()
            .downcast_ref::<V>()
            .ok_or_else(|| ShadowError::TypeMismatch {
                member: name.to_string(),
                expected: std::any::type_name::<V>(),
                actual: member.member_type_name(),
            })
    }

    /// Write a member by name
    ///
    /// # Errors
    /// Returns [`ShadowError::KeyNotFound`] for unknown members and
    /// [`ShadowError::TypeMismatch`] if the member is not a `V`
    pub fn set<V: Trackable>(&mut self, name: &str, value: V) -> Result<()> {
        self.set_value(name, MemberValue::new(value))
    }

    /// Write an erased value to a member by name
    ///
    /// # Errors
    /// Returns [`ShadowError::KeyNotFound`] for unknown members and
    /// [`ShadowError::TypeMismatch`] if the value's type differs from the
    /// member's
    pub fn set_value(&mut self, name: &str, value: MemberValue) -> Result<()> {
        let def = self.schema.lookup(name)?;
        tracing::trace!("Shadow {} write {}.{} = {:?}", self.id, self.schema.type_name(), name, value);
        def.get_mut(&mut self.current).assign(name, value)
    }

    /// Every differing member, in baseline order
    #[must_use]
    pub fn changes(&self) -> Vec<PropertyChange> {
        self.diff()
            .map(|(name, original, current, change)| PropertyChange {
                name,
                original: original.clone(),
                current: current.clone_member(),
                change,
            })
            .collect()
    }

    /// Classification of every differing member
    #[must_use]
    pub fn change_types(&self) -> IndexMap<&'static str, ChangeType> {
        self.diff().map(|(name, _, _, change)| (name, change)).collect()
    }

    /// Baseline value of a member, as a concrete type
    ///
    /// # Errors
    /// Returns [`ShadowError::KeyNotFound`] if the member was never captured
    /// and [`ShadowError::TypeMismatch`] if it is not a `V`
    pub fn original_as<V: Trackable>(&self, name: &str) -> Result<V> {
        self.original_value(name)?.downcast_for(name)
    }

    /// Tracking API of a nested shadow member
    ///
    /// # Errors
    /// Returns [`ShadowError::KeyNotFound`] for unknown members and
    /// [`ShadowError::InvalidArgument`] if the member holds no shadow
    pub fn member_tracker(&self, name: &str) -> Result<&dyn Tracker> {
        let member = self.member(name)?;
        member.as_tracker().ok_or_else(|| not_a_shadow(name, member))
    }

    /// Mutable tracking API of a nested shadow member
    ///
    /// # Errors
    /// Returns [`ShadowError::KeyNotFound`] for unknown members and
    /// [`ShadowError::InvalidArgument`] if the member holds no shadow
    pub fn member_tracker_mut(&mut self, name: &str) -> Result<&mut dyn Tracker> {
        let def = self.schema.lookup(name)?;
        let member = def.get_mut(&mut self.current);
        if member.as_tracker().is_none() {
            return Err(not_a_shadow(name, member));
        }
        member
            .as_tracker_mut()
            .ok_or_else(|| ShadowError::InvalidArgument(name.to_string()))
    }

    fn capture(&mut self) {
        let state = self
            .schema
            .members()
            .map(|def| (def.name(), def.get(&self.current).clone_member()))
            .collect();
        self.baseline.capture(state);
        tracing::debug!(
            "Baselined {} shadow {} (generation {})",
            self.schema.type_name(),
            self.id,
            self.baseline.generation()
        );
    }

    fn diff(&self) -> impl Iterator<Item = (&'static str, &MemberValue, &dyn AnyMember, ChangeType)> + '_ {
        self.baseline.state().iter().filter_map(move |(&name, original)| {
            let current = self.schema.lookup(name).ok()?.get(&self.current);
            classify_member(original.as_member(), current).map(|change| (name, original, current, change))
        })
    }
}

fn not_a_shadow(name: &str, member: &dyn AnyMember) -> ShadowError {
    ShadowError::InvalidArgument(format!(
        "member '{}' holds {}, not a shadow",
        name,
        member.member_type_name()
    ))
}

impl<T: Shadowed> Tracker for ObjectShadow<T> {
    fn shadow_id(&self) -> ShadowId {
        self.id
    }

    fn kind(&self) -> ShadowKind {
        ShadowKind::Object
    }

    fn config(&self) -> &ShadowConfig {
        &self.config
    }

    fn baseline_with(&mut self, depth: Depth) {
        // Nested first, so the captured member handles carry fresh baselines.
        baseline_nested(self, depth);
        self.capture();
    }

    fn reset_with(&mut self, depth: Depth) -> Result<()> {
        let differing: Vec<&'static str> = self.diff().map(|(name, ..)| name).collect();
        for name in differing {
            let original = self.original_value(name)?;
            self.set_value(name, original)?;
        }
        tracing::debug!("Reset {} shadow {} ({:?})", self.schema.type_name(), self.id, depth);
        reset_nested(self, depth)
    }

    fn has_own_changes(&self) -> bool {
        self.diff().next().is_some()
    }

    fn list_changes(&self) -> String {
        self.changes()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn generation(&self) -> u64 {
        self.baseline.generation()
    }

    fn visit_nested(&self, visit: &mut dyn FnMut(&dyn Tracker)) {
        for def in self.schema.eligible_members() {
            if let Some(tracker) = def.get(&self.current).as_tracker() {
                visit(tracker);
            }
        }
    }

    fn visit_nested_mut(&mut self, visit: &mut dyn FnMut(&mut dyn Tracker)) {
        let schema = Arc::clone(&self.schema);
        for def in schema.eligible_members() {
            if let Some(tracker) = def.get_mut(&mut self.current).as_tracker_mut() {
                visit(tracker);
            }
        }
    }
}

impl<T: Shadowed> KeyedTracker for ObjectShadow<T> {
    type Key = str;
    type Value = MemberValue;
    type Original = T;

    fn has_change(&self, key: &str) -> bool {
        self.diff().any(|(name, ..)| name == key)
    }

    fn original(&self) -> Result<T> {
        let mut target = T::default();
        for (&name, value) in self.baseline.state() {
            self.schema
                .lookup(name)?
                .get_mut(&mut target)
                .assign(name, value.clone())?;
        }
        Ok(target)
    }

    fn original_value(&self, key: &str) -> Result<MemberValue> {
        self.baseline
            .state()
            .get(key)
            .cloned()
            .ok_or_else(|| ShadowError::KeyNotFound(format!("{}.{}", self.schema.type_name(), key)))
    }

    fn reset_key(&mut self, key: &str) -> Result<()> {
        let original = self.original_value(key)?;
        if self.has_change(key) {
            self.set_value(key, original)?;
        }
        Ok(())
    }
}

impl<T: Shadowed> Trackable for ObjectShadow<T> {
    fn tracker(&self) -> Option<&dyn Tracker> {
        Some(self)
    }

    fn tracker_mut(&mut self) -> Option<&mut dyn Tracker> {
        Some(self)
    }

    fn copy_member(&self, config: ShadowConfig) -> Result<Self> {
        crate::copy::copy_object(&self.current, Arc::clone(&self.schema), config)
    }
}

impl<T: Shadowed> PartialEq for ObjectShadow<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T: Shadowed> Deref for ObjectShadow<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.current
    }
}

impl<T: Shadowed> DerefMut for ObjectShadow<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.current
    }
}

impl<T: Shadowed> Debug for ObjectShadow<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectShadow")
            .field("id", &self.id)
            .field("current", &self.current)
            .field("generation", &self.baseline.generation())
            .finish()
    }
}
