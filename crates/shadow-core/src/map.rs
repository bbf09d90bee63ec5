//! Map shadows
//!
//! [`MapShadow`] wraps an insertion-ordered key-value store. Changes are
//! classified from key presence first and value equality second, so a key
//! that is added and then removed again leaves no trace.

use crate::baseline::Snapshot;
use crate::change::{ChangeType, ShadowId, ShadowKind};
use crate::classify::diff_keyed;
use crate::config::{Depth, ShadowConfig};
use crate::error::{Result, ShadowError};
use crate::member::Trackable;
use crate::tracker::{baseline_nested, reset_nested, KeyedTracker, Tracker};
use indexmap::IndexMap;
use std::any::Any;
use std::fmt::{self, Debug, Formatter};
use std::hash::Hash;

/// Bounds required of map keys
pub trait MapKey: Any + Hash + Eq + Clone + Debug {}

impl<K: Any + Hash + Eq + Clone + Debug> MapKey for K {}

/// Change-tracking wrapper around a key-value store
///
/// Two handles are equal when they are the same tracked instance.
#[derive(Clone)]
pub struct MapShadow<K: MapKey, V: Trackable> {
    id: ShadowId,
    entries: IndexMap<K, V>,
    baseline: Snapshot<IndexMap<K, V>>,
    config: ShadowConfig,
}

impl<K: MapKey, V: Trackable> MapShadow<K, V> {
    /// Empty, baselined map with default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ShadowConfig::default())
    }

    /// Empty, baselined map
    #[must_use]
    pub fn with_config(config: ShadowConfig) -> Self {
        Self::from_entries(IndexMap::new(), config)
    }

    /// Baselined map holding `entries`
    #[must_use]
    pub fn from_entries(entries: IndexMap<K, V>, config: ShadowConfig) -> Self {
        let mut shadow = Self {
            id: ShadowId::new(),
            entries,
            baseline: Snapshot::new(),
            config,
        };
        shadow.capture();
        shadow
    }

    /// Add or update an entry, returning the previous value
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        tracing::trace!("Shadow {} insert {:?} = {:?}", self.id, key, value);
        self.entries.insert(key, value)
    }

    /// Add an entry that must not exist yet
    ///
    /// # Errors
    /// Returns [`ShadowError::DuplicateKey`] if `key` is present
    pub fn add(&mut self, key: K, value: V) -> Result<()> {
        if self.entries.contains_key(&key) {
            return Err(ShadowError::DuplicateKey(format!("{key:?}")));
        }
        self.insert(key, value);
        Ok(())
    }

    /// Update an entry that must exist, returning the previous value
    ///
    /// # Errors
    /// Returns [`ShadowError::KeyNotFound`] if `key` is absent
    pub fn update(&mut self, key: &K, value: V) -> Result<V> {
        let slot = self
            .entries
            .get_mut(key)
            .ok_or_else(|| ShadowError::key_not_found(key))?;
        tracing::trace!("Shadow {} update {:?} = {:?}", self.id, key, value);
        Ok(std::mem::replace(slot, value))
    }

    /// Remove an entry, keeping the order of the others
    pub fn remove(&mut self, key: &K) -> Option<V> {
        tracing::trace!("Shadow {} remove {:?}", self.id, key);
        self.entries.shift_remove(key)
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        tracing::trace!("Shadow {} clear ({} entries)", self.id, self.entries.len());
        self.entries.clear();
    }

    /// Value under `key`
    #[inline]
    #[must_use]
    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Mutable value under `key`
    #[inline]
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.entries.get_mut(key)
    }

    /// Check for `key`
    #[inline]
    #[must_use]
    pub fn contains_key(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order
    #[inline]
    pub fn iter(&self) -> indexmap::map::Iter<'_, K, V> {
        self.entries.iter()
    }

    /// Keys in insertion order
    #[inline]
    pub fn keys(&self) -> indexmap::map::Keys<'_, K, V> {
        self.entries.keys()
    }

    /// Values in insertion order
    #[inline]
    pub fn values(&self) -> indexmap::map::Values<'_, K, V> {
        self.entries.values()
    }

    /// Live entries
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &IndexMap<K, V> {
        &self.entries
    }

    /// Classification of every differing key
    ///
    /// Recomputed from baseline and live keys on each call.
    #[must_use]
    pub fn dictionary_changes(&self) -> IndexMap<K, ChangeType> {
        diff_keyed(self.baseline.state(), &self.entries)
    }

    fn capture(&mut self) {
        self.baseline.capture(self.entries.clone());
        tracing::debug!(
            "Baselined map shadow {} ({} entries, generation {})",
            self.id,
            self.entries.len(),
            self.baseline.generation()
        );
    }
}

impl<K: MapKey, V: Trackable> Tracker for MapShadow<K, V> {
    fn shadow_id(&self) -> ShadowId {
        self.id
    }

    fn kind(&self) -> ShadowKind {
        ShadowKind::Map
    }

    fn config(&self) -> &ShadowConfig {
        &self.config
    }

    fn baseline_with(&mut self, depth: Depth) {
        baseline_nested(self, depth);
        self.capture();
    }

    fn reset_with(&mut self, depth: Depth) -> Result<()> {
        // Live values equal to their baseline are kept so nested handles
        // keep their identity and their own pending changes.
        let mut live = std::mem::take(&mut self.entries);
        self.entries = self
            .baseline
            .state()
            .iter()
            .map(|(key, original)| {
                let value = match live.swap_remove(key) {
                    Some(value) if value == *original => value,
                    _ => original.clone(),
                };
                (key.clone(), value)
            })
            .collect();
        tracing::debug!("Reset map shadow {} ({:?})", self.id, depth);
        reset_nested(self, depth)
    }

    fn has_own_changes(&self) -> bool {
        let baseline = self.baseline.state();
        baseline.len() != self.entries.len()
            || baseline
                .iter()
                .any(|(key, original)| self.entries.get(key) != Some(original))
    }

    fn list_changes(&self) -> String {
        let baseline = self.baseline.state();
        self.dictionary_changes()
            .iter()
            .map(|(key, change)| match change {
                ChangeType::Add => format!("{:?}: {:?} (Add)", key, self.entries[key]),
                ChangeType::Remove => format!("{:?}: {:?} (Remove)", key, baseline[key]),
                ChangeType::Edit => format!(
                    "{:?}: {:?} -> {:?} (Edit)",
                    key, baseline[key], self.entries[key]
                ),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn generation(&self) -> u64 {
        self.baseline.generation()
    }

    fn visit_nested(&self, visit: &mut dyn FnMut(&dyn Tracker)) {
        for value in self.entries.values() {
            if let Some(tracker) = value.tracker() {
                visit(tracker);
            }
        }
    }

    fn visit_nested_mut(&mut self, visit: &mut dyn FnMut(&mut dyn Tracker)) {
        for value in self.entries.values_mut() {
            if let Some(tracker) = value.tracker_mut() {
                visit(tracker);
            }
        }
    }
}

impl<K: MapKey, V: Trackable> KeyedTracker for MapShadow<K, V> {
    type Key = K;
    type Value = V;
    type Original = IndexMap<K, V>;

    fn has_change(&self, key: &K) -> bool {
        self.baseline.state().get(key) != self.entries.get(key)
    }

    fn original(&self) -> Result<IndexMap<K, V>> {
        Ok(self.baseline.state().clone())
    }

    fn original_value(&self, key: &K) -> Result<V> {
        self.baseline
            .state()
            .get(key)
            .cloned()
            .ok_or_else(|| ShadowError::key_not_found(key))
    }

    /// Restore one baseline key, re-inserting it at its baseline position
    /// if it was removed
    fn reset_key(&mut self, key: &K) -> Result<()> {
        let (position, _, original) = self
            .baseline
            .state()
            .get_full(key)
            .ok_or_else(|| ShadowError::key_not_found(key))?;

        match self.entries.get_mut(key) {
            Some(value) if value == original => {}
            Some(value) => *value = original.clone(),
            None => {
                let at = position.min(self.entries.len());
                self.entries.shift_insert(at, key.clone(), original.clone());
            }
        }
        Ok(())
    }
}

impl<K: MapKey, V: Trackable> Trackable for MapShadow<K, V> {
    fn tracker(&self) -> Option<&dyn Tracker> {
        Some(self)
    }

    fn tracker_mut(&mut self) -> Option<&mut dyn Tracker> {
        Some(self)
    }

    fn copy_member(&self, config: ShadowConfig) -> Result<Self> {
        crate::copy::copy_map(&self.entries, config)
    }
}

impl<K: MapKey, V: Trackable> Default for MapShadow<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: MapKey, V: Trackable> FromIterator<(K, V)> for MapShadow<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(iter.into_iter().collect(), ShadowConfig::default())
    }
}

impl<K: MapKey, V: Trackable> Extend<(K, V)> for MapShadow<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<'a, K: MapKey, V: Trackable> IntoIterator for &'a MapShadow<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = indexmap::map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K: MapKey, V: Trackable> PartialEq for MapShadow<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<K: MapKey, V: Trackable> Debug for MapShadow<K, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapShadow")
            .field("id", &self.id)
            .field("entries", &self.entries)
            .field("generation", &self.baseline.generation())
            .finish()
    }
}
