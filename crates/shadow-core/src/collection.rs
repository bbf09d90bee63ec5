//! Collection shadows
//!
//! [`CollectionShadow`] wraps an ordered sequence. Positions shift under
//! insert and remove, so changes are derived by correlating the baseline
//! with the live sequence under the configured [`Correlation`] policy.
//!
//! [`Correlation`]: crate::Correlation

use crate::baseline::Snapshot;
use crate::change::{ChangeType, ElementChange, ShadowId, ShadowKind};
use crate::classify::{correlate, SequenceChange};
use crate::config::{Depth, ShadowConfig};
use crate::error::{Result, ShadowError};
use crate::member::Trackable;
use crate::tracker::{baseline_nested, reset_nested, KeyedTracker, Tracker};
use std::fmt::{self, Debug, Formatter};
use std::ops::Deref;

/// Change-tracking wrapper around an ordered sequence
///
/// Two handles are equal when they are the same tracked instance.
#[derive(Clone)]
pub struct CollectionShadow<E: Trackable> {
    id: ShadowId,
    items: Vec<E>,
    baseline: Snapshot<Vec<E>>,
    config: ShadowConfig,
}

impl<E: Trackable> CollectionShadow<E> {
    /// Empty, baselined collection with default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ShadowConfig::default())
    }

    /// Empty, baselined collection
    #[must_use]
    pub fn with_config(config: ShadowConfig) -> Self {
        Self::from_items(Vec::new(), config)
    }

    /// Baselined collection holding `items`
    #[must_use]
    pub fn from_items(items: Vec<E>, config: ShadowConfig) -> Self {
        let mut shadow = Self {
            id: ShadowId::new(),
            items,
            baseline: Snapshot::new(),
            config,
        };
        shadow.capture();
        shadow
    }

    /// Append an element
    pub fn push(&mut self, item: E) {
        tracing::trace!("Shadow {} push {:?}", self.id, item);
        self.items.push(item);
    }

    /// Insert an element at `index`, shifting later elements
    ///
    /// # Errors
    /// Returns [`ShadowError::IndexOutOfRange`] if `index > len`
    pub fn insert(&mut self, index: usize, item: E) -> Result<()> {
        self.check_index(index, self.items.len() + 1)?;
        tracing::trace!("Shadow {} insert [{}] {:?}", self.id, index, item);
        self.items.insert(index, item);
        Ok(())
    }

    /// Remove and return the element at `index`
    ///
    /// # Errors
    /// Returns [`ShadowError::IndexOutOfRange`] if `index >= len`
    pub fn remove(&mut self, index: usize) -> Result<E> {
        self.check_index(index, self.items.len())?;
        tracing::trace!("Shadow {} remove [{}]", self.id, index);
        Ok(self.items.remove(index))
    }

    /// Remove the first element equal to `item`
    ///
    /// Returns whether an element was removed.
    pub fn remove_item(&mut self, item: &E) -> bool {
        match self.items.iter().position(|e| e == item) {
            Some(index) => {
                tracing::trace!("Shadow {} remove {:?}", self.id, item);
                self.items.remove(index);
                true
            }
            None => false,
        }
    }

    /// Replace the element at `index`, returning the previous one
    ///
    /// # Errors
    /// Returns [`ShadowError::IndexOutOfRange`] if `index >= len`
    pub fn set(&mut self, index: usize, item: E) -> Result<E> {
        self.check_index(index, self.items.len())?;
        tracing::trace!("Shadow {} set [{}] {:?}", self.id, index, item);
        Ok(std::mem::replace(&mut self.items[index], item))
    }

    /// Remove every element
    pub fn clear(&mut self) {
        tracing::trace!("Shadow {} clear ({} elements)", self.id, self.items.len());
        self.items.clear();
    }

    /// Mutable access to one element
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut E> {
        self.items.get_mut(index)
    }

    /// Live elements
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[E] {
        &self.items
    }

    /// Baseline elements
    #[inline]
    #[must_use]
    pub fn original_items(&self) -> &[E] {
        self.baseline.state()
    }

    /// Baseline element at `index`
    ///
    /// # Errors
    /// Returns [`ShadowError::KeyNotFound`] if the baseline has no such position
    pub fn original_at(&self, index: usize) -> Result<&E> {
        self.baseline
            .state()
            .get(index)
            .ok_or_else(|| ShadowError::key_not_found(&index))
    }

    /// Every differing element; removes first, then adds and edits
    #[must_use]
    pub fn changes(&self) -> Vec<ElementChange<E>> {
        let baseline = self.baseline.state();
        self.correlated()
            .into_iter()
            .filter_map(|c| match (c.baseline_index, c.current_index) {
                (Some(bi), None) => Some(ElementChange {
                    index: bi,
                    change: ChangeType::Remove,
                    element: baseline[bi].clone(),
                    previous: None,
                }),
                (None, Some(ci)) => Some(ElementChange {
                    index: ci,
                    change: ChangeType::Add,
                    element: self.items[ci].clone(),
                    previous: None,
                }),
                (Some(bi), Some(ci)) => Some(ElementChange {
                    index: ci,
                    change: ChangeType::Edit,
                    element: self.items[ci].clone(),
                    previous: Some(baseline[bi].clone()),
                }),
                (None, None) => None,
            })
            .collect()
    }

    /// Classification of the first change involving `item`
    #[must_use]
    pub fn change_of(&self, item: &E) -> Option<ChangeType> {
        self.changes()
            .into_iter()
            .find(|c| c.element == *item || c.previous.as_ref() == Some(item))
            .map(|c| c.change)
    }

    fn correlated(&self) -> Vec<SequenceChange> {
        correlate(self.baseline.state(), &self.items, self.config.correlation)
    }

    fn check_index(&self, index: usize, bound: usize) -> Result<()> {
        if index < bound {
            Ok(())
        } else {
            Err(ShadowError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    fn capture(&mut self) {
        self.baseline.capture(self.items.clone());
        tracing::debug!(
            "Baselined collection shadow {} ({} elements, generation {})",
            self.id,
            self.items.len(),
            self.baseline.generation()
        );
    }
}

impl<E: Trackable> Tracker for CollectionShadow<E> {
    fn shadow_id(&self) -> ShadowId {
        self.id
    }

    fn kind(&self) -> ShadowKind {
        ShadowKind::Collection
    }

    fn config(&self) -> &ShadowConfig {
        &self.config
    }

    fn baseline_with(&mut self, depth: Depth) {
        baseline_nested(self, depth);
        self.capture();
    }

    fn reset_with(&mut self, depth: Depth) -> Result<()> {
        // Reuse live elements equal to baseline ones so nested handles keep
        // their identity and their own pending changes.
        let mut pool: Vec<Option<E>> = std::mem::take(&mut self.items).into_iter().map(Some).collect();
        self.items = self
            .baseline
            .state()
            .iter()
            .map(|original| {
                pool.iter_mut()
                    .find(|slot| matches!(slot, Some(item) if item == original))
                    .and_then(Option::take)
                    .unwrap_or_else(|| original.clone())
            })
            .collect();
        tracing::debug!("Reset collection shadow {} ({:?})", self.id, depth);
        reset_nested(self, depth)
    }

    fn has_own_changes(&self) -> bool {
        !self.correlated().is_empty()
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
        for item in &self.items {
            if let Some(tracker) = item.tracker() {
                visit(tracker);
            }
        }
    }

    fn visit_nested_mut(&mut self, visit: &mut dyn FnMut(&mut dyn Tracker)) {
        for item in &mut self.items {
            if let Some(tracker) = item.tracker_mut() {
                visit(tracker);
            }
        }
    }
}

impl<E: Trackable> KeyedTracker for CollectionShadow<E> {
    type Key = E;
    type Value = E;
    type Original = Vec<E>;

    fn has_change(&self, key: &E) -> bool {
        self.change_of(key).is_some()
    }

    fn original(&self) -> Result<Vec<E>> {
        Ok(self.baseline.state().clone())
    }

    fn original_value(&self, key: &E) -> Result<E> {
        self.baseline
            .state()
            .iter()
            .find(|e| *e == key)
            .cloned()
            .ok_or_else(|| ShadowError::key_not_found(key))
    }

    /// Revert one change involving `key`
    ///
    /// An extra live occurrence is removed, a missing occurrence is
    /// re-inserted at its baseline position, an edited slot is restored.
    fn reset_key(&mut self, key: &E) -> Result<()> {
        self.original_value(key)?;
        let baseline = self.baseline.state();
        let changes = self.correlated();

        let added = changes
            .iter()
            .rev()
            .filter(|c| c.change == ChangeType::Add)
            .filter_map(|c| c.current_index)
            .find(|&ci| self.items[ci] == *key);
        if let Some(ci) = added {
            self.items.remove(ci);
            return Ok(());
        }

        let removed = changes
            .iter()
            .filter(|c| c.change == ChangeType::Remove)
            .filter_map(|c| c.baseline_index)
            .find(|&bi| baseline[bi] == *key);
        if let Some(bi) = removed {
            let at = bi.min(self.items.len());
            self.items.insert(at, baseline[bi].clone());
            return Ok(());
        }

        let edited = changes.iter().find_map(|c| match (c.baseline_index, c.current_index) {
            (Some(bi), Some(ci)) if baseline[bi] == *key || self.items[ci] == *key => Some((bi, ci)),
            _ => None,
        });
        if let Some((bi, ci)) = edited {
            self.items[ci] = baseline[bi].clone();
        }
        Ok(())
    }
}

impl<E: Trackable> Trackable for CollectionShadow<E> {
    fn tracker(&self) -> Option<&dyn Tracker> {
        Some(self)
    }

    fn tracker_mut(&mut self) -> Option<&mut dyn Tracker> {
        Some(self)
    }

    fn copy_member(&self, config: ShadowConfig) -> Result<Self> {
        crate::copy::copy_collection(&self.items, config)
    }
}

impl<E: Trackable> Default for CollectionShadow<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Trackable> From<Vec<E>> for CollectionShadow<E> {
    fn from(items: Vec<E>) -> Self {
        Self::from_items(items, ShadowConfig::default())
    }
}

impl<E: Trackable> FromIterator<E> for CollectionShadow<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<E: Trackable> Extend<E> for CollectionShadow<E> {
    fn extend<I: IntoIterator<Item = E>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

impl<'a, E: Trackable> IntoIterator for &'a CollectionShadow<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<E: Trackable> Deref for CollectionShadow<E> {
    type Target = [E];

    fn deref(&self) -> &[E] {
        &self.items
    }
}

impl<E: Trackable> PartialEq for CollectionShadow<E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<E: Trackable> Debug for CollectionShadow<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionShadow")
            .field("id", &self.id)
            .field("items", &self.items)
            .field("generation", &self.baseline.generation())
            .finish()
    }
}
