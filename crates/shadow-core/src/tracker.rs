//! Uniform tracking API
//!
//! [`Tracker`] is object-safe so nested shadow members of any kind can be
//! reached through `&dyn Tracker`. [`KeyedTracker`] adds the per-key
//! operations whose key and value types depend on the shadow kind.

use crate::change::{ShadowId, ShadowKind};
use crate::config::{Depth, ShadowConfig};
use crate::error::Result;

/// Tracking operations available on every shadow handle
pub trait Tracker {
    /// Identity of this handle
    fn shadow_id(&self) -> ShadowId;

    /// Shape of this handle
    fn kind(&self) -> ShadowKind;

    /// Configuration this handle was created with
    fn config(&self) -> &ShadowConfig;

    /// Capture a fresh baseline, replacing the previous one
    fn baseline_with(&mut self, depth: Depth);

    /// Restore every tracked key to its baseline value
    ///
    /// # Errors
    /// Returns error if a restored value is rejected by its member
    fn reset_with(&mut self, depth: Depth) -> Result<()>;

    /// Check this handle's own keys against the baseline
    fn has_own_changes(&self) -> bool;

    /// Human-readable enumeration of every differing key
    ///
    /// Empty when nothing differs.
    fn list_changes(&self) -> String;

    /// Number of times a baseline has been captured
    fn generation(&self) -> u64;

    /// Check for changes, optionally including nested shadow members
    fn has_changes_with(&self, depth: Depth) -> bool {
        if self.has_own_changes() {
            return true;
        }
        match depth {
            Depth::Shallow => false,
            Depth::Deep => {
                let mut nested = false;
                self.visit_nested(&mut |child| {
                    nested = nested || child.has_changes_with(Depth::Deep);
                });
                nested
            }
        }
    }

    /// Visit every directly nested shadow member
    fn visit_nested(&self, visit: &mut dyn FnMut(&dyn Tracker));

    /// Visit every directly nested shadow member mutably
    fn visit_nested_mut(&mut self, visit: &mut dyn FnMut(&mut dyn Tracker));

    /// Capture a fresh baseline using the configured depth
    fn baseline(&mut self) {
        let depth = self.config().baseline_depth;
        self.baseline_with(depth);
    }

    /// Restore the baseline using the configured depth
    ///
    /// # Errors
    /// Returns error if a restored value is rejected by its member
    fn reset_to_original(&mut self) -> Result<()> {
        let depth = self.config().reset_depth;
        self.reset_with(depth)
    }

    /// Check this handle's own keys against the baseline
    fn has_changes(&self) -> bool {
        self.has_changes_with(Depth::Shallow)
    }
}

/// Per-key tracking operations
pub trait KeyedTracker: Tracker {
    /// Key addressing one tracked entry
    type Key: ?Sized;

    /// Value stored under a key
    type Value;

    /// Full value rebuilt from the baseline
    type Original;

    /// Check a single key against the baseline
    fn has_change(&self, key: &Self::Key) -> bool;

    /// Rebuild the whole value from the baseline, leaving current state alone
    ///
    /// # Errors
    /// Returns error if a baseline value is rejected by its member
    fn original(&self) -> Result<Self::Original>;

    /// Baseline value for one key
    ///
    /// # Errors
    /// Returns [`crate::ShadowError::KeyNotFound`] if the key was never
    /// captured in the baseline
    fn original_value(&self, key: &Self::Key) -> Result<Self::Value>;

    /// Restore one key to its baseline value
    ///
    /// # Errors
    /// Returns [`crate::ShadowError::KeyNotFound`] if the key was never
    /// captured in the baseline
    fn reset_key(&mut self, key: &Self::Key) -> Result<()>;
}

/// Cascade a baseline into nested members ahead of the handle's own capture
pub(crate) fn baseline_nested(tracker: &mut dyn Tracker, depth: Depth) {
    if depth == Depth::Deep {
        tracker.visit_nested_mut(&mut |child| child.baseline_with(Depth::Deep));
    }
}

/// Cascade a reset into nested members after the handle's own restore
pub(crate) fn reset_nested(tracker: &mut dyn Tracker, depth: Depth) -> Result<()> {
    if depth == Depth::Shallow {
        return Ok(());
    }
    let mut outcome = Ok(());
    tracker.visit_nested_mut(&mut |child| {
        if outcome.is_ok() {
            outcome = child.reset_with(Depth::Deep);
        }
    });
    outcome
}
