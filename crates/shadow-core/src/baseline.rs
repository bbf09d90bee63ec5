//! Baseline store
//!
//! A [`Snapshot`] holds the state captured at baseline time. It never
//! changes except through [`Snapshot::capture`], which replaces it whole.

/// Captured baseline state with a capture counter
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Snapshot<S> {
    state: S,
    generation: u64,
}

impl<S: Default> Snapshot<S> {
    /// Empty, never-captured snapshot
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: S::default(),
            generation: 0,
        }
    }
}

impl<S> Snapshot<S> {
    /// Replace the snapshot with freshly captured state
    #[inline]
    pub fn capture(&mut self, state: S) {
        self.state = state;
        self.generation += 1;
    }

    /// Captured state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Number of captures so far (0 = never captured)
    #[inline]
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Check if a baseline has been captured
    #[inline]
    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.generation > 0
    }
}
