//! Shadow configuration
//!
//! [`ShadowConfig`] selects the cascading depth of baseline/reset and the
//! correlation policy used to diff collections. Handles keep a copy of the
//! configuration they were created with.

use crate::error::{Result, ShadowError};
use serde::{Deserialize, Serialize};

/// How far an operation reaches into nested shadow members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Depth {
    /// Only the handle's own keys
    #[default]
    Shallow,

    /// The handle's own keys, then every nested shadow member recursively
    Deep,
}

/// Policy used to correlate baseline and current collection elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Correlation {
    /// Greedy value-equality matching; position changes are not changes
    #[default]
    Multiset,

    /// Index-by-index comparison; a differing element is an edit
    Positional,
}

/// Configuration carried by every shadow handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowConfig {
    /// Depth used by `reset_to_original()`
    pub reset_depth: Depth,
    /// Depth used by `baseline()`
    pub baseline_depth: Depth,
    /// Collection diff policy
    pub correlation: Correlation,
}

impl ShadowConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With reset depth
    #[inline]
    #[must_use]
    pub fn with_reset_depth(mut self, depth: Depth) -> Self {
        self.reset_depth = depth;
        self
    }

    /// With baseline depth
    #[inline]
    #[must_use]
    pub fn with_baseline_depth(mut self, depth: Depth) -> Self {
        self.baseline_depth = depth;
        self
    }

    /// With collection correlation policy
    #[inline]
    #[must_use]
    pub fn with_correlation(mut self, correlation: Correlation) -> Self {
        self.correlation = correlation;
        self
    }

    /// Parse configuration from a TOML document
    ///
    /// Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`ShadowError::Config`] if the document is not valid TOML or
    /// holds unknown policy names.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| ShadowError::Config(e.to_string()))
    }
}
