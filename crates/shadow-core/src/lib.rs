//! Shadow Core
//!
//! Change-tracking wrappers ("shadows") for structured values, ordered
//! collections and key-value maps.
//!
//! # Core Concepts
//!
//! - [`ObjectShadow<T>`]: tracks the members of a [`Shadowed`] struct by name
//! - [`CollectionShadow<E>`]: tracks an ordered sequence by element presence
//! - [`MapShadow<K, V>`]: tracks a key-value store by key presence and value
//! - [`Tracker`] / [`KeyedTracker`]: the uniform tracking API on every handle
//! - [`ShadowFactory`]: caller-owned entry point holding the schema cache
//!
//! Every handle keeps a baseline. Queries compare the live state against
//! it, and resets restore it.
//!
//! # Example
//!
//! ```rust
//! use shadow_core::prelude::*;
//!
//! #[derive(Debug, Clone, Default)]
//! struct Customer {
//!     name: String,
//!     tags: Option<CollectionShadow<String>>,
//! }
//!
//! shadow_core::shadow_schema! {
//!     Customer {
//!         name,
//!         #[shadowed] tags,
//!     }
//! }
//!
//! let factory = ShadowFactory::new();
//! let mut customer = factory.wrap(Customer {
//!     name: "Alice".to_string(),
//!     tags: None,
//! });
//!
//! customer.name = "Bob".to_string();
//! assert!(customer.has_change("name"));
//!
//! customer.reset_to_original().unwrap();
//! assert_eq!(customer.name, "Alice");
//! assert!(!customer.has_changes());
//! ```

#![warn(unreachable_pub)]

// Core modules
mod baseline;
mod change;
mod classify;
mod collection;
mod config;
mod copy;
mod error;
mod factory;
mod map;
mod member;
mod object;
mod registry;
mod schema;
mod tracker;

// Re-exports
pub use baseline::Snapshot;
pub use change::{ChangeType, ElementChange, PropertyChange, ShadowId, ShadowKind};
pub use classify::{classify_member, correlate, diff_keyed, SequenceChange};
pub use collection::CollectionShadow;
pub use config::{Correlation, Depth, ShadowConfig};
pub use copy::{copy_collection, copy_map, copy_object};
pub use error::{Result, ShadowError};
pub use factory::ShadowFactory;
pub use map::{MapKey, MapShadow};
pub use member::{AnyMember, MemberValue, Trackable};
pub use object::ObjectShadow;
pub use registry::SchemaRegistry;
pub use schema::{Getter, GetterMut, MemberDef, Schema, Shadowed};
pub use tracker::{KeyedTracker, Tracker};

/// Commonly used items
pub mod prelude {
    pub use crate::{
        ChangeType, CollectionShadow, Depth, KeyedTracker, MapShadow, ObjectShadow, ShadowConfig,
        ShadowError, ShadowFactory, ShadowKind, Shadowed, Trackable, Tracker,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
