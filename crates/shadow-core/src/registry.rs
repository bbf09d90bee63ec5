//! Schema registry
//!
//! Caches one [`Schema`] per type, keyed by [`TypeId`]. Capability
//! discovery runs [`Shadowed::schema`] the first time a type is needed and
//! answers from the cache afterwards.

use crate::error::Result;
use crate::schema::{Schema, Shadowed};
use dashmap::DashMap;
use std::any::{Any, TypeId};
use std::sync::Arc;

/// Caller-owned cache of object schemas
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    inner: Arc<DashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
}

impl SchemaRegistry {
    /// Create empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema of `T`, discovered on first use
    #[must_use]
    pub fn schema<T: Shadowed>(&self) -> Arc<Schema<T>> {
        if let Some(cached) = self.get::<T>() {
            return cached;
        }

        let schema = Arc::new(T::schema());
        tracing::debug!(
            "Registered schema for {} ({} members, {} shadowed)",
            schema.type_name(),
            schema.len(),
            schema.eligible_members().count()
        );

        // A concurrent registration may have won; keep whichever landed first.
        let entry = self
            .inner
            .entry(TypeId::of::<T>())
            .or_insert_with(|| schema.clone() as Arc<dyn Any + Send + Sync>)
            .clone();
        entry.downcast::<Schema<T>>().unwrap_or(schema)
    }

    /// Cached schema of `T`, without discovering it
    #[must_use]
    pub fn get<T: Shadowed>(&self) -> Option<Arc<Schema<T>>> {
        self.inner
            .get(&TypeId::of::<T>())
            .and_then(|entry| entry.value().clone().downcast::<Schema<T>>().ok())
    }

    /// Check if `T`'s member carries the shadow capability marker
    ///
    /// # Errors
    /// Returns [`crate::ShadowError::KeyNotFound`] for unknown members
    pub fn is_eligible<T: Shadowed>(&self, member: &str) -> Result<bool> {
        self.schema::<T>().is_eligible(member)
    }

    /// Check if `T` has been discovered
    #[inline]
    #[must_use]
    pub fn contains<T: Shadowed>(&self) -> bool {
        self.inner.contains_key(&TypeId::of::<T>())
    }

    /// Number of discovered types
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if no type has been discovered
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Drop every cached schema
    pub fn clear(&self) {
        self.inner.clear();
    }
}
