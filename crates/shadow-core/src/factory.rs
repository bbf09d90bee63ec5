//! Shadow creation entry points
//!
//! [`ShadowFactory`] is owned by the caller and passed where shadows are
//! created. It holds the schema cache and the configuration handed to
//! every shadow it builds.

use crate::collection::CollectionShadow;
use crate::config::ShadowConfig;
use crate::copy::{copy_collection, copy_map, copy_object};
use crate::error::Result;
use crate::map::{MapKey, MapShadow};
use crate::member::Trackable;
use crate::object::ObjectShadow;
use crate::registry::SchemaRegistry;
use crate::schema::{Schema, Shadowed};
use std::sync::Arc;

/// Caller-owned factory for all three shadow kinds
#[derive(Debug, Clone, Default)]
pub struct ShadowFactory {
    registry: SchemaRegistry,
    config: ShadowConfig,
}

impl ShadowFactory {
    /// Create factory with default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create factory with custom configuration
    #[must_use]
    pub fn with_config(config: ShadowConfig) -> Self {
        Self {
            registry: SchemaRegistry::new(),
            config,
        }
    }

    /// Share an existing schema cache
    #[must_use]
    pub fn with_registry(mut self, registry: SchemaRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Clean, baselined shadow of `T::default()`
    #[must_use]
    pub fn create<T: Shadowed>(&self) -> ObjectShadow<T> {
        self.wrap(T::default())
    }

    /// Clean, baselined shadow of `value`
    ///
    /// Nested members are taken as they are; use
    /// [`ShadowFactory::copy_into`] to give them fresh identities.
    #[must_use]
    pub fn wrap<T: Shadowed>(&self, value: T) -> ObjectShadow<T> {
        ObjectShadow::create(value, self.registry.schema::<T>(), self.config)
    }

    /// Empty map shadow
    #[must_use]
    pub fn create_map<K: MapKey, V: Trackable>(&self) -> MapShadow<K, V> {
        MapShadow::with_config(self.config)
    }

    /// Empty collection shadow
    #[must_use]
    pub fn create_collection<E: Trackable>(&self) -> CollectionShadow<E> {
        CollectionShadow::with_config(self.config)
    }

    /// Recursively shadowed copy of `source`
    ///
    /// # Errors
    /// Returns [`crate::ShadowError::TypeMismatch`] if an eligible member
    /// does not hold a shadow handle
    pub fn copy_into<T: Shadowed>(&self, source: &T) -> Result<ObjectShadow<T>> {
        copy_object(source, self.registry.schema::<T>(), self.config)
    }

    /// Recursively shadowed copy of a key-value source
    ///
    /// # Errors
    /// Returns error if a nested shadow value cannot be copied
    pub fn copy_into_map<'a, K, V, I>(&self, source: I) -> Result<MapShadow<K, V>>
    where
        K: MapKey + 'a,
        V: Trackable + 'a,
        I: IntoIterator<Item = (&'a K, &'a V)>,
    {
        copy_map(source, self.config)
    }

    /// Recursively shadowed copy of a sequence
    ///
    /// # Errors
    /// Returns error if a nested shadow element cannot be copied
    pub fn copy_into_collection<E: Trackable>(&self, source: &[E]) -> Result<CollectionShadow<E>> {
        copy_collection(source, self.config)
    }

    /// Cached schema of `T`
    #[inline]
    #[must_use]
    pub fn schema<T: Shadowed>(&self) -> Arc<Schema<T>> {
        self.registry.schema::<T>()
    }

    /// Schema cache
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Configuration handed to new shadows
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ShadowConfig {
        &self.config
    }
}
