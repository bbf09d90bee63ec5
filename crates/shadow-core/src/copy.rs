//! Copy engine
//!
//! Builds a fully shadowed copy of an existing value in one traversal.
//! Eligible members are copied into fresh shadow identities, plain members
//! are cloned, and the result is baselined once the traversal completes.

use crate::collection::CollectionShadow;
use crate::config::{Depth, ShadowConfig};
use crate::error::{Result, ShadowError};
use crate::map::{MapKey, MapShadow};
use crate::member::Trackable;
use crate::object::ObjectShadow;
use crate::schema::{Schema, Shadowed};
use crate::tracker::Tracker;
use indexmap::IndexMap;
use std::sync::Arc;

/// Copy `source` into a new, baselined object shadow
///
/// Null members are left at their default. Members marked eligible must
/// hold shadow handles, which are deep-copied. Every shadow in the copied
/// graph carries `config`.
///
/// # Errors
/// Returns [`ShadowError::TypeMismatch`] if an eligible member holds a
/// plain value, or any error raised while copying a nested shadow
pub fn copy_object<T: Shadowed>(
    source: &T,
    schema: Arc<Schema<T>>,
    config: ShadowConfig,
) -> Result<ObjectShadow<T>> {
    let mut target = T::default();

    for def in schema.members() {
        let member = def.get(source);
        if member.is_null_member() {
            tracing::trace!("Skipping null member {}.{}", schema.type_name(), def.name());
            continue;
        }

        let value = if def.is_eligible() {
            if member.as_tracker().is_none() {
                return Err(ShadowError::TypeMismatch {
                    member: format!("{}.{}", schema.type_name(), def.name()),
                    expected: "shadow handle",
                    actual: member.member_type_name(),
                });
            }
            member.copy_erased(config)?
        } else {
            member.clone_member()
        };
        def.get_mut(&mut target).assign(def.name(), value)?;
    }

    // Nested copies are already baselined by their own copy.
    let mut shadow = ObjectShadow::wrap(target, schema, config);
    shadow.baseline_with(Depth::Shallow);
    tracing::debug!(
        "Copied {} into shadow {}",
        shadow.schema().type_name(),
        shadow.shadow_id()
    );
    Ok(shadow)
}

/// Copy `items` into a new, baselined collection shadow
///
/// # Errors
/// Returns any error raised while copying a nested shadow element
pub fn copy_collection<E: Trackable>(items: &[E], config: ShadowConfig) -> Result<CollectionShadow<E>> {
    let copied = items
        .iter()
        .map(|item| item.copy_member(config))
        .collect::<Result<Vec<_>>>()?;
    let shadow = CollectionShadow::from_items(copied, config);
    tracing::debug!("Copied {} elements into shadow {}", shadow.len(), shadow.shadow_id());
    Ok(shadow)
}

/// Copy key-value pairs into a new, baselined map shadow
///
/// Accepts anything iterable as `(&K, &V)`, such as `&HashMap`,
/// `&BTreeMap` or `&IndexMap`. Iteration order becomes insertion order.
///
/// # Errors
/// Returns any error raised while copying a nested shadow value
pub fn copy_map<'a, K, V, I>(entries: I, config: ShadowConfig) -> Result<MapShadow<K, V>>
where
    K: MapKey + 'a,
    V: Trackable + 'a,
    I: IntoIterator<Item = (&'a K, &'a V)>,
{
    let copied = entries
        .into_iter()
        .map(|(key, value)| -> Result<(K, V)> { Ok((key.clone(), value.copy_member(config)?)) })
        .collect::<Result<IndexMap<_, _>>>()?;
    let shadow = MapShadow::from_entries(copied, config);
    tracing::debug!("Copied {} entries into shadow {}", shadow.len(), shadow.shadow_id());
    Ok(shadow)
}
