//! Tracked member values
//!
//! [`Trackable`] is implemented by every value that can live inside a
//! shadow. Shadow handles override [`Trackable::tracker`], which is how the
//! copy engine and the cascading operations recognise shadow-eligible
//! values at runtime. [`AnyMember`] is the object-safe view used by object
//! schemas, and [`MemberValue`] is an owned, type-erased value used for
//! baseline snapshots.

use crate::config::ShadowConfig;
use crate::error::{Result, ShadowError};
use crate::tracker::Tracker;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Debug, Formatter};
use std::hash::Hash;

/// Value that can be stored in a shadow
///
/// Plain value types opt in with an empty impl:
///
/// ```rust
/// use shadow_core::Trackable;
///
/// #[derive(Debug, Clone, PartialEq)]
/// struct Money(i64);
///
/// impl Trackable for Money {}
/// ```
pub trait Trackable: Any + Clone + PartialEq + Debug {
    /// Tracking API of this value, if it is a shadow handle
    #[inline]
    fn tracker(&self) -> Option<&dyn Tracker> {
        None
    }

    /// Mutable tracking API of this value, if it is a shadow handle
    #[inline]
    fn tracker_mut(&mut self) -> Option<&mut dyn Tracker> {
        None
    }

    /// Null members are skipped by the copy engine
    #[inline]
    fn is_null(&self) -> bool {
        false
    }

    /// Copy used when this value is carried into a fresh shadow graph
    ///
    /// Plain values clone; shadow handles deep-copy into new identities
    /// carrying `config`.
    ///
    /// # Errors
    /// Returns error if a nested shadow cannot be copied
    #[inline]
    fn copy_member(&self, _config: ShadowConfig) -> Result<Self> {
        Ok(self.clone())
    }
}

macro_rules! plain_trackable {
    ($($ty:ty),* $(,)?) => {
        $(impl Trackable for $ty {})*
    };
}

plain_trackable!(
    (),
    bool,
    char,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    String,
    &'static str,
);

impl<T: Trackable> Trackable for Option<T> {
    fn tracker(&self) -> Option<&dyn Tracker> {
        self.as_ref().and_then(Trackable::tracker)
    }

    fn tracker_mut(&mut self) -> Option<&mut dyn Tracker> {
        self.as_mut().and_then(Trackable::tracker_mut)
    }

    fn is_null(&self) -> bool {
        self.is_none()
    }

    fn copy_member(&self, config: ShadowConfig) -> Result<Self> {
        self.as_ref().map(|value| value.copy_member(config)).transpose()
    }
}

impl<T: Trackable> Trackable for Box<T> {
    fn tracker(&self) -> Option<&dyn Tracker> {
        (**self).tracker()
    }

    fn tracker_mut(&mut self) -> Option<&mut dyn Tracker> {
        (**self).tracker_mut()
    }

    fn is_null(&self) -> bool {
        (**self).is_null()
    }

    fn copy_member(&self, config: ShadowConfig) -> Result<Self> {
        (**self).copy_member(config).map(Box::new)
    }
}

// Plain containers are values: they are compared and copied whole.
impl<T: Trackable> Trackable for Vec<T> {}

impl<K, V> Trackable for HashMap<K, V>
where
    K: Any + Clone + Eq + Hash + Debug,
    V: Trackable,
{
}

impl<K, V> Trackable for BTreeMap<K, V>
where
    K: Any + Clone + Ord + Debug,
    V: Trackable,
{
}

impl<A: Trackable, B: Trackable> Trackable for (A, B) {}

/// Object-safe view of a [`Trackable`] value
pub trait AnyMember: Debug {
    /// Downcasting support
    fn as_any(&self) -> &dyn Any;

    /// Owned downcasting support
    fn into_any(self: Box<Self>) -> Box<dyn Any>;

    /// Name of the concrete type
    fn member_type_name(&self) -> &'static str;

    /// Clone into an owned erased value
    fn clone_member(&self) -> MemberValue;

    /// Equality across erased values; values of different types are unequal
    fn eq_member(&self, other: &dyn AnyMember) -> bool;

    /// See [`Trackable::is_null`]
    fn is_null_member(&self) -> bool;

    /// See [`Trackable::tracker`]
    fn as_tracker(&self) -> Option<&dyn Tracker>;

    /// See [`Trackable::tracker_mut`]
    fn as_tracker_mut(&mut self) -> Option<&mut dyn Tracker>;

    /// See [`Trackable::copy_member`]
    ///
    /// # Errors
    /// Returns error if a nested shadow cannot be copied
    fn copy_erased(&self, config: ShadowConfig) -> Result<MemberValue>;

    /// Overwrite this value with `value`
    ///
    /// # Errors
    /// Returns [`ShadowError::TypeMismatch`] if `value` is of another type
    fn assign(&mut self, member: &str, value: MemberValue) -> Result<()>;
}

impl<T: Trackable> AnyMember for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }

    fn member_type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn clone_member(&self) -> MemberValue {
        MemberValue::new(self.clone())
    }

    fn eq_member(&self, other: &dyn AnyMember) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn is_null_member(&self) -> bool {
        Trackable::is_null(self)
    }

    fn as_tracker(&self) -> Option<&dyn Tracker> {
        Trackable::tracker(self)
    }

    fn as_tracker_mut(&mut self) -> Option<&mut dyn Tracker> {
        Trackable::tracker_mut(self)
    }

    fn copy_erased(&self, config: ShadowConfig) -> Result<MemberValue> {
        Trackable::copy_member(self, config).map(MemberValue::new)
    }

    fn assign(&mut self, member: &str, value: MemberValue) -> Result<()> {
        *self = value.downcast_for::<T>(member)?;
        Ok(())
    }
}

/// Owned, type-erased member value
pub struct MemberValue(Box<dyn AnyMember>);

impl MemberValue {
    /// Erase a value
    #[inline]
    #[must_use]
    pub fn new<T: Trackable>(value: T) -> Self {
        Self(Box::new(value))
    }

    /// Borrow the erased value
    #[inline]
    #[must_use]
    pub fn as_member(&self) -> &dyn AnyMember {
        &*self.0
    }

    /// Name of the concrete type
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.0.member_type_name()
    }

    /// Check for a null (`None`) value
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0.is_null_member()
    }

    /// Borrow as a concrete type
    #[inline]
    #[must_use]
    pub fn downcast_ref<T: Trackable>(&self) -> Option<&T> {
        self.0.as_any().downcast_ref::<T>()
    }

    /// Recover the concrete value
    ///
    /// # Errors
    /// Returns [`ShadowError::TypeMismatch`] if the value is not a `T`
    pub fn downcast<T: Trackable>(self) -> Result<T> {
        self.downcast_for("<value>")
    }

    pub(crate) fn downcast_for<T: Trackable>(self, member: &str) -> Result<T> {
        let actual = self.type_name();
        self.0
            .into_any()
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| ShadowError::TypeMismatch {
                member: member.to_string(),
                expected: std::any::type_name::<T>(),
                actual,
            })
    }

    /// Tracking API of the value
    ///
    /// # Errors
    /// Returns [`ShadowError::InvalidArgument`] if the value is not a shadow
    pub fn as_tracker(&self) -> Result<&dyn Tracker> {
        self.0.as_tracker().ok_or_else(|| {
            ShadowError::InvalidArgument(format!("{} is not a shadow", self.type_name()))
        })
    }
}

impl Clone for MemberValue {
    fn clone(&self) -> Self {
        self.0.clone_member()
    }
}

impl PartialEq for MemberValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_member(other.as_member())
    }
}

impl Debug for MemberValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&*self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Money(i64);

    impl Trackable for Money {}

    #[test]
    fn erased_equality() {
        let a = MemberValue::new(5_i32);
        let b = MemberValue::new(5_i32);
        let c = MemberValue::new(6_i32);
        let d = MemberValue::new(5_i64);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
    }

    #[test]
    fn downcast_round_trip() {
        let value = MemberValue::new(Money(12));
        assert_eq!(value.downcast_ref::<Money>(), Some(&Money(12)));
        assert_eq!(value.downcast::<Money>().unwrap(), Money(12));
    }

    #[test]
    fn downcast_wrong_type_is_mismatch() {
        let value = MemberValue::new("text".to_string());
        let err = value.downcast::<u32>().unwrap_err();
        assert!(err.is_type_mismatch());
    }

    #[test]
    fn assign_checks_type() {
        let mut target = Money(1);
        target.assign("amount", MemberValue::new(Money(9))).unwrap();
        assert_eq!(target, Money(9));

        let err = target.assign("amount", MemberValue::new(9_u8)).unwrap_err();
        assert!(matches!(err, ShadowError::TypeMismatch { ref member, .. } if member == "amount"));
        assert_eq!(target, Money(9));
    }

    #[test]
    fn option_nullness() {
        assert!(MemberValue::new(None::<String>).is_null());
        assert!(!MemberValue::new(Some("x".to_string())).is_null());
        assert!(!MemberValue::new(0_u8).is_null());
    }

    #[test]
    fn plain_values_are_not_trackers() {
        let value = MemberValue::new(vec![1, 2, 3]);
        assert!(matches!(
            value.as_tracker(),
            Err(ShadowError::InvalidArgument(_))
        ));
    }

    #[test]
    fn debug_shows_inner_value() {
        assert_eq!(format!("{:?}", MemberValue::new("x")), "\"x\"");
    }
}
