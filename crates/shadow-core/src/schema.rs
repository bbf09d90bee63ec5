//! Member schemas for object shadows
//!
//! A [`Schema`] enumerates, per type, the tracked members and which of them
//! are shadow-eligible. Schemas are declared once per type, usually with
//! [`shadow_schema!`](crate::shadow_schema), and cached by
//! [`SchemaRegistry`](crate::SchemaRegistry).

use crate::error::{Result, ShadowError};
use crate::member::AnyMember;
use std::fmt::{self, Debug, Formatter};

/// Accessor returning a member by reference
pub type Getter<T> = fn(&T) -> &dyn AnyMember;

/// Accessor returning a member by mutable reference
pub type GetterMut<T> = fn(&mut T) -> &mut dyn AnyMember;

/// Descriptor of one tracked member
pub struct MemberDef<T> {
    name: &'static str,
    eligible: bool,
    get: Getter<T>,
    get_mut: GetterMut<T>,
}

impl<T> MemberDef<T> {
    /// Member name
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Check if the member carries the shadow capability marker
    #[inline]
    #[must_use]
    pub fn is_eligible(&self) -> bool {
        self.eligible
    }

    /// Read the member
    #[inline]
    #[must_use]
    pub fn get<'a>(&self, target: &'a T) -> &'a dyn AnyMember {
        (self.get)(target)
    }

    /// Read the member mutably
    #[inline]
    #[must_use]
    pub fn get_mut<'a>(&self, target: &'a mut T) -> &'a mut dyn AnyMember {
        (self.get_mut)(target)
    }
}

impl<T> Debug for MemberDef<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemberDef")
            .field("name", &self.name)
            .field("eligible", &self.eligible)
            .finish()
    }
}

/// Ordered member descriptors of one type
#[derive(Debug)]
pub struct Schema<T> {
    type_name: &'static str,
    members: Vec<MemberDef<T>>,
}

impl<T> Schema<T> {
    /// Start an empty schema
    #[inline]
    #[must_use]
    pub fn new(type_name: &'static str) -> Self {
        Self {
            type_name,
            members: Vec::new(),
        }
    }

    /// Add a plain member
    #[must_use]
    pub fn member(self, name: &'static str, get: Getter<T>, get_mut: GetterMut<T>) -> Self {
        self.push(name, false, get, get_mut)
    }

    /// Add a shadow-eligible member
    #[must_use]
    pub fn shadowed(self, name: &'static str, get: Getter<T>, get_mut: GetterMut<T>) -> Self {
        self.push(name, true, get, get_mut)
    }

    fn push(mut self, name: &'static str, eligible: bool, get: Getter<T>, get_mut: GetterMut<T>) -> Self {
        // Later declarations of the same name replace earlier ones.
        self.members.retain(|m| m.name != name);
        self.members.push(MemberDef {
            name,
            eligible,
            get,
            get_mut,
        });
        self
    }

    /// Name of the described type
    #[inline]
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Look up a member
    ///
    /// # Errors
    /// Returns [`ShadowError::KeyNotFound`] for unknown names
    pub fn lookup(&self, name: &str) -> Result<&MemberDef<T>> {
        self.members
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| ShadowError::KeyNotFound(format!("{}.{}", self.type_name, name)))
    }

    /// Check if a member carries the shadow capability marker
    ///
    /// # Errors
    /// Returns [`ShadowError::KeyNotFound`] for unknown names
    pub fn is_eligible(&self, name: &str) -> Result<bool> {
        self.lookup(name).map(MemberDef::is_eligible)
    }

    /// All members in declaration order
    #[inline]
    pub fn members(&self) -> impl Iterator<Item = &MemberDef<T>> {
        self.members.iter()
    }

    /// Shadow-eligible members in declaration order
    #[inline]
    pub fn eligible_members(&self) -> impl Iterator<Item = &MemberDef<T>> {
        self.members.iter().filter(|m| m.eligible)
    }

    /// Number of members
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if no member is tracked
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Type that can be wrapped in an [`ObjectShadow`](crate::ObjectShadow)
///
/// `Default` is the blank instance the copy engine fills in and
/// [`KeyedTracker::original`](crate::KeyedTracker::original) rebuilds
/// from the baseline.
pub trait Shadowed: Default + Clone + Debug + 'static {
    /// Describe the tracked members of this type
    fn schema() -> Schema<Self>;
}

/// Implement [`Shadowed`] for a struct by listing its tracked fields
///
/// Fields marked `#[shadowed]` are shadow-eligible: their values must be
/// shadow handles (or `Option`s of them), and the copy engine deep-copies
/// them into fresh handles.
///
/// ```rust
/// use shadow_core::{shadow_schema, CollectionShadow, Shadowed};
///
/// #[derive(Debug, Clone, Default)]
/// struct Team {
///     name: String,
///     members: Option<CollectionShadow<String>>,
/// }
///
/// shadow_schema! {
///     Team {
///         name,
///         #[shadowed] members,
///     }
/// }
///
/// assert!(Team::schema().is_eligible("members").unwrap());
/// ```
#[macro_export]
macro_rules! shadow_schema {
    (@members $ty:ty; $schema:expr; ) => { $schema };

    (@members $ty:ty; $schema:expr; #[shadowed] $field:ident $(, $($rest:tt)*)?) => {
        $crate::shadow_schema!(
            @members $ty;
            $schema.shadowed(
                stringify!($field),
                {
                    fn get(target: &$ty) -> &dyn $crate::AnyMember {
                        &target.$field
                    }
                    get
                },
                {
                    fn get_mut(target: &mut $ty) -> &mut dyn $crate::AnyMember {
                        &mut target.$field
                    }
                    get_mut
                },
            );
            $($($rest)*)?
        )
    };

    (@members $ty:ty; $schema:expr; $field:ident $(, $($rest:tt)*)?) => {
        $crate::shadow_schema!(
            @members $ty;
            $schema.member(
                stringify!($field),
                {
                    fn get(target: &$ty) -> &dyn $crate::AnyMember {
                        &target.$field
                    }
                    get
                },
                {
                    fn get_mut(target: &mut $ty) -> &mut dyn $crate::AnyMember {
                        &mut target.$field
                    }
                    get_mut
                },
            );
            $($($rest)*)?
        )
    };

    ($ty:ty { $($body:tt)* }) => {
        impl $crate::Shadowed for $ty {
            fn schema() -> $crate::Schema<Self> {
                let schema = $crate::Schema::new(stringify!($ty));
                $crate::shadow_schema!(@members $ty; schema; $($body)*)
            }
        }
    };
}
