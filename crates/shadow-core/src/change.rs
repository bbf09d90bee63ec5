//! Change classification model
//!
//! [`ChangeType`] describes how one tracked entry differs between baseline
//! and current state. "Unchanged" is the absence of an entry.

use crate::member::MemberValue;
use std::fmt::{self, Display, Formatter};
use uuid::Uuid;

/// How a tracked entry diverges from its baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChangeType {
    /// Present now, absent from the baseline
    Add,
    /// Present in the baseline, absent now
    Remove,
    /// Present in both with differing values
    Edit,
}

impl ChangeType {
    /// Check if the change alters structure (key/element presence)
    #[inline]
    #[must_use]
    pub fn is_structural(self) -> bool {
        matches!(self, Self::Add | Self::Remove)
    }
}

impl Display for ChangeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "Add",
            Self::Remove => "Remove",
            Self::Edit => "Edit",
        };
        f.write_str(s)
    }
}

/// Shape of a shadow handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShadowKind {
    /// Structured value tracked per member name
    Object,
    /// Ordered sequence tracked per element
    Collection,
    /// Key-value store tracked per key
    Map,
}

/// Identity of a shadow handle
///
/// Nested shadow members compare by identity, so editing inside a nested
/// shadow is never reported as an edit of the parent's member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShadowId(Uuid);

impl ShadowId {
    /// Fresh random identity
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID
    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ShadowId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for ShadowId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = self.0.simple().to_string();
        f.write_str(&s[..8])
    }
}

/// One differing member of an object shadow
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    /// Member name
    pub name: &'static str,
    /// Baseline value
    pub original: MemberValue,
    /// Live value
    pub current: MemberValue,
    /// Classification
    pub change: ChangeType,
}

impl Display for PropertyChange {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {:?} -> {:?} ({})",
            self.name, self.original, self.current, self.change
        )
    }
}

/// One differing element of a collection shadow
///
/// `index` is the baseline position for [`ChangeType::Remove`] and the
/// current position otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementChange<E> {
    /// Position of the element
    pub index: usize,
    /// Classification
    pub change: ChangeType,
    /// The removed, added or edited-to element
    pub element: E,
    /// Baseline element replaced by an edit
    pub previous: Option<E>,
}

impl<E: fmt::Debug> Display for ElementChange<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match (&self.change, &self.previous) {
            (ChangeType::Edit, Some(prev)) => write!(
                f,
                "[{}]: {:?} -> {:?} (Edit)",
                self.index, prev, self.element
            ),
            _ => write!(f, "[{}]: {:?} ({})", self.index, self.element, self.change),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_type_display() {
        assert_eq!(ChangeType::Add.to_string(), "Add");
        assert_eq!(ChangeType::Remove.to_string(), "Remove");
        assert_eq!(ChangeType::Edit.to_string(), "Edit");
    }

    #[test]
    fn structural_changes() {
        assert!(ChangeType::Add.is_structural());
        assert!(ChangeType::Remove.is_structural());
        assert!(!ChangeType::Edit.is_structural());
    }

    #[test]
    fn shadow_ids_are_unique() {
        let a = ShadowId::new();
        let b = ShadowId::new();
        assert_ne!(a, b);
        assert_eq!(a.to_string().len(), 8);
    }

    #[test]
    fn element_change_display() {
        let edit = ElementChange {
            index: 1,
            change: ChangeType::Edit,
            element: 5,
            previous: Some(2),
        };
        assert_eq!(edit.to_string(), "[1]: 2 -> 5 (Edit)");

        let add = ElementChange {
            index: 3,
            change: ChangeType::Add,
            element: 4,
            previous: None,
        };
        assert_eq!(add.to_string(), "[3]: 4 (Add)");
    }
}
