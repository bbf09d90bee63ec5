//! Change classifier
//!
//! Pure functions comparing baseline state to current state. Objects are
//! compared member by member; maps by key presence then value; sequences by
//! a [`Correlation`] policy that separates structural change from edits.

use crate::change::ChangeType;
use crate::config::Correlation;
use crate::member::AnyMember;
use indexmap::IndexMap;
use std::hash::Hash;

/// Classify one object member
///
/// A null baseline becoming non-null is an add, the reverse a remove, any
/// other difference an edit. Equal values yield `None`.
#[must_use]
pub fn classify_member(original: &dyn AnyMember, current: &dyn AnyMember) -> Option<ChangeType> {
    if original.eq_member(current) {
        return None;
    }
    match (original.is_null_member(), current.is_null_member()) {
        (true, false) => Some(ChangeType::Add),
        (false, true) => Some(ChangeType::Remove),
        _ => Some(ChangeType::Edit),
    }
}

/// Classify every key of a keyed store
///
/// Baseline keys come first in baseline order, followed by added keys in
/// current order.
#[must_use]
pub fn diff_keyed<K, V>(baseline: &IndexMap<K, V>, current: &IndexMap<K, V>) -> IndexMap<K, ChangeType>
where
    K: Hash + Eq + Clone,
    V: PartialEq,
{
    let mut changes = IndexMap::new();
    for (key, original) in baseline {
        match current.get(key) {
            None => {
                changes.insert(key.clone(), ChangeType::Remove);
            }
            Some(value) if value != original => {
                changes.insert(key.clone(), ChangeType::Edit);
            }
            Some(_) => {}
        }
    }
    for key in current.keys() {
        if !baseline.contains_key(key) {
            changes.insert(key.clone(), ChangeType::Add);
        }
    }
    changes
}

/// One correlated difference between two sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceChange {
    /// Classification
    pub change: ChangeType,
    /// Position in the baseline (removes and edits)
    pub baseline_index: Option<usize>,
    /// Position in the current sequence (adds and edits)
    pub current_index: Option<usize>,
}

impl SequenceChange {
    fn add(index: usize) -> Self {
        Self {
            change: ChangeType::Add,
            baseline_index: None,
            current_index: Some(index),
        }
    }

    fn remove(index: usize) -> Self {
        Self {
            change: ChangeType::Remove,
            baseline_index: Some(index),
            current_index: None,
        }
    }
}

/// Correlate two sequences under `policy`
///
/// Removes are listed before adds, each in ascending index order.
#[must_use]
pub fn correlate<E: PartialEq>(baseline: &[E], current: &[E], policy: Correlation) -> Vec<SequenceChange> {
    match policy {
        Correlation::Multiset => correlate_multiset(baseline, current),
        Correlation::Positional => correlate_positional(baseline, current),
    }
}

/// Greedy value-equality matching
///
/// Each current element claims the first unclaimed equal baseline element.
/// Duplicates are matched one for one; reordering is not a change.
fn correlate_multiset<E: PartialEq>(baseline: &[E], current: &[E]) -> Vec<SequenceChange> {
    let mut claimed = vec![false; baseline.len()];
    let mut added = Vec::new();

    for (ci, item) in current.iter().enumerate() {
        let slot = (0..baseline.len()).find(|&bi| !claimed[bi] && baseline[bi] == *item);
        match slot {
            Some(bi) => claimed[bi] = true,
            None => added.push(SequenceChange::add(ci)),
        }
    }

    claimed
        .iter()
        .enumerate()
        .filter(|&(_, hit)| !*hit)
        .map(|(bi, _)| SequenceChange::remove(bi))
        .chain(added)
        .collect()
}

fn correlate_positional<E: PartialEq>(baseline: &[E], current: &[E]) -> Vec<SequenceChange> {
    let shared = baseline.len().min(current.len());
    let mut removed = Vec::new();
    let mut rest = Vec::new();

    for i in 0..shared {
        if baseline[i] != current[i] {
            rest.push(SequenceChange {
                change: ChangeType::Edit,
                baseline_index: Some(i),
                current_index: Some(i),
            });
        }
    }
    for i in shared..baseline.len() {
        removed.push(SequenceChange::remove(i));
    }
    for i in shared..current.len() {
        rest.push(SequenceChange::add(i));
    }

    removed.extend(rest);
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::MemberValue;

    fn map(entries: &[(&'static str, i32)]) -> IndexMap<&'static str, i32> {
        entries.iter().copied().collect()
    }

    #[test]
    fn member_classification() {
        let none = MemberValue::new(None::<String>);
        let some = MemberValue::new(Some("a".to_string()));
        let other = MemberValue::new(Some("b".to_string()));

        assert_eq!(classify_member(none.as_member(), none.as_member()), None);
        assert_eq!(
            classify_member(none.as_member(), some.as_member()),
            Some(ChangeType::Add)
        );
        assert_eq!(
            classify_member(some.as_member(), none.as_member()),
            Some(ChangeType::Remove)
        );
        assert_eq!(
            classify_member(some.as_member(), other.as_member()),
            Some(ChangeType::Edit)
        );
    }

    #[test]
    fn keyed_diff_classifies_all_three() {
        let baseline = map(&[("a", 1), ("b", 2), ("d", 4)]);
        let current = map(&[("a", 5), ("c", 3), ("d", 4)]);
        let changes = diff_keyed(&baseline, &current);

        let expected: IndexMap<_, _> = [
            ("a", ChangeType::Edit),
            ("b", ChangeType::Remove),
            ("c", ChangeType::Add),
        ]
        .into_iter()
        .collect();
        assert_eq!(changes, expected);
    }

    #[test]
    fn keyed_diff_equal_is_empty() {
        let baseline = map(&[("a", 1)]);
        assert!(diff_keyed(&baseline, &baseline.clone()).is_empty());
    }

    #[test]
    fn multiset_ignores_reorder() {
        let changes = correlate(&[1, 2, 3], &[3, 1, 2], Correlation::Multiset);
        assert!(changes.is_empty());
    }

    #[test]
    fn multiset_matches_duplicates_one_for_one() {
        let changes = correlate(&[7, 7, 8], &[7, 8], Correlation::Multiset);
        assert_eq!(changes, vec![SequenceChange::remove(1)]);

        let changes = correlate(&[7], &[7, 7], Correlation::Multiset);
        assert_eq!(changes, vec![SequenceChange::add(1)]);
    }

    #[test]
    fn multiset_remove_and_append() {
        let changes = correlate(&[1, 2, 3], &[1, 3, 4], Correlation::Multiset);
        assert_eq!(
            changes,
            vec![SequenceChange::remove(1), SequenceChange::add(2)]
        );
    }

    #[test]
    fn positional_reports_edits_and_tail() {
        let changes = correlate(&[1, 2, 3], &[1, 9], Correlation::Positional);
        assert_eq!(
            changes,
            vec![
                SequenceChange::remove(2),
                SequenceChange {
                    change: ChangeType::Edit,
                    baseline_index: Some(1),
                    current_index: Some(1),
                },
            ]
        );

        let grown = correlate(&[1], &[1, 2], Correlation::Positional);
        assert_eq!(grown, vec![SequenceChange::add(1)]);
    }
}
