//! The children index container and its copy-on-write operations.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::case::CaseSensitivity;
use crate::path::RelativePath;

use super::entry::Entry;
use super::relationship::{self, PathRelationship};

/// A persistent, ordered map from path spans to child payloads.
///
/// The index is one of three shapes: empty, a single child stored without a
/// backing sequence, or a sorted sequence of two or more entries with
/// distinct first segments. Update operations never mutate in place: each
/// returns a new index, rebuilding only the entry sequence of the touched
/// node while child payloads stay shared with the previous version.
///
/// Cloning an index copies a storage handle, not the entries, so old
/// versions of a tree can keep referring to an index indefinitely.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct ChildIndex<T> {
    repr: Repr<T>,
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum Repr<T> {
    Empty,
    Singleton(Arc<Entry<T>>),
    Sorted(Arc<[Entry<T>]>),
}

impl<T> Clone for ChildIndex<T> {
    fn clone(&self) -> Self {
        let repr = match &self.repr {
            Repr::Empty => Repr::Empty,
            Repr::Singleton(entry) => Repr::Singleton(Arc::clone(entry)),
            Repr::Sorted(entries) => Repr::Sorted(Arc::clone(entries)),
        };
        Self { repr }
    }
}

impl<T> Default for ChildIndex<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> ChildIndex<T> {
    /// Creates an index with no children.
    pub fn empty() -> Self {
        Self { repr: Repr::Empty }
    }

    /// Creates an index holding exactly one child.
    pub fn singleton(path: impl Into<String>, child: T) -> Self {
        Self {
            repr: Repr::Singleton(Arc::new(Entry::new(path, child))),
        }
    }

    /// Creates an index from entries already sorted under `case`.
    ///
    /// The shape is chosen from the entry count, so zero entries yield an
    /// empty index and one entry a singleton.
    ///
    /// # Panics
    /// Panics if the entries are not strictly ascending by first segment
    /// under `case`. Duplicated first segments are an ordering violation.
    pub fn from_sorted_entries(entries: Vec<Entry<T>>, case: CaseSensitivity) -> Self {
        for pair in entries.windows(2) {
            let earlier = RelativePath::trusted(pair[0].path());
            assert!(
                earlier.compare_first_segment(pair[1].path(), case) == Ordering::Less,
                "entries must be strictly ascending by first segment: {:?} before {:?}",
                pair[0].path(),
                pair[1].path()
            );
        }
        Self::from_entries_unchecked(entries)
    }

    /// Builds the canonical shape for an entry sequence whose order is
    /// already established.
    fn from_entries_unchecked(mut entries: Vec<Entry<T>>) -> Self {
        let repr = match entries.len() {
            0 => Repr::Empty,
            1 => Repr::Singleton(Arc::new(entries.remove(0))),
            _ => Repr::Sorted(entries.into()),
        };
        Self { repr }
    }

    /// Returns true if the index has no children.
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self.repr, Repr::Empty)
    }

    /// Returns the number of children.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Returns the entries in ascending first-segment order.
    pub fn entries(&self) -> &[Entry<T>] {
        match &self.repr {
            Repr::Empty => &[],
            Repr::Singleton(entry) => std::slice::from_ref(&**entry),
            Repr::Sorted(entries) => entries,
        }
    }

    /// Iterates over the child payloads in span order.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.entries().iter().map(|entry| entry.child())
    }

    /// Invokes `visitor` for every (span, child) pair in span order.
    pub fn visit_children(&self, mut visitor: impl FnMut(&str, &T)) {
        for entry in self.entries() {
            visitor(entry.path(), entry.child());
        }
    }

    /// Classifies how `target` relates to the children of this index.
    ///
    /// Performs an ordered search for the child sharing the target's first
    /// segment, then decides between an exact match, a descent into the
    /// child, a split inside the child's span, or no relation. The index is
    /// never modified; the caller matches on the outcome to perform the
    /// actual tree edit through the update operations.
    pub fn locate<'t>(
        &self,
        target: RelativePath<'t>,
        case: CaseSensitivity,
    ) -> PathRelationship<'t> {
        relationship::classify(self.entries(), target, case)
    }

    /// Returns true if both indices are backed by the same storage.
    ///
    /// This is the cheap no-op test for the replace identity guarantee: an
    /// update that changed nothing hands back the original storage, and
    /// callers can skip rebuilding their own node when they see it.
    pub fn shares_storage(&self, other: &Self) -> bool {
        match (&self.repr, &other.repr) {
            (Repr::Empty, Repr::Empty) => true,
            (Repr::Singleton(a), Repr::Singleton(b)) => Arc::ptr_eq(a, b),
            (Repr::Sorted(a), Repr::Sorted(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl<T: Clone> ChildIndex<T> {
    /// Returns a new index with a child inserted at `insertion_index`.
    ///
    /// The insertion index must come from [`ChildIndex::locate`] (an
    /// unrelated outcome) so that the order invariant is preserved. The
    /// entry sequence is rebuilt; child payloads are not copied beyond a
    /// clone of their handles.
    ///
    /// # Panics
    /// Panics if `insertion_index` is out of bounds.
    pub fn with_new_child(
        &self,
        insertion_index: usize,
        path: impl Into<String>,
        child: T,
    ) -> Self {
        let existing = self.entries();
        assert!(
            insertion_index <= existing.len(),
            "insertion index {insertion_index} out of bounds for {} children",
            existing.len()
        );
        let mut entries = Vec::with_capacity(existing.len() + 1);
        entries.extend_from_slice(&existing[..insertion_index]);
        entries.push(Entry::new(path, child));
        entries.extend_from_slice(&existing[insertion_index..]);
        Self::from_entries_unchecked(entries)
    }

    /// Returns a new index with the child at `child_index` removed.
    ///
    /// A sorted index that drops to one entry collapses to a singleton, and
    /// a singleton collapses to the empty index, so the shape of an index is
    /// always determined by its content.
    ///
    /// # Panics
    /// Panics if `child_index` is out of bounds.
    pub fn with_removed_child(&self, child_index: usize) -> Self {
        assert!(
            child_index < self.len(),
            "child index {child_index} out of bounds for {} children",
            self.len()
        );
        let mut entries = self.entries().to_vec();
        entries.remove(child_index);
        Self::from_entries_unchecked(entries)
    }
}

impl<T: Clone + PartialEq> ChildIndex<T> {
    /// Returns a new index with the entry at `child_index` replaced.
    ///
    /// Replacing an entry with an identical span and child returns a handle
    /// to the original storage instead of rebuilding, which
    /// [`ChildIndex::shares_storage`] makes observable to callers.
    ///
    /// # Panics
    /// Panics if `child_index` is out of bounds.
    pub fn with_replaced_child(
        &self,
        child_index: usize,
        new_path: impl Into<String>,
        new_child: T,
    ) -> Self {
        assert!(
            child_index < self.len(),
            "child index {child_index} out of bounds for {} children",
            self.len()
        );
        let new_path = new_path.into();
        let current = &self.entries()[child_index];
        if current.path() == new_path && *current.child() == new_child {
            return self.clone();
        }
        let mut entries = self.entries().to_vec();
        entries[child_index] = Entry::new(new_path, new_child);
        Self::from_entries_unchecked(entries)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use super::*;

    const SENSITIVE: CaseSensitivity = CaseSensitivity::Sensitive;
    const INSENSITIVE: CaseSensitivity = CaseSensitivity::Insensitive;

    fn target(s: &str) -> RelativePath<'_> {
        RelativePath::new(s).unwrap()
    }

    /// Inserts through locate, the way the owning tree layer does.
    fn insert(
        index: &ChildIndex<u32>,
        path: &str,
        child: u32,
        case: CaseSensitivity,
    ) -> ChildIndex<u32> {
        match index.locate(target(path), case) {
            PathRelationship::Unrelated { insertion_index } => {
                index.with_new_child(insertion_index, path, child)
            }
            other => panic!("expected unrelated outcome for {path}, got {other:?}"),
        }
    }

    fn hash_of(index: &ChildIndex<u32>) -> u64 {
        let mut hasher = DefaultHasher::new();
        index.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn grows_from_empty_through_singleton_to_sorted() {
        let empty = ChildIndex::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);

        let one = insert(&empty, "beta", 1, SENSITIVE);
        assert!(!one.is_empty());
        assert_eq!(one.len(), 1);
        assert!(matches!(one.repr, Repr::Singleton(_)));

        let two = insert(&one, "alpha", 0, SENSITIVE);
        assert_eq!(two.len(), 2);
        assert!(matches!(two.repr, Repr::Sorted(_)));

        // The previous versions are untouched.
        assert!(empty.is_empty());
        assert_eq!(one.len(), 1);
    }

    #[test]
    fn insertions_keep_ascending_order() {
        for case in [SENSITIVE, INSENSITIVE] {
            let mut index = ChildIndex::empty();
            for (position, segment) in ["mango", "apple", "peach", "cherry", "banana"]
                .into_iter()
                .enumerate()
            {
                index = insert(&index, segment, position as u32, case);
            }
            assert_eq!(index.len(), 5);
            for pair in index.entries().windows(2) {
                let earlier = RelativePath::new(pair[0].path()).unwrap();
                assert_eq!(
                    earlier.compare_first_segment(pair[1].path(), case),
                    Ordering::Less,
                    "{:?} must sort before {:?}",
                    pair[0].path(),
                    pair[1].path()
                );
            }
        }
    }

    #[test]
    fn inserted_child_is_found_as_exact_match() {
        let index = insert(&ChildIndex::empty(), "gamma", 42, SENSITIVE);
        match index.locate(target("gamma"), SENSITIVE) {
            PathRelationship::Exact { child_index } => {
                assert_eq!(*index.entries()[child_index].child(), 42);
            }
            other => panic!("expected exact match, got {other:?}"),
        }
    }

    #[test]
    fn removed_child_becomes_unrelated_at_former_position() {
        let mut index = ChildIndex::empty();
        for (position, segment) in ["alpha", "beta", "gamma"].into_iter().enumerate() {
            index = insert(&index, segment, position as u32, SENSITIVE);
        }
        let removed = index.with_removed_child(1);
        assert_eq!(removed.len(), 2);
        assert_eq!(
            removed.locate(target("beta"), SENSITIVE),
            PathRelationship::Unrelated { insertion_index: 1 }
        );
        // The original still finds it.
        assert_eq!(
            index.locate(target("beta"), SENSITIVE),
            PathRelationship::Exact { child_index: 1 }
        );
    }

    #[test]
    fn removal_collapses_to_singleton_and_empty() {
        let two = insert(
            &insert(&ChildIndex::empty(), "alpha", 0, SENSITIVE),
            "beta",
            1,
            SENSITIVE,
        );
        let one = two.with_removed_child(0);
        assert!(matches!(one.repr, Repr::Singleton(_)));
        assert_eq!(one, ChildIndex::singleton("beta", 1));

        let none = one.with_removed_child(0);
        assert!(none.is_empty());
        assert_eq!(none, ChildIndex::empty());
    }

    #[test]
    fn replace_with_identical_entry_shares_storage() {
        let index = insert(
            &insert(&ChildIndex::empty(), "alpha", 0, SENSITIVE),
            "beta",
            1,
            SENSITIVE,
        );
        let same = index.with_replaced_child(1, "beta", 1);
        assert!(same.shares_storage(&index));
        assert_eq!(same, index);

        let changed = index.with_replaced_child(1, "beta", 9);
        assert!(!changed.shares_storage(&index));
        assert_eq!(*changed.entries()[1].child(), 9);
        assert_eq!(*index.entries()[1].child(), 1);
    }

    #[test]
    fn replace_identity_holds_for_singleton() {
        let index = ChildIndex::singleton("only", 5);
        let same = index.with_replaced_child(0, "only", 5);
        assert!(same.shares_storage(&index));
        // A case-preserving rename is a real change even though lookups may
        // treat the spans as equal.
        let renamed = index.with_replaced_child(0, "Only", 5);
        assert!(!renamed.shares_storage(&index));
    }

    #[test]
    fn clones_share_storage() {
        let index = insert(
            &insert(&ChildIndex::empty(), "alpha", 0, SENSITIVE),
            "beta",
            1,
            SENSITIVE,
        );
        assert!(index.clone().shares_storage(&index));
    }

    #[test]
    fn equality_and_hash_ignore_construction_order() {
        let forward = insert(
            &insert(&ChildIndex::empty(), "alpha", 0, SENSITIVE),
            "beta",
            1,
            SENSITIVE,
        );
        let backward = insert(
            &insert(&ChildIndex::empty(), "beta", 1, SENSITIVE),
            "alpha",
            0,
            SENSITIVE,
        );
        let via_factory = ChildIndex::from_sorted_entries(
            vec![Entry::new("alpha", 0), Entry::new("beta", 1)],
            SENSITIVE,
        );
        assert_eq!(forward, backward);
        assert_eq!(forward, via_factory);
        assert_eq!(hash_of(&forward), hash_of(&backward));
        assert_eq!(hash_of(&forward), hash_of(&via_factory));
        assert!(!forward.shares_storage(&backward));
    }

    #[test]
    fn values_and_visit_follow_span_order() {
        let mut index = ChildIndex::empty();
        for (position, segment) in ["delta", "alpha", "charlie"].into_iter().enumerate() {
            index = insert(&index, segment, position as u32, SENSITIVE);
        }
        assert_eq!(index.values().copied().collect::<Vec<_>>(), vec![1, 2, 0]);

        let mut visited = Vec::new();
        index.visit_children(|span, child| visited.push((span.to_string(), *child)));
        assert_eq!(
            visited,
            vec![
                ("alpha".to_string(), 1),
                ("charlie".to_string(), 2),
                ("delta".to_string(), 0)
            ]
        );
    }

    #[test]
    fn scenario_from_empty_to_two_children() {
        let index = insert(
            &insert(&ChildIndex::empty(), "alpha", 100, SENSITIVE),
            "beta",
            200,
            SENSITIVE,
        );

        match index.locate(target("beta"), SENSITIVE) {
            PathRelationship::Exact { child_index } => {
                assert_eq!(*index.entries()[child_index].child(), 200);
            }
            other => panic!("expected exact match, got {other:?}"),
        }

        match index.locate(target("beta/gamma"), SENSITIVE) {
            PathRelationship::Descendant {
                child_index,
                path_in_child,
            } => {
                assert_eq!(*index.entries()[child_index].child(), 200);
                assert_eq!(path_in_child.as_str(), "gamma");
            }
            other => panic!("expected descendant, got {other:?}"),
        }

        assert_eq!(
            index.locate(target("alp"), SENSITIVE),
            PathRelationship::Unrelated { insertion_index: 0 }
        );

        match index.locate(target("ALPHA"), INSENSITIVE) {
            PathRelationship::Exact { child_index } => {
                assert_eq!(*index.entries()[child_index].child(), 100);
            }
            other => panic!("expected exact match, got {other:?}"),
        }
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn insertion_index_out_of_bounds() {
        ChildIndex::singleton("alpha", 0).with_new_child(2, "beta", 1);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn removal_index_out_of_bounds() {
        ChildIndex::<u32>::empty().with_removed_child(0);
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn replace_index_out_of_bounds() {
        ChildIndex::singleton("alpha", 0).with_replaced_child(1, "beta", 1);
    }

    #[test]
    #[should_panic(expected = "strictly ascending")]
    fn unsorted_entries_are_rejected() {
        ChildIndex::from_sorted_entries(
            vec![Entry::new("beta", 1), Entry::new("alpha", 0)],
            SENSITIVE,
        );
    }

    #[test]
    #[should_panic(expected = "strictly ascending")]
    fn duplicate_first_segments_are_rejected() {
        ChildIndex::from_sorted_entries(
            vec![Entry::new("shared/a", 0), Entry::new("shared/b", 1)],
            SENSITIVE,
        );
    }
}
