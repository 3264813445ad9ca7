//! Classification of a target path against the children of an index.

use crate::case::CaseSensitivity;
use crate::path::RelativePath;

use super::entry::Entry;
use super::search;

/// How a target path relates to the children of an index.
///
/// Produced by [`super::ChildIndex::locate`]; the owning tree layer matches
/// on the outcome to descend, split, insert, or report a miss. Classification
/// never mutates the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathRelationship<'a> {
    /// The target path is exactly one child's stored span.
    Exact {
        /// Position of the matched entry.
        child_index: usize,
    },
    /// The target path continues below one child's stored span.
    Descendant {
        /// Position of the matched entry.
        child_index: usize,
        /// The target path relative to the matched child.
        path_in_child: RelativePath<'a>,
    },
    /// The target shares a leading span with one child but ends or diverges
    /// inside that child's stored span.
    ///
    /// When `common_prefix_len` equals the target's full length the target is
    /// a strict ancestor of the child; otherwise the two part ways after the
    /// shared prefix and a sibling entry is needed for the target's
    /// remainder. Either way the caller splits the child at
    /// `common_prefix_len`.
    CommonPrefix {
        /// Position of the matched entry.
        child_index: usize,
        /// Byte length of the shared whole-segment prefix.
        common_prefix_len: usize,
    },
    /// No child shares a first segment with the target.
    Unrelated {
        /// Position at which a new entry for the target keeps the order.
        insertion_index: usize,
    },
}

/// Locates the child related to `target` and classifies the relationship.
pub(crate) fn classify<'a, T>(
    entries: &[Entry<T>],
    target: RelativePath<'a>,
    case: CaseSensitivity,
) -> PathRelationship<'a> {
    match search::find_child_index(entries, target, case) {
        Err(insertion_index) => PathRelationship::Unrelated { insertion_index },
        Ok(child_index) => {
            let span = entries[child_index].path();
            let common = target.common_prefix_len(span, case);
            debug_assert!(common > 0, "matched entries share at least one segment");
            if common == span.len() {
                if common == target.len() {
                    PathRelationship::Exact { child_index }
                } else {
                    PathRelationship::Descendant {
                        child_index,
                        path_in_child: target.descend(common),
                    }
                }
            } else {
                PathRelationship::CommonPrefix {
                    child_index,
                    common_prefix_len: common,
                }
            }
        }
    }
}
