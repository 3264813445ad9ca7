//! Ordered search over index entries.

use crate::case::CaseSensitivity;
use crate::path::RelativePath;

use super::entry::Entry;

/// Binary-searches `entries` for the one whose first segment matches the
/// target's first segment.
///
/// Entries must be sorted ascending by first segment under `case`, with
/// distinct first segments. Returns `Ok(index)` on a match and
/// `Err(insertion_index)` otherwise, where `insertion_index` is the position
/// at which a new entry for the target would keep the order. Each probe
/// performs exactly one comparison.
pub(crate) fn find_child_index<T>(
    entries: &[Entry<T>],
    target: RelativePath<'_>,
    case: CaseSensitivity,
) -> Result<usize, usize> {
    entries.binary_search_by(|entry| target.compare_first_segment(entry.path(), case).reverse())
}
