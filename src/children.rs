//! Copy-on-write children index for snapshot tree nodes.
//!
//! Every node of a snapshot tree owns a [`ChildIndex`] mapping relative path
//! spans to child payloads. The index is an immutable value: updates return a
//! new index that shares child payloads with the old one, so unrelated
//! branches of a snapshot are never copied when one node changes.
//!
//! ## Module Structure
//!
//! - `entry` - Immutable (path span, child) pairs
//! - `search` - Ordered binary search keyed by first segments
//! - `relationship` - Classification of a target path against the children
//! - `index` - The `ChildIndex` container and its update operations

mod entry;
mod index;
mod relationship;
mod search;

// Re-export public types
pub use entry::Entry;
pub use index::ChildIndex;
pub use relationship::PathRelationship;
