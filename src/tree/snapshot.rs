//! The snapshot tree value and its copy-on-write update operations.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::case::CaseSensitivity;
use crate::children::{ChildIndex, Entry, PathRelationship};
use crate::error::Result;
use crate::path::RelativePath;

use super::metadata::FileMetadata;
use super::node::SnapshotNode;

type Children = ChildIndex<Arc<SnapshotNode>>;

/// An immutable hierarchical snapshot of a directory tree.
///
/// The tree is a value: [`SnapshotTree::store`] and
/// [`SnapshotTree::invalidate`] return new trees and leave the receiver
/// untouched. All branches not on the updated path are shared between the
/// old and the new tree. Which tree value is "current" is decided by the
/// owner, typically through [`crate::shared::SharedSnapshot`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotTree {
    case_sensitivity: CaseSensitivity,
    children: Children,
}

impl SnapshotTree {
    /// Creates an empty tree using the given case policy for all lookups
    /// and updates.
    pub fn new(case_sensitivity: CaseSensitivity) -> Self {
        Self {
            case_sensitivity,
            children: ChildIndex::empty(),
        }
    }

    /// Returns the case policy this tree was built with.
    #[inline]
    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case_sensitivity
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Returns the root children index.
    pub fn children(&self) -> &Children {
        &self.children
    }

    /// Looks up the node stored at `path`.
    ///
    /// Returns `None` when the path is unknown or only covered by a
    /// compressed span without a node of its own.
    pub fn find(&self, path: &str) -> Result<Option<&Arc<SnapshotNode>>> {
        let target = RelativePath::new(path)?;
        Ok(find_in(&self.children, target, self.case_sensitivity))
    }

    /// Returns a new tree with `metadata` stored at `path`.
    ///
    /// Existing children of a re-stored node are kept. Storing metadata that
    /// is already present is a no-op that returns a tree sharing all storage
    /// with the receiver.
    pub fn store(&self, path: &str, metadata: FileMetadata) -> Result<Self> {
        let target = RelativePath::new(path)?;
        log::trace!("storing snapshot at {target}");
        let children = store_in(&self.children, target, self.case_sensitivity, metadata);
        Ok(Self {
            case_sensitivity: self.case_sensitivity,
            children,
        })
    }

    /// Returns a new tree with `path` and everything below it removed.
    ///
    /// Invalidating a path that is an ancestor of a stored span removes the
    /// covered subtree; invalidating an unknown path returns a tree sharing
    /// all storage with the receiver.
    pub fn invalidate(&self, path: &str) -> Result<Self> {
        let target = RelativePath::new(path)?;
        log::trace!("invalidating {target}");
        let children = invalidate_in(&self.children, target, self.case_sensitivity);
        Ok(Self {
            case_sensitivity: self.case_sensitivity,
            children,
        })
    }
}

fn find_in<'a>(
    children: &'a Children,
    target: RelativePath<'_>,
    case: CaseSensitivity,
) -> Option<&'a Arc<SnapshotNode>> {
    match children.locate(target, case) {
        PathRelationship::Exact { child_index } => Some(children.entries()[child_index].child()),
        PathRelationship::Descendant {
            child_index,
            path_in_child,
        } => find_in(
            children.entries()[child_index].child().children(),
            path_in_child,
            case,
        ),
        PathRelationship::CommonPrefix { .. } | PathRelationship::Unrelated { .. } => None,
    }
}

fn store_in(
    children: &Children,
    target: RelativePath<'_>,
    case: CaseSensitivity,
    metadata: FileMetadata,
) -> Children {
    match children.locate(target, case) {
        PathRelationship::Unrelated { insertion_index } => children.with_new_child(
            insertion_index,
            target.as_str(),
            Arc::new(SnapshotNode::leaf(metadata)),
        ),
        PathRelationship::Exact { child_index } => {
            let entry = &children.entries()[child_index];
            let child = entry.child();
            if child.metadata() == Some(&metadata) {
                return children.clone();
            }
            let node = SnapshotNode::new(Some(metadata), child.children().clone());
            children.with_replaced_child(child_index, entry.path(), Arc::new(node))
        }
        PathRelationship::Descendant {
            child_index,
            path_in_child,
        } => {
            let entry = &children.entries()[child_index];
            let child = entry.child();
            let updated = store_in(child.children(), path_in_child, case, metadata);
            if updated.shares_storage(child.children()) {
                return children.clone();
            }
            let node = SnapshotNode::new(child.metadata().cloned(), updated);
            children.with_replaced_child(child_index, entry.path(), Arc::new(node))
        }
        PathRelationship::CommonPrefix {
            child_index,
            common_prefix_len,
        } => {
            let entry = &children.entries()[child_index];
            let prefix = &entry.path()[..common_prefix_len];
            let child_suffix = &entry.path()[common_prefix_len + 1..];
            log::debug!(
                "splitting span {:?} at {common_prefix_len} to store {target}",
                entry.path()
            );
            let node = if common_prefix_len == target.len() {
                // The target is the shared prefix itself; the old child moves
                // one level down.
                SnapshotNode::new(
                    Some(metadata),
                    ChildIndex::singleton(child_suffix, Arc::clone(entry.child())),
                )
            } else {
                let demoted = Entry::new(child_suffix, Arc::clone(entry.child()));
                let sibling = Entry::new(
                    target.descend(common_prefix_len).as_str(),
                    Arc::new(SnapshotNode::leaf(metadata)),
                );
                SnapshotNode::new(None, split_pair(demoted, sibling, case))
            };
            children.with_replaced_child(child_index, prefix, Arc::new(node))
        }
    }
}

/// Orders the two entries produced by a span split.
///
/// Their first segments always differ, otherwise the common prefix would
/// have extended further.
fn split_pair(a: Entry<Arc<SnapshotNode>>, b: Entry<Arc<SnapshotNode>>, case: CaseSensitivity) -> Children {
    let first = RelativePath::trusted(a.path()).compare_first_segment(b.path(), case);
    let ordered = match first {
        Ordering::Less => vec![a, b],
        _ => vec![b, a],
    };
    ChildIndex::from_sorted_entries(ordered, case)
}

fn invalidate_in(children: &Children, target: RelativePath<'_>, case: CaseSensitivity) -> Children {
    match children.locate(target, case) {
        PathRelationship::Unrelated { .. } => children.clone(),
        PathRelationship::Exact { child_index } => children.with_removed_child(child_index),
        PathRelationship::CommonPrefix {
            child_index,
            common_prefix_len,
        } => {
            if common_prefix_len == target.len() {
                // The target covers the child's span, so the whole subtree
                // goes away.
                children.with_removed_child(child_index)
            } else {
                children.clone()
            }
        }
        PathRelationship::Descendant {
            child_index,
            path_in_child,
        } => {
            let entry = &children.entries()[child_index];
            let child = entry.child();
            let updated = invalidate_in(child.children(), path_in_child, case);
            if updated.shares_storage(child.children()) {
                return children.clone();
            }
            if child.metadata().is_none() {
                if updated.is_empty() {
                    return children.with_removed_child(child_index);
                }
                if updated.len() == 1 {
                    // A structural node with a single remaining branch is the
                    // inverse of a split; fold it back into one span.
                    let grandchild = &updated.entries()[0];
                    let merged = format!("{}/{}", entry.path(), grandchild.path());
                    log::debug!("recompressing {merged:?} after invalidation");
                    return children.with_replaced_child(
                        child_index,
                        merged,
                        Arc::clone(grandchild.child()),
                    );
                }
            }
            let node = SnapshotNode::new(child.metadata().cloned(), updated);
            children.with_replaced_child(child_index, entry.path(), Arc::new(node))
        }
    }
}
