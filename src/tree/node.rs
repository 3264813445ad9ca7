//! Snapshot tree nodes.

use std::sync::Arc;

use crate::children::ChildIndex;

use super::metadata::FileMetadata;

/// One immutable node of a snapshot tree.
///
/// Nodes are always held behind [`Arc`] so that an updated tree shares every
/// unchanged subtree with its predecessor. A node without metadata is a
/// structural node: it was introduced by splitting a compressed span and
/// carries children but no snapshot of its own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SnapshotNode {
    metadata: Option<FileMetadata>,
    children: ChildIndex<Arc<SnapshotNode>>,
}

impl SnapshotNode {
    /// Creates a node with the given metadata and children.
    pub fn new(metadata: Option<FileMetadata>, children: ChildIndex<Arc<SnapshotNode>>) -> Self {
        Self { metadata, children }
    }

    /// Creates a node with metadata and no children.
    pub fn leaf(metadata: FileMetadata) -> Self {
        Self {
            metadata: Some(metadata),
            children: ChildIndex::empty(),
        }
    }

    /// Returns the node's metadata, if any was captured.
    #[inline]
    pub fn metadata(&self) -> Option<&FileMetadata> {
        self.metadata.as_ref()
    }

    /// Returns the node's children index.
    #[inline]
    pub fn children(&self) -> &ChildIndex<Arc<SnapshotNode>> {
        &self.children
    }
}
