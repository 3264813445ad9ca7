//! Shared handle for publishing the current snapshot tree.
//!
//! Tree values are immutable, so readers never need to coordinate with
//! writers: a reader grabs the current value and keeps using it for as long
//! as it likes, even across later updates. The lock here only arbitrates
//! which value is current.

use std::sync::RwLock;

use crate::error::Result;
use crate::tree::SnapshotTree;

/// Publishes the current snapshot tree to concurrent readers.
#[derive(Debug)]
pub struct SharedSnapshot {
    current: RwLock<SnapshotTree>,
}

impl SharedSnapshot {
    /// Creates a handle publishing `tree`.
    pub fn new(tree: SnapshotTree) -> Self {
        Self {
            current: RwLock::new(tree),
        }
    }

    /// Returns the currently published tree.
    ///
    /// The returned value is a cheap handle copy and stays valid and
    /// consistent regardless of later updates.
    pub fn current(&self) -> SnapshotTree {
        self.read_lock().clone()
    }

    /// Replaces the published tree.
    pub fn publish(&self, tree: SnapshotTree) {
        *self.write_lock() = tree;
    }

    /// Applies `update` to the current tree and publishes the result.
    ///
    /// The update runs under the write lock, so concurrent updates are
    /// serialized and none of them is lost.
    pub fn update(&self, update: impl FnOnce(&SnapshotTree) -> Result<SnapshotTree>) -> Result<()> {
        let mut guard = self.write_lock();
        let updated = update(&guard)?;
        log::debug!("publishing updated snapshot tree");
        *guard = updated;
        Ok(())
    }

    fn read_lock(&self) -> std::sync::RwLockReadGuard<'_, SnapshotTree> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_lock(&self) -> std::sync::RwLockWriteGuard<'_, SnapshotTree> {
        self.current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
