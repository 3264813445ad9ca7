//! Persistent children index and snapshot tree for a virtual filesystem cache.
//!
//! This crate provides the in-memory building blocks of an incremental-build
//! VFS cache:
//! - A copy-on-write children index mapping path spans to child payloads
//! - Prefix-aware ordered search over index entries
//! - Path relationship classification (exact, descendant, common prefix,
//!   unrelated)
//! - A snapshot tree built on the index, with store/invalidate updates that
//!   share unchanged branches between versions
//! - A shared handle for publishing the current tree across threads
//!
//! All index and tree values are immutable after construction; updates return
//! new values and never touch the old ones, so any version can be read
//! concurrently without locking.

pub mod case;
pub mod children;
pub mod error;
pub mod path;
pub mod shared;
pub mod tree;

// Re-export main types
pub use case::CaseSensitivity;
pub use children::{ChildIndex, Entry, PathRelationship};
pub use error::{Result, SnapshotError};
pub use path::RelativePath;
pub use shared::SharedSnapshot;
pub use tree::{FileMetadata, FileType, SnapshotNode, SnapshotTree};
