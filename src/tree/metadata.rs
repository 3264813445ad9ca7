//! File metadata captured by snapshots.
//!
//! These are plain value types; producing them from a real filesystem is the
//! responsibility of whatever feeds the tree.

use serde::{Deserialize, Serialize};

/// File type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    File,
    Directory,
    Symlink,
    Other,
}

impl FileType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Other => "other",
        }
    }
}

/// Metadata captured for one filesystem entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileMetadata {
    pub file_type: FileType,
    /// Size in bytes; zero for directories.
    pub size: u64,
    /// Modification time as a unix timestamp.
    pub mtime: u64,
}

impl FileMetadata {
    /// Metadata for a regular file.
    pub fn file(size: u64, mtime: u64) -> Self {
        Self {
            file_type: FileType::File,
            size,
            mtime,
        }
    }

    /// Metadata for a directory.
    pub fn directory(mtime: u64) -> Self {
        Self {
            file_type: FileType::Directory,
            size: 0,
            mtime,
        }
    }
}
