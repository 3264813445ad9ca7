#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("path is empty")]
    EmptyPath,

    #[error("path is not relative: {0}")]
    NotRelative(String),

    #[error("path contains an empty segment: {0}")]
    EmptySegment(String),
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
