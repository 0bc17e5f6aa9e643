/// Error types
use thiserror::Error;

/// Why an import document was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("Invalid import file format")]
    InvalidFormat,

    #[error("Invalid space format in import file")]
    InvalidSpaceFormat,

    #[error("Invalid group format in import file")]
    InvalidGroupFormat,

    #[error("Invalid bookmark format in import file")]
    InvalidBookmarkFormat,
}

/// Failures of the collection mutation surface
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookmarkError {
    #[error("Name must be 1-30 characters: {0:?}")]
    InvalidName(String),

    #[error("Color must be a #RRGGBB hex value: {0:?}")]
    InvalidColor(String),

    #[error("Title is required.")]
    InvalidTitle,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Space not found: {0}")]
    SpaceNotFound(String),

    #[error("Group not found: {0}")]
    GroupNotFound(String),

    #[error("Bookmark not found: {0}")]
    BookmarkNotFound(String),

    #[error("The last space cannot be deleted")]
    LastSpace,

    #[error("Bookmarks have not been loaded from storage")]
    NotLoaded,

    #[error(transparent)]
    Import(#[from] ImportError),
}

/// Failures talking to the browser
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("Browser API not available")]
    Unavailable,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Bookmarks error: {0}")]
    Bookmarks(String),

    #[error("Tabs error: {0}")]
    Tabs(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for HostError {
    fn from(e: serde_json::Error) -> Self {
        HostError::Serialization(e.to_string())
    }
}
