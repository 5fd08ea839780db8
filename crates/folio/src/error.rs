#![forbid(unsafe_code)]

//! Page-level errors.
//!
//! Nothing here is fatal to a running page: callers log the error and skip
//! the one feature it affects.

use std::fmt;

use folio_runtime::state_persistence::StorageError;

/// Errors raised while wiring or driving the page.
#[derive(Debug)]
pub enum PageError {
    /// An element the feature needs is absent from the page layout.
    MissingElement(&'static str),
    /// A navigation link points at a section that does not exist.
    UnknownTarget(String),
    /// The page layout could not be parsed or is inconsistent.
    InvalidLayout(String),
    /// Preference storage failed.
    Storage(StorageError),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingElement(what) => write!(f, "page element not found: {what}"),
            Self::UnknownTarget(target) => write!(f, "target section not found: {target}"),
            Self::InvalidLayout(msg) => write!(f, "invalid page layout: {msg}"),
            Self::Storage(e) => write!(f, "preference storage: {e}"),
        }
    }
}

impl std::error::Error for PageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

impl From<StorageError> for PageError {
    fn from(e: StorageError) -> Self {
        Self::Storage(e)
    }
}

/// Result alias for page operations.
pub type PageResult<T> = Result<T, PageError>;
