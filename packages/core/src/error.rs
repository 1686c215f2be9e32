//! Error types shared by every store kind.

use crate::path::PathError;

/// Errors raised through the resource contracts.
///
/// Every variant names the path or location it concerns so callers can
/// diagnose failures without further context.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The path failed the generic path grammar.
    #[error("invalid path: {0}")]
    InvalidPath(#[from] PathError),

    /// The path is valid in general but not acceptable to this store.
    #[error("invalid argument for path {path}: {message}")]
    InvalidArgument { path: String, message: String },

    /// The resource does not exist right now.
    #[error("not found: {location}")]
    NotFound { location: String },

    /// The operation is not allowed in the connection's current state.
    #[error("invalid state for {resource}: {message}")]
    InvalidState { resource: String, message: String },

    /// Any other I/O failure from the underlying store.
    #[error("i/o error on {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Build an error from an I/O failure.
    ///
    /// A missing entry, or a parent component that is not a directory,
    /// becomes [`Error::NotFound`]: in both cases nothing exists at the location.
    pub fn from_io(location: impl Into<String>, source: std::io::Error) -> Self {
        let location = location.into();
        match source.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory => {
                Error::NotFound { location }
            }
            _ => Error::Io { location, source },
        }
    }

    /// Whether this is a [`Error::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Whether this is a [`Error::InvalidState`].
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, Error::InvalidState { .. })
    }
}

/// Result type alias for resource operations.
pub type Result<T> = std::result::Result<T, Error>;
