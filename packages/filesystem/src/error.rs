//! Errors raised while obtaining a store for a directory.

use std::io;
use std::path::PathBuf;

/// Configuration errors from [`StoreRegistry::get_store`](crate::StoreRegistry::get_store).
///
/// These are fatal to the call that raised them. Nothing is retried; a
/// caller may try again later, for example once the directory appears.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The directory does not exist.
    #[error("directory not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The path exists but is not a directory.
    #[error("not a directory: {}", path.display())]
    NotDirectory { path: PathBuf },

    /// The directory exists but cannot be listed.
    #[error("unable to read directory {}: {source}", path.display())]
    NotReadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Symlinks or relative segments could not be resolved.
    #[error("unable to canonicalize {}: {source}", path.display())]
    Canonicalize {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// The directory this error concerns.
    pub fn path(&self) -> &std::path::Path {
        match self {
            StoreError::NotFound { path }
            | StoreError::NotDirectory { path }
            | StoreError::NotReadable { path, .. }
            | StoreError::Canonicalize { path, .. } => path,
        }
    }
}

impl From<StoreError> for semres_core::Error {
    fn from(error: StoreError) -> Self {
        let location = error.path().display().to_string();
        match error {
            StoreError::NotFound { .. } => semres_core::Error::NotFound { location },
            StoreError::NotDirectory { .. } => semres_core::Error::Io {
                location,
                source: io::Error::other("not a directory"),
            },
            StoreError::NotReadable { source, .. } | StoreError::Canonicalize { source, .. } => {
                semres_core::Error::Io { location, source }
            }
        }
    }
}
