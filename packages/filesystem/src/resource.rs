//! A single resource within a filesystem store.

use std::fmt;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use semres_core::{Error, Resource, ResourceConnection, ResourcePath, Result};

use crate::connection::FilesystemResourceConnection;
use crate::store::FilesystemResourceStore;

/// Check the filesystem-specific restriction on resource paths.
///
/// On top of the generic path grammar, a path may not contain the native
/// directory separator when that separator is not `/`. On hosts where it
/// is `/` this always passes.
pub fn check_filesystem_path(path: &ResourcePath) -> Result<()> {
    check_separator(path, MAIN_SEPARATOR)
}

fn check_separator(path: &ResourcePath, separator: char) -> Result<()> {
    if separator != '/' && path.as_str().contains(separator) {
        return Err(Error::InvalidArgument {
            path: path.to_string(),
            message: format!("path may not contain file separator character ({separator})"),
        });
    }
    Ok(())
}

/// A resource bound to its store, path and native file location.
///
/// The native location is computed once, when the store creates the
/// resource, and never recomputed.
#[derive(Clone)]
pub struct FilesystemResource {
    store: FilesystemResourceStore,
    path: ResourcePath,
    file: PathBuf,
}

impl FilesystemResource {
    /// Bind `path` in `store` to the native `file`.
    pub fn new(store: FilesystemResourceStore, path: ResourcePath, file: PathBuf) -> Result<Self> {
        check_filesystem_path(&path)?;
        Ok(Self { store, path, file })
    }

    pub fn store(&self) -> &FilesystemResourceStore {
        &self.store
    }

    pub fn path(&self) -> &ResourcePath {
        &self.path
    }

    /// The native location of this resource, whether or not it exists.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Direct file access is always preferred over streaming here.
    pub fn is_file_preferred(&self) -> bool {
        true
    }

    /// Open a new connection. No I/O is performed.
    pub fn open(&self) -> FilesystemResourceConnection {
        FilesystemResourceConnection::new(self.clone())
    }
}

impl fmt::Display for FilesystemResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.store.resource_url(&self.path) {
            Some(url) => f.write_str(url.as_str()),
            // The store form always ends with '/'.
            None => write!(f, "{}{}", self.store, &self.path.as_str()[1..]),
        }
    }
}

impl fmt::Debug for FilesystemResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilesystemResource")
            .field("path", &self.path)
            .field("file", &self.file)
            .finish()
    }
}

impl Resource for FilesystemResource {
    fn path(&self) -> &ResourcePath {
        FilesystemResource::path(self)
    }

    fn is_file_preferred(&self) -> bool {
        FilesystemResource::is_file_preferred(self)
    }

    fn open(&self) -> Result<Box<dyn ResourceConnection>> {
        Ok(Box::new(FilesystemResource::open(self)))
    }
}
