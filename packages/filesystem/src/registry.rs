//! One store per physical directory.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use lazy_static::lazy_static;

use crate::error::StoreError;
use crate::store::FilesystemResourceStore;

lazy_static! {
    static ref GLOBAL: StoreRegistry = StoreRegistry::new();
}

/// Cache of stores keyed by canonical directory.
///
/// Requests whose directories canonicalize to the same path always get the
/// same store. Equality is on the canonical path only: two spellings that
/// the filesystem treats as equal but that canonicalize differently (for
/// example case variants on a case-insensitive volume) get separate stores.
///
/// Construct one and pass it to whoever needs stores, or use
/// [`StoreRegistry::global`] for a process-wide instance.
#[derive(Default)]
pub struct StoreRegistry {
    stores: Mutex<HashMap<PathBuf, FilesystemResourceStore>>,
}

impl StoreRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, created on first use.
    pub fn global() -> &'static StoreRegistry {
        &GLOBAL
    }

    /// Get the store for `directory`, creating it on first request.
    ///
    /// The directory must exist, be a directory, and be readable. The same
    /// checks are repeated on the canonical form, which catches a target
    /// that changed in between or a path that only resolves to a
    /// non-directory after canonicalization.
    pub fn get_store(
        &self,
        directory: impl AsRef<Path>,
    ) -> Result<FilesystemResourceStore, StoreError> {
        let directory = directory.as_ref();
        validate_directory(directory)?;

        let canonical = fs::canonicalize(directory).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                StoreError::NotFound {
                    path: directory.to_path_buf(),
                }
            } else {
                StoreError::Canonicalize {
                    path: directory.to_path_buf(),
                    source,
                }
            }
        })?;
        validate_directory(&canonical)?;

        // Inserts are single operations, so a poisoned map is still consistent.
        let mut stores = self.stores.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(store) = stores.get(&canonical) {
            tracing::debug!(directory = %canonical.display(), "reusing store");
            return Ok(store.clone());
        }

        tracing::debug!(directory = %canonical.display(), "creating store");
        let store = FilesystemResourceStore::new(canonical.clone());
        stores.insert(canonical, store.clone());
        Ok(store)
    }

    /// Number of stores created so far.
    pub fn len(&self) -> usize {
        self.stores
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Check that `directory` exists, is a directory, and can be listed.
fn validate_directory(directory: &Path) -> Result<(), StoreError> {
    let metadata = fs::metadata(directory).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound {
                path: directory.to_path_buf(),
            }
        } else {
            StoreError::NotReadable {
                path: directory.to_path_buf(),
                source,
            }
        }
    })?;

    if !metadata.is_dir() {
        return Err(StoreError::NotDirectory {
            path: directory.to_path_buf(),
        });
    }

    fs::read_dir(directory).map_err(|source| StoreError::NotReadable {
        path: directory.to_path_buf(),
        source,
    })?;

    Ok(())
}
