//! A resource store rooted at a local directory.

use std::fmt;
use std::path::{Path, PathBuf, MAIN_SEPARATOR_STR};
use std::sync::Arc;

use url::Url;

use semres_core::{Resource, ResourcePath, ResourceStore, Result};

use crate::resource::{check_filesystem_path, FilesystemResource};

/// Translate a resource path into a native location under `directory`.
///
/// `/` maps to `directory` itself. Any other path has its leading `/` and
/// optional trailing `/` removed, each remaining `/` replaced by the native
/// separator, and is joined onto `directory`. The filesystem is not touched.
pub fn translate_path(directory: &Path, path: &ResourcePath) -> PathBuf {
    if path.is_root() {
        return directory.to_path_buf();
    }
    let subpath = &path.as_str()[1..];
    let subpath = subpath.strip_suffix('/').unwrap_or(subpath);
    let file = directory.join(subpath.replace('/', MAIN_SEPARATOR_STR));
    tracing::trace!(path = %path, file = %file.display(), "translated resource path");
    file
}

/// Resources under one canonical directory.
///
/// Handles are cheap to clone and all clones refer to the same store.
/// Obtain stores through [`StoreRegistry`](crate::StoreRegistry) so that
/// each physical directory has exactly one.
#[derive(Clone)]
pub struct FilesystemResourceStore {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    directory: PathBuf,
    /// `None` when the directory has no `file:` URL form.
    url: Option<Url>,
}

impl FilesystemResourceStore {
    /// Wrap an already validated, canonical directory.
    pub(crate) fn new(directory: PathBuf) -> Self {
        let url = Url::from_directory_path(&directory).ok();
        Self {
            inner: Arc::new(StoreInner { directory, url }),
        }
    }

    /// The `file:` URL of a resource path under this store, each segment
    /// percent-encoded.
    pub(crate) fn resource_url(&self, path: &ResourcePath) -> Option<Url> {
        let mut url = self.inner.url.clone()?;
        if !path.is_root() {
            let mut segments = url.path_segments_mut().ok()?;
            segments.pop_if_empty().extend(path.segments());
            if path.has_trailing_slash() {
                segments.push("");
            }
        }
        Some(url)
    }

    /// The canonical base directory of this store.
    pub fn directory(&self) -> &Path {
        &self.inner.directory
    }

    /// Always true: the directory was validated when the store was created
    /// and is not checked again.
    pub fn is_available(&self) -> bool {
        true
    }

    /// Get the resource at `path`.
    ///
    /// Fails with [`semres_core::Error::InvalidArgument`] if the path embeds
    /// the native separator on hosts where that is not `/`.
    pub fn get_resource(&self, path: &ResourcePath) -> Result<FilesystemResource> {
        check_filesystem_path(path)?;
        let file = translate_path(self.directory(), path);
        FilesystemResource::new(self.clone(), path.clone(), file)
    }

    /// Whether two handles refer to the same store instance.
    pub fn ptr_eq(&self, other: &FilesystemResourceStore) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Display for FilesystemResourceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.url {
            Some(url) => f.write_str(url.as_str()),
            None => write!(f, "file://{}/", self.inner.directory.display()),
        }
    }
}

impl fmt::Debug for FilesystemResourceStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilesystemResourceStore")
            .field("directory", &self.inner.directory)
            .finish()
    }
}

impl ResourceStore for FilesystemResourceStore {
    fn is_available(&self) -> bool {
        FilesystemResourceStore::is_available(self)
    }

    fn get_resource(&self, path: &ResourcePath) -> Result<Box<dyn Resource>> {
        Ok(Box::new(FilesystemResourceStore::get_resource(self, path)?))
    }
}
