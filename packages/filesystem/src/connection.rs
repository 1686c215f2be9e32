//! Connections: one session of access to a filesystem resource.
//!
//! ## States
//!
//! ```text
//! Open ──input_stream()──▶ StreamGranted ──┐
//!   │                                      │
//!   └────────file()──────▶ HandleGranted ──┼──close()──▶ Closed
//!   │                                      │
//!   └──────────────────────────────────────┘
//! ```
//!
//! Metadata queries are allowed in every state except `Closed`. Stream and
//! file access exclude each other for the life of the connection.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::{DateTime, Utc};
use semres_core::{Error, ResourceConnection, Result};

use crate::resource::FilesystemResource;

/// Where a connection is in its access lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessState {
    /// No data access granted yet.
    Open,
    /// An input stream was opened; file access is refused from now on.
    StreamGranted,
    /// The native file was handed out; stream access is refused from now on.
    HandleGranted,
    /// Terminal. Every operation fails.
    Closed,
}

/// A session over one [`FilesystemResource`].
///
/// Not synchronized: drive a connection from one place at a time. The
/// stream, if any, is released by [`close`](Self::close) or on drop.
pub struct FilesystemResourceConnection {
    resource: FilesystemResource,
    state: AccessState,
    /// Present exactly when `state` is `StreamGranted`.
    stream: Option<BufReader<File>>,
}

impl FilesystemResourceConnection {
    pub(crate) fn new(resource: FilesystemResource) -> Self {
        tracing::debug!(resource = %resource, "opened connection");
        Self {
            resource,
            state: AccessState::Open,
            stream: None,
        }
    }

    pub fn resource(&self) -> &FilesystemResource {
        &self.resource
    }

    pub fn state(&self) -> AccessState {
        self.state
    }

    fn invalid_state(&self, message: &str) -> Error {
        Error::InvalidState {
            resource: self.resource.to_string(),
            message: message.to_string(),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.state == AccessState::Closed {
            return Err(self.invalid_state("connection closed"));
        }
        Ok(())
    }

    fn location(&self) -> String {
        self.resource.file().display().to_string()
    }

    fn metadata(&self) -> Result<fs::Metadata> {
        self.ensure_open()?;
        fs::metadata(self.resource.file()).map_err(|e| Error::from_io(self.location(), e))
    }

    /// Whether the native file exists right now. Not cached.
    pub fn exists(&self) -> Result<bool> {
        match self.metadata() {
            Ok(_) => Ok(true),
            Err(Error::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Size of the native file in bytes.
    pub fn length(&self) -> Result<u64> {
        Ok(self.metadata()?.len())
    }

    /// Modification time of the native file.
    pub fn last_modified(&self) -> Result<DateTime<Utc>> {
        let modified = self
            .metadata()?
            .modified()
            .map_err(|e| Error::from_io(self.location(), e))?;
        Ok(DateTime::<Utc>::from(modified))
    }

    /// Open the native file for reading.
    ///
    /// Allowed once per connection, and only if [`file`](Self::file) has not
    /// been called. A missing file, or a directory, fails with
    /// [`Error::NotFound`] and leaves the state unchanged.
    pub fn input_stream(&mut self) -> Result<&mut BufReader<File>> {
        match self.state {
            AccessState::Open => {}
            AccessState::StreamGranted => return Err(self.invalid_state("input already opened")),
            AccessState::HandleGranted => return Err(self.invalid_state("file already accessed")),
            AccessState::Closed => return Err(self.invalid_state("connection closed")),
        }

        // Directories are never streamed, even where the platform can open them.
        if self.metadata()?.is_dir() {
            return Err(Error::NotFound {
                location: self.location(),
            });
        }
        let file =
            File::open(self.resource.file()).map_err(|e| Error::from_io(self.location(), e))?;
        self.state = AccessState::StreamGranted;
        Ok(self.stream.insert(BufReader::new(file)))
    }

    /// The native file location, for callers that prefer direct access.
    ///
    /// May be called repeatedly. Refused once a stream has been opened, and
    /// fails with [`Error::NotFound`] if the file does not exist right now.
    pub fn file(&mut self) -> Result<&Path> {
        match self.state {
            AccessState::Open | AccessState::HandleGranted => {}
            AccessState::StreamGranted => return Err(self.invalid_state("input already opened")),
            AccessState::Closed => return Err(self.invalid_state("connection closed")),
        }

        if !self.exists()? {
            return Err(Error::NotFound {
                location: self.location(),
            });
        }
        self.state = AccessState::HandleGranted;
        Ok(self.resource.file())
    }

    /// End the session and release the stream, if any. Safe to call again.
    pub fn close(&mut self) -> Result<()> {
        if self.state != AccessState::Closed {
            tracing::debug!(resource = %self.resource, state = ?self.state, "closing connection");
        }
        self.stream = None;
        self.state = AccessState::Closed;
        Ok(())
    }
}

impl Drop for FilesystemResourceConnection {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

impl fmt::Display for FilesystemResourceConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.resource, f)
    }
}

impl fmt::Debug for FilesystemResourceConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilesystemResourceConnection")
            .field("resource", &self.resource)
            .field("state", &self.state)
            .finish()
    }
}

impl ResourceConnection for FilesystemResourceConnection {
    fn exists(&self) -> Result<bool> {
        FilesystemResourceConnection::exists(self)
    }

    fn length(&self) -> Result<u64> {
        FilesystemResourceConnection::length(self)
    }

    fn last_modified(&self) -> Result<DateTime<Utc>> {
        FilesystemResourceConnection::last_modified(self)
    }

    fn input_stream(&mut self) -> Result<&mut dyn Read> {
        let stream: &mut dyn Read = FilesystemResourceConnection::input_stream(self)?;
        Ok(stream)
    }

    fn file(&mut self) -> Result<&Path> {
        FilesystemResourceConnection::file(self)
    }

    fn close(&mut self) -> Result<()> {
        FilesystemResourceConnection::close(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::FilesystemResourceStore;
    use semres_core::path;
    use std::time::{Duration, SystemTime};
    use tempfile::TempDir;

    fn fixture() -> (TempDir, FilesystemResourceStore) {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.txt"), b"0123456789").unwrap();
        let store = FilesystemResourceStore::new(temp.path().to_path_buf());
        (temp, store)
    }

    fn connect(store: &FilesystemResourceStore, p: &str) -> FilesystemResourceConnection {
        store.get_resource(&path!(p)).unwrap().open()
    }

    #[test]
    fn metadata_of_existing_file() {
        let (temp, store) = fixture();
        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
        File::options()
            .write(true)
            .open(temp.path().join("a.txt"))
            .unwrap()
            .set_modified(mtime)
            .unwrap();

        let conn = connect(&store, "/a.txt");
        assert_eq!(conn.state(), AccessState::Open);
        assert!(conn.exists().unwrap());
        assert_eq!(conn.length().unwrap(), 10);
        assert_eq!(conn.last_modified().unwrap(), DateTime::<Utc>::from(mtime));
    }

    #[test]
    fn metadata_of_missing_file() {
        let (_temp, store) = fixture();
        let conn = connect(&store, "/absent.txt");
        assert!(!conn.exists().unwrap());
        assert!(conn.length().unwrap_err().is_not_found());
        assert!(conn.last_modified().unwrap_err().is_not_found());
    }

    #[test]
    fn metadata_below_regular_file() {
        let (_temp, store) = fixture();
        let mut conn = connect(&store, "/a.txt/b");
        assert!(!conn.exists().unwrap());
        assert!(conn.length().unwrap_err().is_not_found());
        assert!(conn.last_modified().unwrap_err().is_not_found());
        assert!(conn.file().unwrap_err().is_not_found());
        assert!(conn.input_stream().unwrap_err().is_not_found());
        assert_eq!(conn.state(), AccessState::Open);
    }

    #[test]
    fn directory_stream_refused_then_file_allowed() {
        let (temp, store) = fixture();
        let mut conn = connect(&store, "/");
        assert!(conn.input_stream().unwrap_err().is_not_found());
        assert_eq!(conn.state(), AccessState::Open);
        assert!(conn.stream.is_none());

        assert_eq!(conn.file().unwrap(), temp.path());
        assert_eq!(conn.state(), AccessState::HandleGranted);
    }

    #[test]
    fn exists_reflects_live_state() {
        let (temp, store) = fixture();
        let conn = connect(&store, "/late.txt");
        assert!(!conn.exists().unwrap());

        fs::write(temp.path().join("late.txt"), b"abc").unwrap();
        assert!(conn.exists().unwrap());
        assert_eq!(conn.length().unwrap(), 3);
    }

    #[test]
    fn stream_reads_contents() {
        let (_temp, store) = fixture();
        let mut conn = connect(&store, "/a.txt");

        let mut contents = String::new();
        conn.input_stream()
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "0123456789");
        assert_eq!(conn.state(), AccessState::StreamGranted);

        // Metadata is still available.
        assert_eq!(conn.length().unwrap(), 10);
    }

    #[test]
    fn second_stream_refused() {
        let (_temp, store) = fixture();
        let mut conn = connect(&store, "/a.txt");
        conn.input_stream().unwrap();
        assert!(conn.input_stream().unwrap_err().is_invalid_state());
    }

    #[test]
    fn file_after_stream_refused() {
        let (_temp, store) = fixture();
        let mut conn = connect(&store, "/a.txt");
        conn.input_stream().unwrap();
        assert!(conn.file().unwrap_err().is_invalid_state());
    }

    #[test]
    fn stream_after_file_refused() {
        let (_temp, store) = fixture();
        let mut conn = connect(&store, "/a.txt");
        conn.file().unwrap();
        assert_eq!(conn.state(), AccessState::HandleGranted);
        assert!(conn.input_stream().unwrap_err().is_invalid_state());
    }

    #[test]
    fn repeated_file_allowed() {
        let (temp, store) = fixture();
        let mut conn = connect(&store, "/a.txt");
        let expected = temp.path().join("a.txt");
        assert_eq!(conn.file().unwrap(), expected);
        assert_eq!(conn.file().unwrap(), expected);
        assert_eq!(conn.state(), AccessState::HandleGranted);
    }

    #[test]
    fn missing_file_not_granted() {
        let (_temp, store) = fixture();
        let mut conn = connect(&store, "/absent.txt");
        assert!(conn.file().unwrap_err().is_not_found());
        assert_eq!(conn.state(), AccessState::Open);

        assert!(conn.input_stream().unwrap_err().is_not_found());
        assert_eq!(conn.state(), AccessState::Open);
    }

    #[test]
    fn everything_refused_after_close() {
        let (_temp, store) = fixture();
        let mut conn = connect(&store, "/a.txt");
        conn.close().unwrap();
        assert_eq!(conn.state(), AccessState::Closed);

        assert!(conn.exists().unwrap_err().is_invalid_state());
        assert!(conn.length().unwrap_err().is_invalid_state());
        assert!(conn.last_modified().unwrap_err().is_invalid_state());
        assert!(conn.input_stream().unwrap_err().is_invalid_state());
        assert!(conn.file().unwrap_err().is_invalid_state());
    }

    #[test]
    fn close_releases_stream_and_is_idempotent() {
        let (_temp, store) = fixture();
        let mut conn = connect(&store, "/a.txt");
        conn.input_stream().unwrap();
        assert!(conn.stream.is_some());

        conn.close().unwrap();
        assert!(conn.stream.is_none());
        conn.close().unwrap();
        assert_eq!(conn.state(), AccessState::Closed);
    }

    #[test]
    fn root_resource_is_directory() {
        let (temp, store) = fixture();
        let mut conn = connect(&store, "/");
        assert!(conn.exists().unwrap());
        assert_eq!(conn.file().unwrap(), temp.path());
    }

    #[test]
    fn invalid_state_names_resource() {
        let (_temp, store) = fixture();
        let mut conn = connect(&store, "/a.txt");
        conn.close().unwrap();
        let display = format!("{}", conn.exists().unwrap_err());
        assert!(display.contains("a.txt"));
        assert!(display.contains("connection closed"));
    }
}
