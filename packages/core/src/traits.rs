//! Core traits: ResourceStore, Resource, ResourceConnection.

use std::fmt;
use std::io::Read;

use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::{Error, ResourcePath, Result};

/// A source of resources addressed by [`ResourcePath`].
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn ResourceStore>`.
pub trait ResourceStore: fmt::Display + Send + Sync {
    /// Whether the store can currently serve resources.
    fn is_available(&self) -> bool;

    /// Get the resource at a path.
    ///
    /// This does not check whether the resource exists; that is only
    /// known once a connection is opened and queried.
    fn get_resource(&self, path: &ResourcePath) -> Result<Box<dyn Resource>>;
}

/// A named resource within a store.
///
/// # Object Safety
///
/// This trait is object-safe: you can use `Box<dyn Resource>`.
pub trait Resource: fmt::Display + Send + Sync {
    /// The path of this resource within its store.
    fn path(&self) -> &ResourcePath;

    /// Whether direct file access is cheaper than streaming for this resource.
    fn is_file_preferred(&self) -> bool {
        false
    }

    /// Open a new connection to this resource.
    fn open(&self) -> Result<Box<dyn ResourceConnection>>;
}

/// A single session of access to one resource.
///
/// A connection allows any number of metadata queries and at most one kind
/// of data access: either an input stream or the native file, never both.
/// Once closed, every operation fails with [`Error::InvalidState`].
pub trait ResourceConnection: fmt::Display + Send {
    /// Whether the resource currently exists.
    fn exists(&self) -> Result<bool>;

    /// The length of the resource in bytes.
    ///
    /// Fails with [`Error::NotFound`] if the resource does not exist.
    fn length(&self) -> Result<u64>;

    /// The last-modified time of the resource.
    ///
    /// Fails with [`Error::NotFound`] if the resource does not exist.
    fn last_modified(&self) -> Result<DateTime<Utc>>;

    /// Open the resource for reading.
    ///
    /// The stream is owned by the connection and released on close.
    fn input_stream(&mut self) -> Result<&mut dyn Read>;

    /// The native file holding this resource.
    fn file(&mut self) -> Result<&std::path::Path>;

    /// End the session, releasing any open stream.
    fn close(&mut self) -> Result<()>;

    /// Read the entire resource through [`input_stream`](Self::input_stream).
    fn read_bytes(&mut self) -> Result<Bytes> {
        let description = self.to_string();
        let mut buf = Vec::new();
        self.input_stream()?
            .read_to_end(&mut buf)
            .map_err(|e| Error::from_io(description, e))?;
        Ok(Bytes::from(buf))
    }
}

// Blanket implementations for boxes

impl<T: ResourceStore + ?Sized> ResourceStore for Box<T> {
    fn is_available(&self) -> bool {
        self.as_ref().is_available()
    }

    fn get_resource(&self, path: &ResourcePath) -> Result<Box<dyn Resource>> {
        self.as_ref().get_resource(path)
    }
}

impl<T: ResourceConnection + ?Sized> ResourceConnection for Box<T> {
    fn exists(&self) -> Result<bool> {
        self.as_ref().exists()
    }

    fn length(&self) -> Result<u64> {
        self.as_ref().length()
    }

    fn last_modified(&self) -> Result<DateTime<Utc>> {
        self.as_ref().last_modified()
    }

    fn input_stream(&mut self) -> Result<&mut dyn Read> {
        self.as_mut().input_stream()
    }

    fn file(&mut self) -> Result<&std::path::Path> {
        self.as_mut().file()
    }

    fn close(&mut self) -> Result<()> {
        self.as_mut().close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// A connection over an in-memory buffer, for exercising provided methods.
    struct MemoryConnection {
        data: Option<Vec<u8>>,
        stream: Option<Cursor<Vec<u8>>>,
        closed: bool,
    }

    impl fmt::Display for MemoryConnection {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("memory:")
        }
    }

    impl ResourceConnection for MemoryConnection {
        fn exists(&self) -> Result<bool> {
            Ok(self.data.is_some())
        }

        fn length(&self) -> Result<u64> {
            self.data
                .as_ref()
                .map(|d| d.len() as u64)
                .ok_or_else(|| Error::NotFound {
                    location: "memory:".to_string(),
                })
        }

        fn last_modified(&self) -> Result<DateTime<Utc>> {
            Ok(DateTime::<Utc>::from(std::time::UNIX_EPOCH))
        }

        fn input_stream(&mut self) -> Result<&mut dyn Read> {
            if self.closed || self.stream.is_some() {
                return Err(Error::InvalidState {
                    resource: "memory:".to_string(),
                    message: "stream unavailable".to_string(),
                });
            }
            let data = self.data.clone().ok_or_else(|| Error::NotFound {
                location: "memory:".to_string(),
            })?;
            Ok(self.stream.insert(Cursor::new(data)))
        }

        fn file(&mut self) -> Result<&std::path::Path> {
            Err(Error::InvalidState {
                resource: "memory:".to_string(),
                message: "no native file".to_string(),
            })
        }

        fn close(&mut self) -> Result<()> {
            self.stream = None;
            self.closed = true;
            Ok(())
        }
    }

    fn memory(data: Option<&[u8]>) -> MemoryConnection {
        MemoryConnection {
            data: data.map(|d| d.to_vec()),
            stream: None,
            closed: false,
        }
    }

    #[test]
    fn read_bytes_uses_input_stream() {
        let mut conn = memory(Some(b"hello"));
        assert_eq!(conn.read_bytes().unwrap(), Bytes::from_static(b"hello"));
        // The stream was taken, so a second read is refused.
        assert!(conn.read_bytes().unwrap_err().is_invalid_state());
    }

    #[test]
    fn read_bytes_missing_is_not_found() {
        let mut conn = memory(None);
        assert!(conn.read_bytes().unwrap_err().is_not_found());
    }

    #[test]
    fn box_dyn_works() {
        let mut boxed: Box<dyn ResourceConnection> = Box::new(memory(Some(b"abc")));
        assert!(boxed.exists().unwrap());
        assert_eq!(boxed.length().unwrap(), 3);
        assert_eq!(boxed.read_bytes().unwrap().len(), 3);
        boxed.close().unwrap();
    }
}
