//! # semres-filesystem
//!
//! Resources backed by files under a local directory.
//!
//! ```text
//! StoreRegistry::get_store(dir)   one store per canonical directory
//!   └─ FilesystemResourceStore::get_resource("/a/b.txt")
//!        └─ FilesystemResource::open()
//!             └─ FilesystemResourceConnection
//!                  exists / length / last_modified
//!                  input_stream  xor  file
//!                  close
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::io::Read;
//! use semres_core::path;
//! use semres_filesystem::StoreRegistry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = StoreRegistry::new();
//! let store = registry.get_store("/srv/site")?;
//!
//! let mut conn = store.get_resource(&path!("/index.html"))?.open();
//! if conn.exists()? {
//!     let mut html = String::new();
//!     conn.input_stream()?.read_to_string(&mut html)?;
//! }
//! conn.close()?;
//! # Ok(())
//! # }
//! ```

mod connection;
mod error;
mod registry;
mod resource;
mod store;

pub use connection::{AccessState, FilesystemResourceConnection};
pub use error::StoreError;
pub use registry::StoreRegistry;
pub use resource::{check_filesystem_path, FilesystemResource};
pub use store::{translate_path, FilesystemResourceStore};
