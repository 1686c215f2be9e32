//! Semantic Resources: Core Contracts
//!
//! This crate defines what every resource store agrees on, independent of
//! where resources actually live:
//! - `ResourcePath`: validated, store-relative path (always begins with `/`)
//! - `ResourceStore`: a source of resources addressed by path
//! - `Resource`: a named resource that can be opened
//! - `ResourceConnection`: one session of metadata queries plus a single
//!   kind of data access (stream or native file)
//!
//! Concrete stores (local filesystem, archives, remote) implement these
//! traits and are used through `Box<dyn …>` at call sites.
//!
//! # Example
//!
//! ```rust
//! use semres_core::{path, ResourceStore, Result};
//!
//! fn length_of(store: &dyn ResourceStore) -> Result<Option<u64>> {
//!     let resource = store.get_resource(&path!("/index.html"))?;
//!     let mut conn = resource.open()?;
//!     let length = if conn.exists()? { Some(conn.length()?) } else { None };
//!     conn.close()?;
//!     Ok(length)
//! }
//! ```

pub use bytes::Bytes;

mod error;
mod path;
mod traits;

pub use error::{Error, Result};
pub use path::{PathError, ResourcePath};
pub use traits::{Resource, ResourceConnection, ResourceStore};
