//! Command-line inspection of resource stores.
//!
//! Commands:
//! - `stat <path>` - existence, length and modification time
//! - `cat <path>` - stream the resource to stdout
//! - `locate <path>` - print the native file location
//! - `store` - print the store's `file://` form

pub mod commands;
mod error;

pub use commands::{execute, Command};
pub use error::CliError;
