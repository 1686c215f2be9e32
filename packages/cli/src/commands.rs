//! Command definitions and execution.

use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use serde::Serialize;

use semres_core::ResourcePath;
use semres_filesystem::{FilesystemResourceStore, StoreRegistry};

use crate::CliError;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show whether a resource exists, its length and modification time
    Stat {
        /// Resource path, e.g. /docs/index.html
        path: ResourcePath,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Write a resource's contents to stdout
    Cat {
        /// Resource path, e.g. /docs/index.html
        path: ResourcePath,
    },
    /// Print the native file location of a resource
    Locate {
        /// Resource path, e.g. /docs/index.html
        path: ResourcePath,
    },
    /// Print the store's file:// form
    Store,
}

#[derive(Serialize, Debug, PartialEq)]
struct Stat {
    path: ResourcePath,
    exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_modified: Option<DateTime<Utc>>,
}

/// Run `command` against the store for `root`, writing results to `out`.
pub fn execute(
    registry: &StoreRegistry,
    root: &Path,
    command: &Command,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let store = registry.get_store(root)?;
    match command {
        Command::Stat { path, json } => stat(&store, path, *json, out),
        Command::Cat { path } => cat(&store, path, out),
        Command::Locate { path } => locate(&store, path, out),
        Command::Store => {
            writeln!(out, "{}", store)?;
            Ok(())
        }
    }
}

fn stat(
    store: &FilesystemResourceStore,
    path: &ResourcePath,
    json: bool,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut conn = store.get_resource(path)?.open();
    let exists = conn.exists()?;
    let stat = Stat {
        path: path.clone(),
        exists,
        length: if exists { Some(conn.length()?) } else { None },
        last_modified: if exists {
            Some(conn.last_modified()?)
        } else {
            None
        },
    };
    conn.close()?;

    if json {
        serde_json::to_writer_pretty(&mut *out, &stat)?;
        writeln!(out)?;
    } else {
        writeln!(out, "path:          {}", stat.path)?;
        writeln!(out, "exists:        {}", stat.exists)?;
        if let (Some(length), Some(modified)) = (stat.length, stat.last_modified) {
            writeln!(out, "length:        {}", length)?;
            writeln!(out, "last modified: {}", modified.to_rfc3339())?;
        }
    }
    Ok(())
}

fn cat(
    store: &FilesystemResourceStore,
    path: &ResourcePath,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut conn = store.get_resource(path)?.open();
    let copied = io::copy(conn.input_stream()?, out)?;
    tracing::debug!(path = %path, bytes = copied, "copied resource");
    conn.close()?;
    Ok(())
}

fn locate(
    store: &FilesystemResourceStore,
    path: &ResourcePath,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let mut conn = store.get_resource(path)?.open();
    writeln!(out, "{}", conn.file()?.display())?;
    conn.close()?;
    Ok(())
}
