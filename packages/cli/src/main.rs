use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use semres_cli::{execute, Command};
use semres_filesystem::StoreRegistry;

/// semres - inspect resources served from a local directory
#[derive(Parser, Debug)]
#[command(name = "semres")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory the store is rooted at
    #[arg(long, env = "SEMRES_ROOT", default_value = ".")]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = execute(StoreRegistry::global(), &args.root, &args.command, &mut out) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
