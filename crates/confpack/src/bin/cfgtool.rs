//! `cfgtool` — convert a config file between JSON, compact binary and the
//! typed-tag formats.
//!
//! Usage:
//!   cfgtool <INPUT> <OUTPUT> [--indent N] [--compression none|deflate|zstd]
//!           [--root-name] [--force]
//!
//! Logging goes to stderr and follows `RUST_LOG` (default `info`).

use clap::Parser;
use confpack::cli::{run, Args};
use tracing::error;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&args) {
        error!("{e}");
        std::process::exit(1);
    }
}
