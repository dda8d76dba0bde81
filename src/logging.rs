//! Subscriber setup shared by the binaries.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

pub const LOG_PATH_VAR: &str = "MATRIX_LOG_PATH";

/// Install the global subscriber. Filter from `RUST_LOG` (default `info`);
/// output to the file named by `MATRIX_LOG_PATH`, otherwise stderr.
pub fn init() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let (writer, ansi) = match std::env::var_os(LOG_PATH_VAR) {
        Some(path) => (file_writer(Path::new(&path))?, false),
        None => (BoxMakeWriter::new(std::io::stderr), true),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("installing log subscriber")
}

fn file_writer(path: &Path) -> Result<BoxMakeWriter> {
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    Ok(BoxMakeWriter::new(Arc::new(file)))
}
