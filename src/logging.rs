//! Tracing setup. The TUI owns the terminal, so log lines go to a file in
//! the application data directory instead of stdout. `RUST_LOG` adjusts the
//! filter the usual way.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Log file name stored inside the application data directory.
const LOG_FILE_NAME: &str = "inward-register.log";

/// Initialize the global subscriber, appending to the log file under
/// `data_dir`. Must run before the first log statement.
pub fn init(data_dir: &Path) -> Result<()> {
    fs::create_dir_all(data_dir).context("failed to create data directory")?;

    let log_path = data_dir.join(LOG_FILE_NAME);
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("failed to open log file {}", log_path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}
