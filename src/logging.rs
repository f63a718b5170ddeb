use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::LOG_FILE_NAME;

/// Install the global subscriber, writing to `<log_dir>/student-roster.log`.
/// The terminal belongs to the TUI, so nothing is printed to stdout/stderr.
/// `RUST_LOG` overrides the default `info` level.
pub fn init_logging(log_dir: &Path) -> Result<()> {
    fs::create_dir_all(log_dir)
        .with_context(|| format!("failed to create log directory {}", log_dir.display()))?;

    let appender = tracing_appender::rolling::never(log_dir, LOG_FILE_NAME);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // A subscriber may already be installed (tests, embedding); keep it.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(appender)
        .with_ansi(false)
        .with_target(false)
        .try_init();

    Ok(())
}
