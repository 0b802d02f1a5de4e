//! Logging facade over `tracing`.
//!
//! The TUI owns the terminal, so events go to a log file under
//! `~/.sales-chat/logs/` instead of stderr.

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

static VERBOSE: AtomicBool = AtomicBool::new(false);

const LOG_FILE_NAME: &str = "sales-chat.log";

/// Toggle verbose mode; `debug` messages are dropped unless it is set.
pub fn set_verbose(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

#[must_use]
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Install the global file subscriber. Returns the log path.
///
/// `RUST_LOG` wins over the verbosity flag when set.
pub fn init(verbose: bool) -> Result<PathBuf> {
    let rust_log = std::env::var("RUST_LOG").ok();
    set_verbose(debug_enabled(verbose, rust_log.as_deref()));
    let path = log_file_path();
    let file = open_log_file(&path)?;

    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,sales_chat={default_level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to install log subscriber: {err}"))?;

    Ok(path)
}

pub fn info(message: impl Into<String>) {
    let message = message.into();
    tracing::info!("{message}");
}

pub fn warn(message: impl Into<String>) {
    let message = message.into();
    tracing::warn!("{message}");
}

pub fn debug(message: impl Into<String>) {
    if !is_verbose() {
        return;
    }
    let message = message.into();
    tracing::debug!("{message}");
}

/// Debug events are built when `--verbose` is set or `RUST_LOG` asks for
/// filtering; the subscriber's filter then decides what is written.
fn debug_enabled(verbose: bool, rust_log: Option<&str>) -> bool {
    verbose || rust_log.is_some_and(|value| !value.trim().is_empty())
}

fn log_file_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".sales-chat").join("logs"))
        .unwrap_or_else(std::env::temp_dir)
        .join(LOG_FILE_NAME)
}

fn open_log_file(path: &PathBuf) -> Result<File> {
    crate::config::ensure_parent_dir(path)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file: {}", path.display()))
}
