//! Logging setup using the tracing ecosystem.
//!
//! The library only emits `tracing` events and spans; it never installs a
//! subscriber by itself. Applications that have no subscriber of their own
//! can call one of the helpers below:
//! - [`init`] writes to stderr
//! - [`init_to_dir`] writes to a daily-rotated file
//!
//! Both honour the `RUST_LOG` environment variable.

use std::path::{Path, PathBuf};

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Default log level if RUST_LOG is not set.
const DEFAULT_LOG_FILTER: &str = "trello=info,warn";

/// Prefix of rotated log files.
const LOG_FILE_PREFIX: &str = "trello.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

/// Install a global subscriber that logs to stderr.
///
/// # Errors
///
/// Returns an error if a global subscriber is already set.
///
/// # Example
///
/// ```no_run
/// trello::logging::init().expect("Failed to initialize logging");
/// ```
pub fn init() -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .with(env_filter());

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Install a global subscriber that logs to a daily-rotated file in `dir`.
///
/// # Errors
///
/// Returns an error if:
/// - The log directory cannot be created
/// - The log file cannot be opened
/// - A global subscriber is already set
pub fn init_to_dir(dir: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(LOG_FILE_PREFIX)
        .build(dir)?;

    let subscriber = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .with(env_filter());

    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "trello logging started");
    tracing::debug!(log_dir = %dir.display(), "Log directory");

    Ok(())
}

/// The platform-specific default log directory, e.g.
/// `~/.local/share/trello/logs` on Linux.
pub fn default_log_directory() -> Option<PathBuf> {
    dirs::data_local_dir().map(|base| base.join("trello").join("logs"))
}
