//! Configuration management.
//!
//! Credentials can be read from a TOML file so they do not have to live in
//! source code. The file is only ever read; nothing is written back.

mod credentials;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

pub use credentials::Credentials;

/// Name of the credentials file inside the config directory.
const CREDENTIALS_FILE: &str = "credentials.toml";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("Could not determine the configuration directory")]
    NoConfigDir,

    /// The file could not be read.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The file is not valid TOML or lacks required keys.
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The values are present but unusable.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The directory holding this crate's configuration, e.g.
/// `~/.config/trello` on Linux.
pub fn config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("trello"))
        .ok_or(ConfigError::NoConfigDir)
}

/// The default credentials file path.
pub fn default_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CREDENTIALS_FILE))
}

/// Load and validate credentials from `path`.
pub fn load(path: &Path) -> Result<Credentials> {
    debug!(path = %path.display(), "Loading credentials");
    let contents = fs::read_to_string(path)?;
    let credentials: Credentials = toml::from_str(&contents)?;
    credentials.validate()?;
    Ok(credentials)
}

/// Load credentials from [`default_path`].
pub fn load_default() -> Result<Credentials> {
    load(&default_path()?)
}
