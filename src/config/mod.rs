//! Local configuration: named targets and their credentials.

pub mod models;
pub mod resolver;

pub use models::{GlobalConfig, TargetConfig};
pub use resolver::ConnectionResolver;

use crate::constants;
use crate::error::Error;
use std::path::{Path, PathBuf};

/// Returns the configuration directory.
///
/// `CLUSTER_CLI_CONFIG_DIR` wins; otherwise `~/.config/cluster-cli`.
///
/// # Errors
///
/// Returns a configuration error if the home directory cannot be determined.
pub fn get_config_dir() -> Result<PathBuf, Error> {
    if let Ok(dir) = std::env::var(constants::ENV_CONFIG_DIR) {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::invalid_config("could not determine the home directory"))?;
    Ok(home_dir.join(".config").join(constants::CONFIG_DIR_NAME))
}

/// Loads `config.toml` from `config_dir`, or the default configuration when
/// the file does not exist.
///
/// # Errors
///
/// Returns an I/O error if the file exists but cannot be read, and a TOML
/// error if it is malformed.
pub fn load_global_config(config_dir: &Path) -> Result<GlobalConfig, Error> {
    let config_path = config_dir.join(constants::CONFIG_FILENAME);
    if !config_path.exists() {
        tracing::debug!(
            target: "cluster_cli::config",
            "no configuration at {}, using defaults",
            config_path.display()
        );
        return Ok(GlobalConfig::default());
    }

    let content = std::fs::read_to_string(&config_path)?;
    Ok(toml::from_str(&content)?)
}

/// Determines if the input string is a URL (starts with http:// or https://)
#[must_use]
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}
