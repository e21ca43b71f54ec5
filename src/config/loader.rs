//! Configuration loading from files (std only).

use std::fs;
use std::path::Path;

use crate::error::{bounded_message, ConfigError, Error, Result};

use super::ScanConfig;

/// Load configuration from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
///
/// # Example
///
/// ```rust,ignore
/// use stepper_scan::load_config;
///
/// let config = load_config("tile.toml")?;
/// ```
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ScanConfig> {
    let content = fs::read_to_string(path.as_ref()).map_err(|e| {
        let msg = bounded_message(&e.to_string());
        Error::Config(ConfigError::IoError(msg))
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is invalid or fails validation.
pub fn parse_config(content: &str) -> Result<ScanConfig> {
    let config: ScanConfig = toml::from_str(content).map_err(|e| {
        let msg = bounded_message(e.message());
        Error::Config(ConfigError::ParseError(msg))
    })?;

    // Validate the configuration
    super::validation::validate_config(&config)?;

    Ok(config)
}
