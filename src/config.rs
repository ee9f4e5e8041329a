// src/config.rs

//! Configuration loading utilities.
//!
//! Convenience functions for turning an optional config file path into a
//! validated [`Config`].

use std::path::Path;

use crate::error::{ArchiveError, Result};
use crate::models::{Config, ServiceMode};

/// Load and validate configuration from a TOML file.
///
/// Without a path the built-in defaults are used.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)
            .map_err(|e| ArchiveError::config(format!("Failed to load {path:?}: {e}")))?,
        None => Config::default(),
    };
    config.validate()?;
    Ok(config)
}

/// Load configuration, falling back to defaults when the file is unusable.
///
/// A file that parses but fails validation also falls back.
pub fn load_config_or_default(path: &Path) -> Config {
    let config = Config::load_or_default(path);
    match config.validate() {
        Ok(()) => config,
        Err(e) => {
            log::warn!("Invalid configuration in {path:?}: {e}. Using defaults.");
            Config::default()
        }
    }
}

/// Apply a forced mock mode on top of a loaded configuration.
pub fn with_mode(mut config: Config, force_mock: bool) -> Config {
    if force_mock {
        config.service.mode = ServiceMode::Mock;
    }
    config
}
