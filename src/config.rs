// src/config.rs

//! Configuration loading utilities.
//!
//! File settings are layered under environment overrides, then validated.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load configuration from a TOML file, apply environment overrides and
/// validate the result.
///
/// A missing file falls back to defaults; a malformed one is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        Config::load(path)?
    } else {
        log::warn!("No config at {}, using defaults", path.display());
        Config::default()
    };

    config.apply_env();
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid configuration: {e}")))?;
    Ok(config)
}
