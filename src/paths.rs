//! Common paths for anifetch data storage
//!
//! - ~/.anifetch/ - Downloaded image cache
//! - <config_dir>/anifetch/config.toml - User configuration

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Get the default image cache directory (~/.anifetch/)
///
/// Only resolves the path; the cache store creates it on demand.
pub fn default_cache_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".anifetch"))
}

/// Get the config file path (<config_dir>/anifetch/config.toml)
pub fn config_path() -> Result<PathBuf> {
    let config_dir = dirs::config_dir().context("Could not determine config directory")?;
    Ok(config_dir.join("anifetch").join("config.toml"))
}
