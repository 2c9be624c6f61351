//! Common paths for Thimble data storage
//!
//! Everything lives under ~/.config/thimble/ on all platforms:
//! - config.toml - Server, fixture and client configuration

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the Thimble data directory (~/.config/thimble/)
pub fn thimble_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    let dir = home.join(".config").join("thimble");
    fs::create_dir_all(&dir).context("Failed to create thimble directory")?;
    Ok(dir)
}

/// Get the config file path (~/.config/thimble/config.toml)
pub fn config_path() -> Result<PathBuf> {
    Ok(thimble_dir()?.join("config.toml"))
}
