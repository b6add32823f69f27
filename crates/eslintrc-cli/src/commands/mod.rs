pub mod check;
pub mod print;
pub mod rule;

use anyhow::{Context, Result};
use eslintrc_config::ConfigError;
use std::path::PathBuf;

/// Use the explicit path, or search upward from the current directory
pub fn locate_config(config_path: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        return Ok(path);
    }

    let current_dir = std::env::current_dir()?;
    let found = eslintrc_config::find_config(&current_dir).context("Failed to search for config")?;
    found
        .ok_or(ConfigError::NotFound)
        .with_context(|| format!("No ESLint config above {}", current_dir.display()))
}
