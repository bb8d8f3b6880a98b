mod init;
mod schema;

pub use init::{default_config, write_default_config};
pub use schema::{
    Config, RoomConfig, DEFAULT_NAME, DEFAULT_SCAN_INTERVAL, MAX_SCAN_INTERVAL, MIN_SCAN_INTERVAL,
};

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::scoring::ScoringConfig;

/// Get the config directory path (~/.config/vent-advisor/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("vent-advisor"))
}

/// Get the default config file path (~/.config/vent-advisor/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses default path (~/.config/vent-advisor/config.yaml)
///
/// # Errors
///
/// Returns an error if:
/// - The config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => p,
        None => get_config_path()?,
    };

    if !config_path.exists() {
        anyhow::bail!(
            "Config file not found at {}. Run `vent-advisor init` to create one",
            config_path.display()
        );
    }

    let config_content = read_file(&config_path)?;

    let config: Config = serde_saphyr::from_str(&config_content)
        .with_context(|| format!("Failed to parse config: invalid YAML in {}", config_path.display()))?;

    tracing::debug!(
        path = %config_path.display(),
        rooms = config.rooms.len(),
        "loaded config"
    );

    Ok(config)
}

/// Load only the scoring section of a config file.
///
/// An explicit `path` must exist. Without one, a missing default config file
/// means built-in defaults.
pub fn load_scoring_or_default(path: Option<PathBuf>) -> Result<ScoringConfig> {
    if path.is_none() {
        let default_path = get_config_path()?;
        if !default_path.exists() {
            tracing::debug!("no config file, using default scoring");
            return Ok(ScoringConfig::default());
        }
    }
    Ok(load_config(path)?.scoring())
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {}", path.display()))
}
