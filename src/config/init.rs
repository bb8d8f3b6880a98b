use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::io::Write;
use std::path::Path;

use super::schema::{Config, RoomConfig, DEFAULT_NAME, DEFAULT_SCAN_INTERVAL};
use crate::scoring::{RoomType, ScoringConfig};

const HEADER: &str = "\
# vent-advisor configuration
#
# Sensor ids are looked up in the state snapshot passed with --states.
# Every value under `scoring` is optional; omitted values use the defaults
# written below.
";

/// Starter config: one room of each kind the proxy table knows about.
pub fn default_config() -> Config {
    let room = |name: &str, slug: &str, room_type: RoomType, co2: bool| RoomConfig {
        name: name.to_string(),
        room_type,
        temp_sensor: format!("sensor.{}_temperature", slug),
        humidity_sensor: format!("sensor.{}_humidity", slug),
        co2_sensor: co2.then(|| format!("sensor.{}_co2", slug)),
        enabled: None,
    };

    Config {
        name: Some(DEFAULT_NAME.to_string()),
        outdoor_temp_sensor: "sensor.outdoor_temperature".to_string(),
        outdoor_humidity_sensor: "sensor.outdoor_humidity".to_string(),
        wind_sensor: "sensor.wind_speed".to_string(),
        scan_interval: Some(DEFAULT_SCAN_INTERVAL),
        rooms: vec![
            room("Living Room", "living_room", RoomType::LivingRoom, true),
            room("Bedroom", "bedroom", RoomType::Bedroom, false),
            room("Bathroom", "bathroom", RoomType::Bathroom, false),
            room("Kitchen", "kitchen", RoomType::Kitchen, false),
            room("Office", "office", RoomType::Office, true),
        ],
        scoring: Some(ScoringConfig::default()),
    }
}

/// Write the starter config to `path` atomically.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config already exists at {}. Use --force to overwrite",
            path.display()
        );
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory at {}", parent.display()))?;
    }

    let yaml = serde_saphyr::to_string(&default_config())
        .map_err(|e| anyhow::anyhow!("Failed to serialize config: {}", e))?;

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;
    file.write_all(HEADER.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.write_all(yaml.as_bytes())
        .with_context(|| format!("Failed to write config to {}", path.display()))?;
    file.commit()
        .with_context(|| format!("Failed to save config to {}", path.display()))?;

    tracing::info!(path = %path.display(), "wrote starter config");
    Ok(())
}
