use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

use crate::scoring::{RoomType, ScoringConfig};

pub const DEFAULT_NAME: &str = "Room Ventilation Advisor";
pub const DEFAULT_SCAN_INTERVAL: u64 = 300;
pub const MIN_SCAN_INTERVAL: u64 = 60;
pub const MAX_SCAN_INTERVAL: u64 = 3600;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub outdoor_temp_sensor: String,
    pub outdoor_humidity_sensor: String,
    pub wind_sensor: String,
    /// Seconds between refreshes in `watch` mode (default: 300)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_interval: Option<u64>,
    #[serde(default)]
    pub rooms: Vec<RoomConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RoomConfig {
    pub name: String,
    pub room_type: RoomType,
    pub temp_sensor: String,
    pub humidity_sensor: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub co2_sensor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

impl RoomConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }
}

impl Config {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval.unwrap_or(DEFAULT_SCAN_INTERVAL))
    }

    /// Effective scoring config (defaults when the section is absent)
    pub fn scoring(&self) -> ScoringConfig {
        self.scoring.clone().unwrap_or_default()
    }

    pub fn enabled_rooms(&self) -> impl Iterator<Item = &RoomConfig> {
        self.rooms.iter().filter(|room| room.is_enabled())
    }

    /// Validate the non-scoring parts of the config.
    /// Returns all validation errors at once.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Some(interval) = self.scan_interval {
            if !(MIN_SCAN_INTERVAL..=MAX_SCAN_INTERVAL).contains(&interval) {
                errors.push(format!(
                    "scan_interval: must be between {} and {} seconds (got {})",
                    MIN_SCAN_INTERVAL, MAX_SCAN_INTERVAL, interval
                ));
            }
        }

        for (field, value) in [
            ("outdoor_temp_sensor", &self.outdoor_temp_sensor),
            ("outdoor_humidity_sensor", &self.outdoor_humidity_sensor),
            ("wind_sensor", &self.wind_sensor),
        ] {
            if value.trim().is_empty() {
                errors.push(format!("{}: must not be empty", field));
            }
        }

        let mut seen = HashSet::new();
        for (i, room) in self.rooms.iter().enumerate() {
            if room.name.trim().is_empty() {
                errors.push(format!("rooms[{}].name: must not be empty", i));
            } else if !seen.insert(room.name.as_str()) {
                errors.push(format!("rooms[{}].name: duplicate room '{}'", i, room.name));
            }
            if room.temp_sensor.trim().is_empty() {
                errors.push(format!("rooms[{}].temp_sensor: must not be empty", i));
            }
            if room.humidity_sensor.trim().is_empty() {
                errors.push(format!("rooms[{}].humidity_sensor: must not be empty", i));
            }
            if let Some(co2) = &room.co2_sensor {
                if co2.trim().is_empty() {
                    errors.push(format!("rooms[{}].co2_sensor: must not be empty", i));
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
