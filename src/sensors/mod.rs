mod snapshot;

pub use snapshot::{RawState, StateSnapshot};

use serde::Serialize;
use std::fmt;

use crate::config::{Config, RoomConfig};
use crate::scoring::RoomReading;

/// States reported by sensors that have no current value.
const ABSENT_STATES: [&str; 2] = ["unknown", "unavailable"];

/// Parse a raw sensor state into a number.
///
/// `unknown`, `unavailable`, empty and non-numeric states are absent.
pub fn parse_state(state: &str) -> Option<f64> {
    let state = state.trim();
    if state.is_empty() || ABSENT_STATES.iter().any(|s| state.eq_ignore_ascii_case(s)) {
        return None;
    }
    state.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A required reading that had no usable value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingReading {
    IndoorTemperature,
    IndoorHumidity,
    OutdoorTemperature,
    OutdoorHumidity,
    WindSpeed,
}

impl fmt::Display for MissingReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MissingReading::IndoorTemperature => "indoor temperature",
            MissingReading::IndoorHumidity => "indoor humidity",
            MissingReading::OutdoorTemperature => "outdoor temperature",
            MissingReading::OutdoorHumidity => "outdoor humidity",
            MissingReading::WindSpeed => "wind speed",
        };
        f.write_str(name)
    }
}

/// Readings shared by every room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OutdoorReadings {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub wind_speed: Option<f64>,
}

impl OutdoorReadings {
    pub fn from_snapshot(config: &Config, snapshot: &StateSnapshot) -> Self {
        Self {
            temperature: snapshot.value(&config.outdoor_temp_sensor),
            humidity: snapshot.value(&config.outdoor_humidity_sensor),
            wind_speed: snapshot.value(&config.wind_sensor),
        }
    }
}

/// Assemble the scorer input for one room.
///
/// Fails with every missing required reading when the room cannot be scored.
/// An unavailable CO2 sensor is not an error: the reading is simply absent.
pub fn read_room(
    room: &RoomConfig,
    outdoor: &OutdoorReadings,
    snapshot: &StateSnapshot,
    hour: u32,
    month: u32,
) -> Result<RoomReading, Vec<MissingReading>> {
    let temp_in = snapshot.value(&room.temp_sensor);
    let humidity_in = snapshot.value(&room.humidity_sensor);
    let co2 = room.co2_sensor.as_deref().and_then(|id| snapshot.value(id));

    if room.co2_sensor.is_some() && co2.is_none() {
        tracing::debug!(room = %room.name, "CO2 sensor has no value, using room pattern");
    }

    match (
        temp_in,
        humidity_in,
        outdoor.temperature,
        outdoor.humidity,
        outdoor.wind_speed,
    ) {
        (Some(temp_in), Some(humidity_in), Some(temp_out), Some(humidity_out), Some(wind_speed)) => {
            Ok(RoomReading {
                temp_in,
                humidity_in,
                temp_out,
                humidity_out,
                wind_speed,
                hour,
                month,
                room_type: room.room_type.clone(),
                co2,
            })
        }
        _ => {
            let missing = [
                (temp_in, MissingReading::IndoorTemperature),
                (humidity_in, MissingReading::IndoorHumidity),
                (outdoor.temperature, MissingReading::OutdoorTemperature),
                (outdoor.humidity, MissingReading::OutdoorHumidity),
                (outdoor.wind_speed, MissingReading::WindSpeed),
            ]
            .into_iter()
            .filter(|(value, _)| value.is_none())
            .map(|(_, which)| which)
            .collect();
            Err(missing)
        }
    }
}
