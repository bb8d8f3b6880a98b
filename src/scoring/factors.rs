use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use super::config::{
    Co2Thresholds, HumidityThresholds, RoomPatterns, SeasonMonths, TemperatureThresholds,
    WindThresholds,
};

/// Hours when opening windows is most worthwhile.
const PEAK_HOURS: [u32; 6] = [7, 8, 9, 18, 19, 20];
/// Hours with a secondary benefit.
const SHOULDER_HOURS: [u32; 6] = [6, 10, 11, 16, 17, 21];

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RoomType {
    LivingRoom,
    Bedroom,
    Bathroom,
    Kitchen,
    Office,
    /// Any tag outside the known set. Scored with the generic CO2 proxy.
    Other(String),
}

impl RoomType {
    pub fn as_str(&self) -> &str {
        match self {
            RoomType::LivingRoom => "living_room",
            RoomType::Bedroom => "bedroom",
            RoomType::Bathroom => "bathroom",
            RoomType::Kitchen => "kitchen",
            RoomType::Office => "office",
            RoomType::Other(tag) => tag,
        }
    }
}

impl From<&str> for RoomType {
    fn from(s: &str) -> Self {
        match s.trim() {
            "living_room" => RoomType::LivingRoom,
            "bedroom" => RoomType::Bedroom,
            "bathroom" => RoomType::Bathroom,
            "kitchen" => RoomType::Kitchen,
            "office" => RoomType::Office,
            other => RoomType::Other(other.to_string()),
        }
    }
}

impl From<String> for RoomType {
    fn from(s: String) -> Self {
        RoomType::from(s.as_str())
    }
}

impl From<RoomType> for String {
    fn from(room_type: RoomType) -> Self {
        room_type.as_str().to_string()
    }
}

impl FromStr for RoomType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RoomType::from(s))
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Winter,
    Summer,
    Shoulder,
}

impl Season {
    /// Winter wins if a month is listed in both sets.
    pub fn for_month(month: u32, months: &SeasonMonths) -> Self {
        if months.winter_months.contains(&month) {
            Season::Winter
        } else if months.summer_months.contains(&month) {
            Season::Summer
        } else {
            Season::Shoulder
        }
    }
}

/// Absolute humidity from relative humidity (%) and temperature (°C).
///
/// Magnus approximation of the saturation vapour pressure. Note the trailing
/// `* 100` (not the g/m³ `* 1000`): humidity thresholds are expressed on
/// this scale.
pub fn absolute_humidity(humidity_percent: f64, temp_celsius: f64) -> f64 {
    let saturation_vapor_pressure =
        6.112 * ((17.67 * temp_celsius) / (temp_celsius + 243.5)).exp();
    (humidity_percent / 100.0) * saturation_vapor_pressure * 2.1674 / (273.15 + temp_celsius)
        * 100.0
}

pub fn temperature_factor(temp_diff: f64, season: Season, t: &TemperatureThresholds) -> f64 {
    let (good, moderate, good_value, moderate_value) = match season {
        Season::Winter => (t.winter_good, t.winter_moderate, 0.8, 0.4),
        Season::Summer => (t.summer_good, t.summer_moderate, 0.8, 0.3),
        Season::Shoulder => (t.default_good, t.default_moderate, 0.6, 0.3),
    };
    if temp_diff > good {
        good_value
    } else if temp_diff > moderate {
        moderate_value
    } else {
        0.0
    }
}

pub fn humidity_factor(ah_in: f64, ah_out: f64, h: &HumidityThresholds) -> f64 {
    let diff = ah_in - ah_out;
    if diff > h.good {
        1.0
    } else if diff > h.moderate {
        0.5
    } else {
        0.0
    }
}

/// CO2 factor from a sensor reading, or from the room's hourly proxy when
/// there is none.
pub fn co2_factor(
    co2: Option<f64>,
    room_type: &RoomType,
    hour: u32,
    c: &Co2Thresholds,
    patterns: &RoomPatterns,
) -> f64 {
    match co2 {
        Some(ppm) if ppm > c.very_poor => 1.0,
        Some(ppm) if ppm > c.poor => 0.7,
        Some(ppm) if ppm > c.moderate => 0.3,
        Some(_) => 0.0,
        None => patterns.factor(room_type, hour),
    }
}

pub fn time_factor(hour: u32) -> f64 {
    if PEAK_HOURS.contains(&hour) {
        0.8
    } else if SHOULDER_HOURS.contains(&hour) {
        0.5
    } else {
        0.2
    }
}

/// Wind penalty. Thresholds are exclusive upper bounds, so a speed equal to a
/// threshold falls into the stronger penalty.
pub fn wind_factor(wind_speed: f64, enabled: bool, w: &WindThresholds) -> f64 {
    if !enabled {
        0.0
    } else if wind_speed < w.no_effect {
        0.0
    } else if wind_speed < w.moderate_effect {
        -0.2
    } else {
        -0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_humidity_reference_value() {
        let ah = absolute_humidity(50.0, 20.0);
        assert!((ah - 8.639091242147579).abs() < 1e-9, "got {}", ah);
    }

    #[test]
    fn test_absolute_humidity_other_points() {
        assert!((absolute_humidity(60.0, 15.0) - 7.690487842072112).abs() < 1e-9);
        assert!((absolute_humidity(100.0, 25.0) - 23.025613147718673).abs() < 1e-9);
        assert_eq!(absolute_humidity(0.0, 20.0), 0.0);
    }

    #[test]
    fn test_room_type_parse() {
        assert_eq!("living_room".parse::<RoomType>().unwrap(), RoomType::LivingRoom);
        assert_eq!(RoomType::from("office"), RoomType::Office);
        assert_eq!(
            RoomType::from("garage"),
            RoomType::Other("garage".to_string())
        );
        assert_eq!(RoomType::Kitchen.to_string(), "kitchen");
        assert_eq!(RoomType::Other("attic".into()).as_str(), "attic");
    }

    #[test]
    fn test_room_type_serde() {
        let parsed: RoomType = serde_json::from_str("\"bathroom\"").unwrap();
        assert_eq!(parsed, RoomType::Bathroom);
        let unknown: RoomType = serde_json::from_str("\"cellar\"").unwrap();
        assert_eq!(unknown, RoomType::Other("cellar".to_string()));
        assert_eq!(serde_json::to_string(&RoomType::Bedroom).unwrap(), "\"bedroom\"");
    }

    #[test]
    fn test_season_for_month() {
        let months = SeasonMonths::default();
        assert_eq!(Season::for_month(1, &months), Season::Winter);
        assert_eq!(Season::for_month(12, &months), Season::Winter);
        assert_eq!(Season::for_month(7, &months), Season::Summer);
        assert_eq!(Season::for_month(4, &months), Season::Shoulder);
        assert_eq!(Season::for_month(10, &months), Season::Shoulder);
    }

    #[test]
    fn test_temperature_factor_winter() {
        let t = TemperatureThresholds::default();
        assert_eq!(temperature_factor(5.0, Season::Winter, &t), 0.8);
        assert_eq!(temperature_factor(1.0, Season::Winter, &t), 0.4);
        assert_eq!(temperature_factor(-1.0, Season::Winter, &t), 0.0);
        // Strict comparisons: exactly on the cutoff drops a tier
        assert_eq!(temperature_factor(2.0, Season::Winter, &t), 0.4);
        assert_eq!(temperature_factor(0.0, Season::Winter, &t), 0.0);
    }

    #[test]
    fn test_temperature_factor_summer() {
        let t = TemperatureThresholds::default();
        assert_eq!(temperature_factor(5.0, Season::Summer, &t), 0.8);
        assert_eq!(temperature_factor(2.0, Season::Summer, &t), 0.3);
        assert_eq!(temperature_factor(-1.0, Season::Summer, &t), 0.0);
    }

    #[test]
    fn test_temperature_factor_shoulder() {
        let t = TemperatureThresholds::default();
        assert_eq!(temperature_factor(1.5, Season::Shoulder, &t), 0.6);
        assert_eq!(temperature_factor(-1.0, Season::Shoulder, &t), 0.3);
        assert_eq!(temperature_factor(-3.0, Season::Shoulder, &t), 0.0);
    }

    #[test]
    fn test_temperature_factor_monotonic() {
        let t = TemperatureThresholds::default();
        for season in [Season::Winter, Season::Summer, Season::Shoulder] {
            let mut previous = f64::MIN;
            for step in -100..=100 {
                let diff = step as f64 * 0.1;
                let f = temperature_factor(diff, season, &t);
                assert!(f >= previous, "{:?} decreased at diff {}", season, diff);
                previous = f;
            }
        }
    }

    #[test]
    fn test_humidity_factor() {
        let h = HumidityThresholds::default();
        assert_eq!(humidity_factor(10.0, 8.0, &h), 1.0);
        assert_eq!(humidity_factor(8.5, 8.0, &h), 0.5);
        assert_eq!(humidity_factor(7.0, 8.0, &h), 0.0);
        assert_eq!(humidity_factor(8.0, 8.0, &h), 0.0);
    }

    #[test]
    fn test_co2_factor_with_sensor() {
        let c = Co2Thresholds::default();
        let p = RoomPatterns::default();
        let room = RoomType::LivingRoom;
        assert_eq!(co2_factor(Some(1300.0), &room, 12, &c, &p), 1.0);
        assert_eq!(co2_factor(Some(1100.0), &room, 12, &c, &p), 0.7);
        assert_eq!(co2_factor(Some(900.0), &room, 12, &c, &p), 0.3);
        assert_eq!(co2_factor(Some(700.0), &room, 12, &c, &p), 0.0);
        assert_eq!(co2_factor(Some(1200.0), &room, 12, &c, &p), 0.7);
    }

    #[test]
    fn test_co2_factor_room_proxy() {
        let c = Co2Thresholds::default();
        let p = RoomPatterns::default();
        assert_eq!(co2_factor(None, &RoomType::Bedroom, 7, &c, &p), 0.8);
        assert_eq!(co2_factor(None, &RoomType::Bedroom, 14, &c, &p), 0.2);
        assert_eq!(co2_factor(None, &RoomType::Office, 10, &c, &p), 0.8);
        assert_eq!(co2_factor(None, &RoomType::Office, 18, &c, &p), 0.2);
        assert_eq!(co2_factor(None, &RoomType::Kitchen, 7, &c, &p), 0.8);
        assert_eq!(co2_factor(None, &RoomType::Kitchen, 12, &c, &p), 0.9);
        assert_eq!(co2_factor(None, &RoomType::Kitchen, 2, &c, &p), 0.3);
        assert_eq!(co2_factor(None, &RoomType::Bathroom, 20, &c, &p), 0.7);
        assert_eq!(co2_factor(None, &RoomType::Bathroom, 3, &c, &p), 0.3);
        assert_eq!(co2_factor(None, &RoomType::LivingRoom, 8, &c, &p), 0.7);
        assert_eq!(co2_factor(None, &RoomType::LivingRoom, 19, &c, &p), 0.6);
        assert_eq!(co2_factor(None, &RoomType::LivingRoom, 14, &c, &p), 0.3);
        assert_eq!(co2_factor(None, &RoomType::LivingRoom, 23, &c, &p), 0.2);
        assert_eq!(
            co2_factor(None, &RoomType::Other("hallway".into()), 8, &c, &p),
            0.2
        );
    }

    #[test]
    fn test_time_factor() {
        assert_eq!(time_factor(8), 0.8);
        assert_eq!(time_factor(19), 0.8);
        assert_eq!(time_factor(6), 0.5);
        assert_eq!(time_factor(16), 0.5);
        assert_eq!(time_factor(14), 0.2);
        assert_eq!(time_factor(0), 0.2);
    }

    #[test]
    fn test_wind_factor() {
        let w = WindThresholds::default();
        assert_eq!(wind_factor(10.0, true, &w), 0.0);
        assert_eq!(wind_factor(20.0, true, &w), -0.2);
        assert_eq!(wind_factor(30.0, true, &w), -0.5);
        assert_eq!(wind_factor(20.0, false, &w), 0.0);
    }

    #[test]
    fn test_wind_factor_boundaries() {
        let w = WindThresholds::default();
        assert_eq!(wind_factor(15.0, true, &w), -0.2);
        assert_eq!(wind_factor(25.0, true, &w), -0.5);
        assert_eq!(wind_factor(14.99, true, &w), 0.0);
    }
}
