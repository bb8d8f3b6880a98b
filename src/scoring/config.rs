use serde::{Deserialize, Serialize};

use super::factors::RoomType;

/// Main scoring configuration.
///
/// Every section falls back to its hardcoded defaults, so a config file only
/// needs to name the values it changes.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   temperature:
///     winter_good: 3.0
///   co2:
///     very_poor: 1400
///   enable_wind_factor: false
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoringConfig {
    /// Indoor-minus-outdoor temperature cutoffs per season
    pub temperature: TemperatureThresholds,

    /// Indoor-minus-outdoor absolute humidity cutoffs
    pub humidity: HumidityThresholds,

    /// CO2 cutoffs in ppm
    pub co2: Co2Thresholds,

    /// Wind speed cutoffs
    pub wind: WindThresholds,

    /// Weight sets for the two CO2 regimes
    pub weights: ScoreWeights,

    /// Which months count as winter and summer (the rest are shoulder months)
    pub seasons: SeasonMonths,

    /// CO2 proxy used for rooms without a CO2 sensor
    pub room_patterns: RoomPatterns,

    /// Apply the wind penalty (default: true)
    pub enable_wind_factor: bool,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            temperature: TemperatureThresholds::default(),
            humidity: HumidityThresholds::default(),
            co2: Co2Thresholds::default(),
            wind: WindThresholds::default(),
            weights: ScoreWeights::default(),
            seasons: SeasonMonths::default(),
            room_patterns: RoomPatterns::default(),
            enable_wind_factor: true,
        }
    }
}

/// Temperature difference cutoffs (°C), as `good`/`moderate` pairs per season.
/// `default_*` applies to shoulder months.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TemperatureThresholds {
    pub winter_good: f64,
    pub winter_moderate: f64,
    pub summer_good: f64,
    pub summer_moderate: f64,
    pub default_good: f64,
    pub default_moderate: f64,
}

impl Default for TemperatureThresholds {
    fn default() -> Self {
        Self {
            winter_good: 2.0,
            winter_moderate: 0.0,
            summer_good: 3.0,
            summer_moderate: 0.0,
            default_good: 1.0,
            default_moderate: -2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct HumidityThresholds {
    pub good: f64,
    pub moderate: f64,
}

impl Default for HumidityThresholds {
    fn default() -> Self {
        Self {
            good: 1.0,
            moderate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Co2Thresholds {
    pub moderate: f64,
    pub poor: f64,
    pub very_poor: f64,
}

impl Default for Co2Thresholds {
    fn default() -> Self {
        Self {
            moderate: 800.0,
            poor: 1000.0,
            very_poor: 1200.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct WindThresholds {
    pub no_effect: f64,
    pub moderate_effect: f64,
}

impl Default for WindThresholds {
    fn default() -> Self {
        Self {
            no_effect: 15.0,
            moderate_effect: 25.0,
        }
    }
}

/// Factor weights. The first four apply when the room has no CO2 reading,
/// the `*_co2` / `co2_with_sensor` set when it does. Wind is never weighted.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ScoreWeights {
    pub temperature: f64,
    pub humidity: f64,
    pub co2: f64,
    pub time: f64,
    pub temperature_with_co2: f64,
    pub humidity_with_co2: f64,
    pub co2_with_sensor: f64,
    pub time_with_co2: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            temperature: 0.35,
            humidity: 0.35,
            co2: 0.2,
            time: 0.1,
            temperature_with_co2: 0.25,
            humidity_with_co2: 0.25,
            co2_with_sensor: 0.35,
            time_with_co2: 0.15,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SeasonMonths {
    pub winter_months: Vec<u32>,
    pub summer_months: Vec<u32>,
}

impl Default for SeasonMonths {
    fn default() -> Self {
        Self {
            winter_months: vec![12, 1, 2],
            summer_months: vec![6, 7, 8],
        }
    }
}

/// Hour-of-day CO2 proxy for one room type.
///
/// Tiers are checked in order; the first one listing the hour wins, otherwise
/// `otherwise` applies.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RoomPattern {
    #[serde(default)]
    pub tiers: Vec<HourTier>,
    pub otherwise: f64,
}

impl RoomPattern {
    pub fn factor_at(&self, hour: u32) -> f64 {
        self.tiers
            .iter()
            .find(|tier| tier.hours.contains(&hour))
            .map(|tier| tier.factor)
            .unwrap_or(self.otherwise)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct HourTier {
    pub hours: Vec<u32>,
    pub factor: f64,
}

fn tier(hours: impl IntoIterator<Item = u32>, factor: f64) -> HourTier {
    HourTier {
        hours: hours.into_iter().collect(),
        factor,
    }
}

/// CO2 proxy table keyed by room type.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RoomPatterns {
    pub living_room: RoomPattern,
    pub bedroom: RoomPattern,
    pub bathroom: RoomPattern,
    pub kitchen: RoomPattern,
    pub office: RoomPattern,
    /// Factor for room types outside the known set
    pub unknown_room: f64,
}

impl RoomPatterns {
    /// Proxy factor for `room_type` at `hour`.
    pub fn factor(&self, room_type: &RoomType, hour: u32) -> f64 {
        match self.pattern(room_type) {
            Some(pattern) => pattern.factor_at(hour),
            None => self.unknown_room,
        }
    }

    pub fn pattern(&self, room_type: &RoomType) -> Option<&RoomPattern> {
        match room_type {
            RoomType::LivingRoom => Some(&self.living_room),
            RoomType::Bedroom => Some(&self.bedroom),
            RoomType::Bathroom => Some(&self.bathroom),
            RoomType::Kitchen => Some(&self.kitchen),
            RoomType::Office => Some(&self.office),
            RoomType::Other(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &RoomPattern)> {
        [
            ("living_room", &self.living_room),
            ("bedroom", &self.bedroom),
            ("bathroom", &self.bathroom),
            ("kitchen", &self.kitchen),
            ("office", &self.office),
        ]
        .into_iter()
    }
}

impl Default for RoomPatterns {
    fn default() -> Self {
        Self {
            living_room: RoomPattern {
                tiers: vec![tier(6..=9, 0.7), tier(17..=22, 0.6), tier(10..=16, 0.3)],
                otherwise: 0.2,
            },
            bedroom: RoomPattern {
                tiers: vec![tier([6, 7, 8, 9, 21, 22, 23], 0.8)],
                otherwise: 0.2,
            },
            bathroom: RoomPattern {
                tiers: vec![tier([6, 7, 8, 9, 18, 19, 20, 21, 22], 0.7)],
                otherwise: 0.3,
            },
            kitchen: RoomPattern {
                tiers: vec![tier(6..=8, 0.8), tier([11, 12, 13, 17, 18, 19, 20], 0.9)],
                otherwise: 0.3,
            },
            office: RoomPattern {
                tiers: vec![tier(8..=17, 0.8)],
                otherwise: 0.2,
            },
            unknown_room: 0.2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scoring_config() {
        let config = ScoringConfig::default();

        assert_eq!(config.temperature.winter_good, 2.0);
        assert_eq!(config.temperature.default_moderate, -2.0);
        assert_eq!(config.co2.very_poor, 1200.0);
        assert_eq!(config.wind.moderate_effect, 25.0);
        assert_eq!(config.seasons.winter_months, vec![12, 1, 2]);
        assert!(config.enable_wind_factor);
    }

    #[test]
    fn test_default_weight_sets_sum_to_one() {
        let w = ScoreWeights::default();
        let without = w.temperature + w.humidity + w.co2 + w.time;
        let with = w.temperature_with_co2 + w.humidity_with_co2 + w.co2_with_sensor + w.time_with_co2;
        assert!((without - 1.0).abs() < 1e-9);
        assert!((with - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_partial_scoring_config_parse() {
        let yaml = r#"
temperature:
  winter_good: 4.5
co2:
  very_poor: 1500
enable_wind_factor: false
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.temperature.winter_good, 4.5);
        // Untouched siblings keep their defaults
        assert_eq!(config.temperature.winter_moderate, 0.0);
        assert_eq!(config.temperature.summer_good, 3.0);
        assert_eq!(config.co2.very_poor, 1500.0);
        assert_eq!(config.co2.poor, 1000.0);
        assert!(!config.enable_wind_factor);
        assert_eq!(config.weights, ScoreWeights::default());
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, ScoringConfig::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let yaml = "temprature:\n  winter_good: 1.0\n";
        assert!(serde_saphyr::from_str::<ScoringConfig>(yaml).is_err());
    }

    #[test]
    fn test_room_pattern_override() {
        let yaml = r#"
room_patterns:
  office:
    tiers:
      - hours: [9, 10]
        factor: 0.5
    otherwise: 0.1
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.room_patterns.factor(&RoomType::Office, 9), 0.5);
        assert_eq!(config.room_patterns.factor(&RoomType::Office, 14), 0.1);
        // Other rooms keep the defaults
        assert_eq!(config.room_patterns.factor(&RoomType::Kitchen, 12), 0.9);
    }

    #[test]
    fn test_first_matching_tier_wins() {
        let pattern = RoomPattern {
            tiers: vec![tier([8], 0.9), tier([8, 9], 0.1)],
            otherwise: 0.0,
        };
        assert_eq!(pattern.factor_at(8), 0.9);
        assert_eq!(pattern.factor_at(9), 0.1);
        assert_eq!(pattern.factor_at(10), 0.0);
    }

    #[test]
    fn test_unknown_room_uses_fallback() {
        let patterns = RoomPatterns::default();
        assert_eq!(patterns.factor(&RoomType::Other("garage".to_string()), 8), 0.2);
    }
}
