use serde::Serialize;

use super::advice::Advice;
use super::config::ScoringConfig;
use super::factors::{self, RoomType, Season};

/// Point-in-time readings for one room.
///
/// All fields except `co2` are required; callers with missing data should
/// report the room as unknown instead of scoring it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomReading {
    pub temp_in: f64,
    pub humidity_in: f64,
    pub temp_out: f64,
    pub humidity_out: f64,
    pub wind_speed: f64,
    pub hour: u32,
    pub month: u32,
    pub room_type: RoomType,
    pub co2: Option<f64>,
}

/// Which weight set produced a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeightRegime {
    WithoutCo2,
    WithCo2,
}

#[derive(Debug, Clone, Serialize)]
pub struct FactorContribution {
    pub label: &'static str, // e.g. "Temperature", "Wind"
    pub value: f64,          // Raw sub-factor
    pub weight: f64,         // 1.0 for the unweighted wind factor
    pub contribution: f64,   // value * weight
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreBreakdown {
    pub season: Season,
    pub regime: WeightRegime,
    pub absolute_humidity_in: f64,
    pub absolute_humidity_out: f64,
    pub factors: Vec<FactorContribution>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScoreResult {
    pub score: f64,
    pub advice: Advice,
    pub breakdown: ScoreBreakdown,
}

/// Scores rooms against a fixed configuration.
///
/// Holds no mutable state; share it freely between threads.
#[derive(Debug, Clone, Default)]
pub struct VentilationScorer {
    config: ScoringConfig,
}

impl VentilationScorer {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    /// Ventilation score rounded to 2 decimals.
    pub fn score(&self, reading: &RoomReading) -> f64 {
        self.evaluate(reading).score
    }

    /// Score plus advice and the per-factor breakdown.
    pub fn evaluate(&self, reading: &RoomReading) -> ScoreResult {
        let config = &self.config;

        let ah_in = factors::absolute_humidity(reading.humidity_in, reading.temp_in);
        let ah_out = factors::absolute_humidity(reading.humidity_out, reading.temp_out);

        let season = Season::for_month(reading.month, &config.seasons);
        let f_t = factors::temperature_factor(
            reading.temp_in - reading.temp_out,
            season,
            &config.temperature,
        );
        let f_rh = factors::humidity_factor(ah_in, ah_out, &config.humidity);
        let f_co2 = factors::co2_factor(
            reading.co2,
            &reading.room_type,
            reading.hour,
            &config.co2,
            &config.room_patterns,
        );
        let f_time = factors::time_factor(reading.hour);
        let f_w = factors::wind_factor(reading.wind_speed, config.enable_wind_factor, &config.wind);

        let w = &config.weights;
        let (regime, weights) = match reading.co2 {
            None => (
                WeightRegime::WithoutCo2,
                [w.temperature, w.humidity, w.co2, w.time],
            ),
            Some(_) => (
                WeightRegime::WithCo2,
                [
                    w.temperature_with_co2,
                    w.humidity_with_co2,
                    w.co2_with_sensor,
                    w.time_with_co2,
                ],
            ),
        };

        let raw = weights[0] * f_t
            + weights[1] * f_rh
            + weights[2] * f_co2
            + weights[3] * f_time
            + f_w;
        let score = round2(raw);

        tracing::debug!(
            room_type = %reading.room_type,
            ?season,
            ?regime,
            f_t,
            f_rh,
            f_co2,
            f_time,
            f_w,
            score,
            "scored room"
        );

        let factors = [
            ("Temperature", f_t, weights[0]),
            ("Humidity", f_rh, weights[1]),
            ("CO2", f_co2, weights[2]),
            ("Time of day", f_time, weights[3]),
            ("Wind", f_w, 1.0),
        ]
        .into_iter()
        .map(|(label, value, weight)| FactorContribution {
            label,
            value,
            weight,
            contribution: value * weight,
        })
        .collect();

        ScoreResult {
            score,
            advice: Advice::from_score(score),
            breakdown: ScoreBreakdown {
                season,
                regime,
                absolute_humidity_in: ah_in,
                absolute_humidity_out: ah_out,
                factors,
            },
        }
    }
}

/// Score one reading with `config`.
pub fn calculate_score(config: &ScoringConfig, reading: &RoomReading) -> f64 {
    VentilationScorer::new(config.clone()).score(reading)
}

/// Round to 2 decimals from the exact binary value. Scaling by 100 first
/// would round twice and can push e.g. 0.4949... up to 0.5.
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}
