use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;

use crate::config::Config;
use crate::scoring::{
    Advice, RoomReading, RoomType, ScoreResult, VentilationScorer, UNAVAILABLE_ADVICE,
};
use crate::sensors::{read_room, MissingReading, OutdoorReadings, StateSnapshot};

/// Wall clock that supplies the hour and month for scoring.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    Local,
    Utc,
}

impl Clock {
    pub fn now(self) -> NaiveDateTime {
        match self {
            Clock::Local => chrono::Local::now().naive_local(),
            Clock::Utc => chrono::Utc::now().naive_utc(),
        }
    }
}

/// Outcome of evaluating one configured room.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RoomStatus {
    Scored {
        reading: RoomReading,
        result: ScoreResult,
    },
    Unknown {
        missing: Vec<MissingReading>,
    },
}

/// One room's line in the output.
///
/// `score`, `advice` and `level` are derived from `status` and serialized at
/// the top level; `score` and `level` are null for unknown rooms.
#[derive(Debug, Clone, Serialize)]
pub struct RoomReport {
    pub room: String,
    pub room_type: RoomType,
    score: Option<f64>,
    advice: &'static str,
    level: Option<Advice>,
    #[serde(flatten)]
    pub status: RoomStatus,
}

impl RoomReport {
    pub fn new(room: impl Into<String>, room_type: RoomType, status: RoomStatus) -> Self {
        let (score, advice, level) = match &status {
            RoomStatus::Scored { result, .. } => (
                Some(result.score),
                result.advice.message(),
                Some(result.advice),
            ),
            RoomStatus::Unknown { .. } => (None, UNAVAILABLE_ADVICE, None),
        };
        Self {
            room: room.into(),
            room_type,
            score,
            advice,
            level,
            status,
        }
    }

    pub fn score(&self) -> Option<f64> {
        self.score
    }

    pub fn advice_text(&self) -> &'static str {
        self.advice
    }

    pub fn level(&self) -> Option<Advice> {
        self.level
    }
}

/// Score every enabled room of `config` against one state snapshot.
///
/// Reports keep config order. `now` supplies the hour and month used for the
/// time-of-day, season and CO2-proxy factors.
pub fn evaluate_rooms<T>(config: &Config, snapshot: &StateSnapshot, now: &T) -> Vec<RoomReport>
where
    T: Datelike + Timelike,
{
    let scorer = VentilationScorer::new(config.scoring());
    let outdoor = OutdoorReadings::from_snapshot(config, snapshot);
    let (hour, month) = (now.hour(), now.month());

    config
        .enabled_rooms()
        .map(|room| {
            let status = match read_room(room, &outdoor, snapshot, hour, month) {
                Ok(reading) => {
                    let result = scorer.evaluate(&reading);
                    RoomStatus::Scored { reading, result }
                }
                Err(missing) => {
                    tracing::warn!(
                        room = %room.name,
                        missing = %join_missing(&missing),
                        "cannot score room, readings unavailable"
                    );
                    RoomStatus::Unknown { missing }
                }
            };
            RoomReport::new(room.name.clone(), room.room_type.clone(), status)
        })
        .collect()
}

fn join_missing(missing: &[MissingReading]) -> String {
    missing
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
