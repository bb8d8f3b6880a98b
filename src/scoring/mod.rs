pub mod advice;
pub mod config;
pub mod factors;
pub mod engine;
pub mod validation;

pub use advice::{Advice, UNAVAILABLE_ADVICE};
pub use config::*;
pub use factors::{absolute_humidity, RoomType, Season};
pub use engine::{
    calculate_score, FactorContribution, RoomReading, ScoreBreakdown, ScoreResult,
    VentilationScorer, WeightRegime,
};
pub use validation::validate_scoring;
