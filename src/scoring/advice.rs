use serde::Serialize;
use std::fmt;

pub const SCORE_GOOD: f64 = 0.5;
pub const SCORE_MODERATE: f64 = 0.0;
pub const SCORE_POOR: f64 = -0.3;

/// Text shown for rooms that could not be scored.
pub const UNAVAILABLE_ADVICE: &str = "Unable to calculate ventilation advice";

/// Recommendation tier derived from a ventilation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    Good,
    Moderate,
    Poor,
    VeryPoor,
}

impl Advice {
    pub fn from_score(score: f64) -> Self {
        if score >= SCORE_GOOD {
            Advice::Good
        } else if score >= SCORE_MODERATE {
            Advice::Moderate
        } else if score >= SCORE_POOR {
            Advice::Poor
        } else {
            Advice::VeryPoor
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Advice::Good => "Good ventilation - no action needed",
            Advice::Moderate => "Moderate ventilation - consider opening windows briefly",
            Advice::Poor => "Poor ventilation - open windows for 10-15 minutes",
            Advice::VeryPoor => "Very poor ventilation - ventilate immediately for 20+ minutes",
        }
    }

    /// Short label for tables
    pub fn label(&self) -> &'static str {
        match self {
            Advice::Good => "good",
            Advice::Moderate => "moderate",
            Advice::Poor => "poor",
            Advice::VeryPoor => "very poor",
        }
    }
}

impl fmt::Display for Advice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
