use super::config::ScoringConfig;

/// Check threshold ordering and value ranges of a scoring configuration.
/// Returns all validation errors at once (not just the first).
///
/// The scorer itself accepts any configuration; this is an opt-in check.
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let t = &config.temperature;
    for (season, good, moderate) in [
        ("winter", t.winter_good, t.winter_moderate),
        ("summer", t.summer_good, t.summer_moderate),
        ("default", t.default_good, t.default_moderate),
    ] {
        if good <= moderate {
            errors.push(format!(
                "scoring.temperature: {}_good ({}) must be greater than {}_moderate ({})",
                season, good, season, moderate
            ));
        }
    }

    let h = &config.humidity;
    if h.good <= h.moderate {
        errors.push(format!(
            "scoring.humidity: good ({}) must be greater than moderate ({})",
            h.good, h.moderate
        ));
    }

    let c = &config.co2;
    if !(c.moderate < c.poor && c.poor < c.very_poor) {
        errors.push(format!(
            "scoring.co2: thresholds must ascend moderate < poor < very_poor (got {} / {} / {})",
            c.moderate, c.poor, c.very_poor
        ));
    }

    let w = &config.wind;
    if w.no_effect >= w.moderate_effect {
        errors.push(format!(
            "scoring.wind: no_effect ({}) must be less than moderate_effect ({})",
            w.no_effect, w.moderate_effect
        ));
    }

    let weights = &config.weights;
    for (name, value) in [
        ("temperature", weights.temperature),
        ("humidity", weights.humidity),
        ("co2", weights.co2),
        ("time", weights.time),
        ("temperature_with_co2", weights.temperature_with_co2),
        ("humidity_with_co2", weights.humidity_with_co2),
        ("co2_with_sensor", weights.co2_with_sensor),
        ("time_with_co2", weights.time_with_co2),
    ] {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!(
                "scoring.weights.{}: must be a non-negative number (got {})",
                name, value
            ));
        }
    }

    let seasons = &config.seasons;
    for (name, months) in [
        ("winter_months", &seasons.winter_months),
        ("summer_months", &seasons.summer_months),
    ] {
        for month in months {
            if !(1..=12).contains(month) {
                errors.push(format!(
                    "scoring.seasons.{}: month {} is outside 1-12",
                    name, month
                ));
            }
        }
    }
    for month in &seasons.winter_months {
        if seasons.summer_months.contains(month) {
            errors.push(format!(
                "scoring.seasons: month {} is listed as both winter and summer",
                month
            ));
        }
    }

    for (room, pattern) in config.room_patterns.iter() {
        for (i, tier) in pattern.tiers.iter().enumerate() {
            if let Some(hour) = tier.hours.iter().find(|h| **h > 23) {
                errors.push(format!(
                    "scoring.room_patterns.{}.tiers[{}]: hour {} is outside 0-23",
                    room, i, hour
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
