use std::io::IsTerminal;
use std::time::Duration;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::advisor::{RoomReport, RoomStatus};
use crate::scoring::{Advice, RoomReading, ScoreResult, WeightRegime};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format a score with two decimals. Unscored rooms show a dash.
pub fn format_score(score: Option<f64>) -> String {
    match score {
        Some(s) => format!("{:.2}", s),
        None => "-".to_string(),
    }
}

fn colorize_advice(text: &str, advice: Option<Advice>) -> String {
    match advice {
        Some(Advice::Good) => text.green().to_string(),
        Some(Advice::Moderate) => text.yellow().to_string(),
        Some(Advice::Poor) => text.red().to_string(),
        Some(Advice::VeryPoor) => text.red().bold().to_string(),
        None => text.dimmed().to_string(),
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn report_advice(report: &RoomReport) -> Option<Advice> {
    match &report.status {
        RoomStatus::Scored { result, .. } => Some(result.advice),
        RoomStatus::Unknown { .. } => None,
    }
}

/// Format room reports as a table with columns: Room, Score, Advice
/// Score column is right-aligned, 6 chars wide (fits "-0.50")
pub fn format_room_table(reports: &[RoomReport], use_colors: bool) -> String {
    if reports.is_empty() {
        return "No rooms configured.".to_string();
    }

    let term_width = get_terminal_width();
    let name_width = reports
        .iter()
        .map(|r| r.room.chars().count())
        .max()
        .unwrap_or(0);
    let score_width = 6;
    let separator = "  ";

    reports
        .iter()
        .map(|report| {
            let name = format!("{:<width$}", report.room, width = name_width);
            let score = format!("{:>width$}", format_score(report.score()), width = score_width);

            let fixed_width = name_width + score_width + separator.len() * 2;
            let advice = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate(report.advice_text(), width - fixed_width)
                }
                // Very narrow terminal, show truncated
                Some(_) => truncate(report.advice_text(), 20),
                // No terminal (pipe), don't truncate
                None => report.advice_text().to_string(),
            };

            if use_colors {
                format!(
                    "{}{}{}{}{}",
                    name.bold(),
                    separator,
                    score,
                    separator,
                    colorize_advice(&advice, report_advice(report))
                )
            } else {
                format!("{}{}{}{}{}", name, separator, score, separator, advice)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format room reports as tab-separated values for scripting
/// Columns: room, room_type, score, advice (no headers, no colors)
pub fn format_tsv(reports: &[RoomReport]) -> String {
    reports
        .iter()
        .map(|r| {
            format!(
                "{}\t{}\t{}\t{}",
                r.room,
                r.room_type,
                format_score(r.score()),
                r.advice_text()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Multi-line breakdown of one scored reading (for verbose mode)
pub fn format_breakdown(reading: &RoomReading, result: &ScoreResult, use_colors: bool) -> String {
    let regime = match result.breakdown.regime {
        WeightRegime::WithCo2 => "with CO2 sensor",
        WeightRegime::WithoutCo2 => "without CO2 sensor",
    };
    let co2 = reading
        .co2
        .map(|ppm| format!("{:.0} ppm", ppm))
        .unwrap_or_else(|| format!("none ({} pattern)", reading.room_type));

    let mut lines = vec![
        format!(
            "  Indoor: {:.1}°C / {:.0}% (AH {:.2})",
            reading.temp_in, reading.humidity_in, result.breakdown.absolute_humidity_in
        ),
        format!(
            "  Outdoor: {:.1}°C / {:.0}% (AH {:.2}), wind {:.1}",
            reading.temp_out,
            reading.humidity_out,
            result.breakdown.absolute_humidity_out,
            reading.wind_speed
        ),
        format!("  CO2: {}", co2),
        format!(
            "  Season: {:?}, hour {:02}, weights {}",
            result.breakdown.season, reading.hour, regime
        ),
    ];
    for factor in &result.breakdown.factors {
        let line = format!(
            "    {:<12} {:>5.2} x {:.2} = {:+.3}",
            factor.label, factor.value, factor.weight, factor.contribution
        );
        lines.push(if use_colors { line.dimmed().to_string() } else { line });
    }
    lines.join("\n")
}

/// Format one score with its advice, as printed by the `score` command
pub fn format_score_result(result: &ScoreResult, use_colors: bool) -> String {
    let score = format_score(Some(result.score));
    if use_colors {
        format!(
            "{}  {}",
            score.bold(),
            colorize_advice(result.advice.message(), Some(result.advice))
        )
    } else {
        format!("{}  {}", score, result.advice.message())
    }
}

/// Format an interval for log output (e.g. "5m")
pub fn format_interval(interval: Duration) -> String {
    humantime::format_duration(interval).to_string()
}
