use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDateTime, Timelike};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use vent_advisor::advisor::{evaluate_rooms, Clock, RoomReport, RoomStatus};
use vent_advisor::config::{self, Config};
use vent_advisor::output;
use vent_advisor::scoring::{
    validate_scoring, RoomReading, RoomType, ScoringConfig, VentilationScorer,
};
use vent_advisor::sensors::StateSnapshot;
use vent_advisor::watch::{watch, WatchOptions};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_INPUT: i32 = 1;
const EXIT_STATES: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score every configured room from a sensor state file
    Rooms {
        /// YAML or JSON file mapping sensor ids to states
        #[arg(short, long)]
        states: PathBuf,

        /// Print JSON instead of a table
        #[arg(long, conflicts_with = "tsv")]
        json: bool,

        /// Print tab-separated values
        #[arg(long)]
        tsv: bool,
    },
    /// Re-score all rooms on every scan interval until Ctrl-C
    Watch {
        /// YAML or JSON file mapping sensor ids to states (re-read every tick)
        #[arg(short, long)]
        states: PathBuf,

        /// Override the config's scan interval (seconds, 60-3600)
        #[arg(long, value_parser = clap::value_parser!(u64).range(60..=3600))]
        interval: Option<u64>,

        /// Stop after this many updates
        #[arg(long)]
        count: Option<u64>,
    },
    /// Score a single set of readings given on the command line
    Score(ScoreArgs),
    /// Write a starter config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args, Debug)]
struct ScoreArgs {
    /// Indoor temperature (°C)
    #[arg(long, allow_negative_numbers = true)]
    temp_in: f64,
    /// Indoor relative humidity (%)
    #[arg(long)]
    humidity_in: f64,
    /// Outdoor temperature (°C)
    #[arg(long, allow_negative_numbers = true)]
    temp_out: f64,
    /// Outdoor relative humidity (%)
    #[arg(long)]
    humidity_out: f64,
    /// Wind speed
    #[arg(long)]
    wind: f64,
    /// CO2 level (ppm); omit when the room has no sensor
    #[arg(long)]
    co2: Option<f64>,
    /// living_room, bedroom, bathroom, kitchen or office
    #[arg(long, default_value = "living_room")]
    room_type: String,
    /// Hour of day, 0-23 (defaults to now)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=23))]
    hour: Option<u32>,
    /// Month, 1-12 (defaults to now)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
    month: Option<u32>,
    /// Print JSON instead of text
    #[arg(long)]
    json: bool,
}

#[derive(Parser, Debug)]
#[command(name = "vent-advisor")]
#[command(about = "Room ventilation advisor: scores when to open the windows", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/vent-advisor/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Treat inconsistent scoring thresholds as a config error
    #[arg(long, global = true)]
    strict: bool,

    /// Take the current hour and month from UTC instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn clock(&self) -> Clock {
        if self.utc {
            Clock::Utc
        } else {
            Clock::Local
        }
    }
}

fn init_logging(verbose: bool) {
    let log_level = if verbose { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Report scoring threshold problems. Only fatal in strict mode.
fn check_scoring(scoring: &ScoringConfig, strict: bool) -> bool {
    match validate_scoring(scoring) {
        Ok(()) => true,
        Err(errors) if strict => {
            eprintln!("Scoring config errors:");
            for error in errors {
                eprintln!("  - {}", error);
            }
            false
        }
        Err(errors) => {
            for error in errors {
                tracing::warn!("{}", error);
            }
            true
        }
    }
}

fn load_checked_config(path: Option<PathBuf>, strict: bool) -> Result<Config, i32> {
    let config = match config::load_config(path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return Err(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config.validate() {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        return Err(EXIT_CONFIG);
    }

    if !check_scoring(&config.scoring(), strict) {
        return Err(EXIT_CONFIG);
    }

    tracing::debug!(
        name = config.display_name(),
        rooms = config.rooms.len(),
        enabled = config.enabled_rooms().count(),
        "config ready"
    );
    Ok(config)
}

fn print_reports(reports: &[RoomReport], verbose: bool) {
    let use_colors = output::should_use_colors();
    println!("{}", output::format_room_table(reports, use_colors));

    if verbose {
        for report in reports {
            if let RoomStatus::Scored { reading, result } = &report.status {
                println!();
                println!("{}", report.room);
                println!("{}", output::format_breakdown(reading, result, use_colors));
            }
        }
    }
}

fn run_score(
    args: ScoreArgs,
    config_path: Option<PathBuf>,
    strict: bool,
    verbose: bool,
    now: NaiveDateTime,
) -> Result<i32> {
    let scoring = match config::load_scoring_or_default(config_path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            return Ok(EXIT_CONFIG);
        }
    };
    if !check_scoring(&scoring, strict) {
        return Ok(EXIT_CONFIG);
    }

    for (name, value) in [
        ("--temp-in", args.temp_in),
        ("--humidity-in", args.humidity_in),
        ("--temp-out", args.temp_out),
        ("--humidity-out", args.humidity_out),
        ("--wind", args.wind),
    ]
    .into_iter()
    .chain(args.co2.map(|co2| ("--co2", co2)))
    {
        if !value.is_finite() {
            eprintln!("Invalid {}: must be a finite number", name);
            return Ok(EXIT_INPUT);
        }
    }

    let reading = RoomReading {
        temp_in: args.temp_in,
        humidity_in: args.humidity_in,
        temp_out: args.temp_out,
        humidity_out: args.humidity_out,
        wind_speed: args.wind,
        hour: args.hour.unwrap_or_else(|| now.hour()),
        month: args.month.unwrap_or_else(|| now.month()),
        room_type: RoomType::from(args.room_type.as_str()),
        co2: args.co2,
    };
    if let RoomType::Other(tag) = &reading.room_type {
        tracing::warn!("Unknown room type '{}', using generic CO2 pattern", tag);
    }

    let result = VentilationScorer::new(scoring).evaluate(&reading);

    if args.json {
        let json = serde_json::json!({ "reading": reading, "result": result });
        println!(
            "{}",
            serde_json::to_string_pretty(&json).context("Failed to serialize result")?
        );
    } else {
        let use_colors = output::should_use_colors();
        println!("{}", output::format_score_result(&result, use_colors));
        if verbose {
            println!("{}", output::format_breakdown(&reading, &result, use_colors));
        }
    }

    Ok(EXIT_SUCCESS)
}

async fn run(cli: Cli) -> Result<i32> {
    let clock = cli.clock();
    match cli.command {
        Commands::Rooms { states, json, tsv } => {
            let config = match load_checked_config(cli.config, cli.strict) {
                Ok(c) => c,
                Err(code) => return Ok(code),
            };
            let snapshot = match StateSnapshot::load(&states) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("State error: {:#}", e);
                    return Ok(EXIT_STATES);
                }
            };

            let reports = evaluate_rooms(&config, &snapshot, &clock.now());

            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&reports).context("Failed to serialize reports")?
                );
            } else if tsv {
                println!("{}", output::format_tsv(&reports));
            } else {
                print_reports(&reports, cli.verbose);
            }
            Ok(EXIT_SUCCESS)
        }
        Commands::Watch {
            states,
            interval,
            count,
        } => {
            let config = match load_checked_config(cli.config, cli.strict) {
                Ok(c) => c,
                Err(code) => return Ok(code),
            };
            let interval = interval
                .map(Duration::from_secs)
                .unwrap_or_else(|| config.scan_interval());
            tracing::info!(
                "Watching {} room(s), refreshing every {}",
                config.enabled_rooms().count(),
                output::format_interval(interval)
            );

            let options = WatchOptions {
                states_path: states,
                interval,
                clock,
                max_rounds: count,
            };
            let verbose = cli.verbose;
            watch(&config, &options, |reports| {
                println!("[{}]", clock.now().format("%Y-%m-%d %H:%M:%S"));
                print_reports(reports, verbose);
                println!();
            })
            .await?;
            Ok(EXIT_SUCCESS)
        }
        Commands::Score(args) => {
            run_score(args, cli.config, cli.strict, cli.verbose, clock.now())
        }
        Commands::Init { force } => {
            let path = match cli.config {
                Some(p) => p,
                None => config::get_config_path()?,
            };
            if let Err(e) = config::write_default_config(&path, force) {
                eprintln!("Init error: {:#}", e);
                return Ok(EXIT_CONFIG);
            }
            println!("Config written to {}", path.display());
            Ok(EXIT_SUCCESS)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            EXIT_INPUT
        }
    };
    std::process::exit(code);
}
