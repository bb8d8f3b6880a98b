use anyhow::Result;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::MissedTickBehavior;

use crate::advisor::{evaluate_rooms, Clock, RoomReport};
use crate::config::Config;
use crate::sensors::StateSnapshot;

pub struct WatchOptions {
    pub states_path: PathBuf,
    pub interval: Duration,
    /// Source of the hour and month for each evaluation
    pub clock: Clock,
    /// Stop after this many evaluations (None = until Ctrl-C)
    pub max_rounds: Option<u64>,
}

/// Re-evaluate all rooms every `interval` until Ctrl-C.
///
/// The state file is re-read on every tick. A tick whose snapshot cannot be
/// loaded is logged and skipped; the loop keeps going.
pub async fn watch<F>(config: &Config, options: &WatchOptions, mut on_update: F) -> Result<()>
where
    F: FnMut(&[RoomReport]),
{
    let mut ticker = tokio::time::interval(options.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut rounds = 0u64;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                rounds += 1;
                match StateSnapshot::load(&options.states_path) {
                    Ok(snapshot) => {
                        let reports = evaluate_rooms(config, &snapshot, &options.clock.now());
                        on_update(&reports);
                    }
                    Err(e) => {
                        tracing::error!("Skipping update: {:#}", e);
                    }
                }
                if options.max_rounds.is_some_and(|max| rounds >= max) {
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted, stopping watch");
                break;
            }
        }
    }

    Ok(())
}
