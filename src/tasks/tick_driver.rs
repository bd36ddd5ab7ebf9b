//! One-second tick driver for the countdown

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::{debug, error, info};

use crate::state::{Countdown, TickOutcome};

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// Spawn the tick driver for `cycle` on the current runtime
pub fn spawn_tick_driver(countdown: Arc<Mutex<Countdown>>, cycle: u64) -> JoinHandle<()> {
    tokio::spawn(tick_driver_task(countdown, cycle))
}

/// Tick the engine once per second until the cycle completes or is superseded.
///
/// Pausing does not end the driver; paused ticks are skipped by the engine.
pub async fn tick_driver_task(countdown: Arc<Mutex<Countdown>>, cycle: u64) {
    debug!("Starting tick driver for cycle {}", cycle);

    // First tick one period from now, not immediately
    let mut interval = interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let outcome = {
            let mut countdown = match countdown.lock() {
                Ok(countdown) => countdown,
                Err(e) => {
                    error!("Failed to lock countdown, ending tick driver: {}", e);
                    return;
                }
            };

            if countdown.cycle != cycle {
                debug!("Tick driver for cycle {} superseded by {}", cycle, countdown.cycle);
                return;
            }
            if countdown.engine.state().is_idle() {
                return;
            }
            countdown.engine.tick()
        };

        match outcome {
            TickOutcome::Completed => {
                info!("Countdown complete, tick driver for cycle {} finished", cycle);
                return;
            }
            TickOutcome::BreakStarted => debug!("Tick driver entering break phase"),
            TickOutcome::Counted | TickOutcome::Skipped => {}
        }
    }
}
