//! Main application state management

use std::{
    sync::{Arc, Mutex},
    time::Instant,
};
use chrono::{DateTime, Utc};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info};

use super::{
    engine::{parse_minutes, TimerEngine},
    timer_state::{TimerDisplay, TimerState},
};
use crate::{config::TimerConfig, error::TimerError, tasks::spawn_tick_driver};

/// The engine plus the id of the tick cycle allowed to drive it.
///
/// Every start and stop bumps `cycle`, so a tick driver that outlived its
/// cycle finds a mismatch under the lock and never touches the engine.
#[derive(Debug)]
pub struct Countdown {
    pub engine: TimerEngine,
    pub cycle: u64,
}

/// Main application state that owns the timer and its tick task
#[derive(Debug)]
pub struct AppState {
    /// Timer engine and current cycle id
    pub countdown: Arc<Mutex<Countdown>>,
    pub timer_config: TimerConfig,
    /// Handle of the running tick driver, if any
    tick_task: Mutex<Option<JoinHandle<()>>>,
    /// Latest display, updated by the engine observer
    display_tx: Arc<watch::Sender<TimerDisplay>>,
    /// Task the countdown was started for
    current_task: Mutex<Option<String>>,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Arc<Mutex<Option<String>>>,
    pub last_action_time: Arc<Mutex<Option<DateTime<Utc>>>>,
}

impl AppState {
    /// Create a new AppState with an idle timer
    pub fn new(port: u16, host: String, timer_config: TimerConfig) -> Self {
        let (display_tx, _) = watch::channel(TimerDisplay::default());
        let display_tx = Arc::new(display_tx);

        let observer_tx = Arc::clone(&display_tx);
        let engine = TimerEngine::new(timer_config).with_observer(move |state, reason| {
            let rendered = TimerDisplay::render(state, reason);
            debug!("Display update: {} {}", rendered.clock, rendered.label);
            observer_tx.send_replace(rendered);
        });

        Self {
            countdown: Arc::new(Mutex::new(Countdown { engine, cycle: 0 })),
            timer_config,
            tick_task: Mutex::new(None),
            display_tx,
            current_task: Mutex::new(None),
            start_time: Instant::now(),
            port,
            host,
            last_action: Arc::new(Mutex::new(None)),
            last_action_time: Arc::new(Mutex::new(None)),
        }
    }

    /// Start a focus countdown of `duration_seconds`, restarting any running one
    pub fn start(&self, duration_seconds: i64, task: Option<String>) -> Result<TimerDisplay, TimerError> {
        // Held for the whole call so concurrent starts cannot interleave their spawns
        let mut tick_task = self.tick_task.lock().map_err(TimerError::lock)?;

        let (cycle, display) = {
            let mut countdown = self.countdown.lock().map_err(TimerError::lock)?;
            countdown.engine.start(duration_seconds)?;
            countdown.cycle += 1;
            (countdown.cycle, Self::render(&countdown.engine))
        };

        if let Some(previous) = tick_task.take() {
            debug!("Cancelling previous tick cycle");
            previous.abort();
        }
        *tick_task = Some(spawn_tick_driver(Arc::clone(&self.countdown), cycle));
        drop(tick_task);

        if let Some(title) = &task {
            info!("Timer started for task: {}", title);
        }
        self.set_current_task(task)?;
        self.record_action("start");
        Ok(display)
    }

    /// Start from raw user-entered minutes, as typed into the dashboard input
    pub fn start_minutes(&self, input: &str, task: Option<String>) -> Result<TimerDisplay, TimerError> {
        let seconds = parse_minutes(input)?;
        self.start(seconds, task)
    }

    /// Start a countdown of the configured focus length
    pub fn start_default(&self, task: Option<String>) -> Result<TimerDisplay, TimerError> {
        let seconds = i64::try_from(self.timer_config.focus_seconds())
            .map_err(|_| TimerError::InvalidDuration("configured focus length is too long".to_string()))?;
        self.start(seconds, task)
    }

    /// Pause the countdown; the tick driver keeps running
    pub fn pause(&self) -> Result<TimerDisplay, TimerError> {
        let display = self.with_engine(|engine| engine.pause())?;
        self.record_action("pause");
        Ok(display)
    }

    /// Resume a paused countdown
    pub fn resume(&self) -> Result<TimerDisplay, TimerError> {
        let display = self.with_engine(|engine| engine.resume())?;
        self.record_action("resume");
        Ok(display)
    }

    /// Cancel the tick driver and reset the timer to idle
    pub fn stop(&self) -> Result<TimerDisplay, TimerError> {
        let mut tick_task = self.tick_task.lock().map_err(TimerError::lock)?;
        if let Some(handle) = tick_task.take() {
            handle.abort();
        }

        let display = {
            let mut countdown = self.countdown.lock().map_err(TimerError::lock)?;
            countdown.engine.stop();
            countdown.cycle += 1;
            Self::render(&countdown.engine)
        };
        drop(tick_task);

        self.set_current_task(None)?;
        self.record_action("stop");
        Ok(display)
    }

    /// Stop the timer on process exit
    pub fn shutdown(&self) -> Result<(), TimerError> {
        info!("Shutting down timer");
        self.stop().map(|_| ())
    }

    /// Get current timer state
    pub fn get_timer_state(&self) -> Result<TimerState, TimerError> {
        self.countdown
            .lock()
            .map(|countdown| countdown.engine.state())
            .map_err(TimerError::lock)
    }

    /// Get the current display
    pub fn display(&self) -> TimerDisplay {
        self.display_tx.borrow().clone()
    }

    /// Subscribe to display updates
    pub fn subscribe(&self) -> watch::Receiver<TimerDisplay> {
        self.display_tx.subscribe()
    }

    /// Whether a tick driver is currently alive
    pub fn tick_task_running(&self) -> bool {
        self.tick_task
            .lock()
            .map(|task| task.as_ref().is_some_and(|handle| !handle.is_finished()))
            .unwrap_or(false)
    }

    /// Task the current countdown belongs to
    pub fn current_task(&self) -> Option<String> {
        self.current_task.lock().ok().and_then(|task| task.clone())
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }

    fn with_engine<F>(&self, f: F) -> Result<TimerDisplay, TimerError>
    where
        F: FnOnce(&mut TimerEngine),
    {
        let mut countdown = self.countdown.lock().map_err(TimerError::lock)?;
        f(&mut countdown.engine);
        Ok(Self::render(&countdown.engine))
    }

    fn render(engine: &TimerEngine) -> TimerDisplay {
        TimerDisplay::render(&engine.state(), engine.idle_reason())
    }

    fn set_current_task(&self, task: Option<String>) -> Result<(), TimerError> {
        let mut current = self.current_task.lock().map_err(TimerError::lock)?;
        *current = task;
        Ok(())
    }

    fn record_action(&self, action: &str) {
        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }
    }
}

impl Drop for AppState {
    fn drop(&mut self) {
        if let Ok(mut tick_task) = self.tick_task.lock() {
            if let Some(handle) = tick_task.take() {
                handle.abort();
            }
        }
    }
}
