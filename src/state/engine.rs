//! Focus/break countdown state machine
//!
//! The engine owns no clock. Whoever owns it calls [`TimerEngine::tick`] once
//! per second; the engine only decides what a tick means.

use std::fmt;

use tracing::{debug, info};

use super::timer_state::{IdleReason, Phase, TimerState};
use crate::{config::TimerConfig, error::TimerError};

/// Display observer invoked after every state mutation
pub type StateObserver = Box<dyn FnMut(&TimerState, IdleReason) + Send>;

/// Result of a single tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Idle or paused, nothing counted
    Skipped,
    /// One second counted down within the current phase
    Counted,
    /// Focus ran out and the break phase began
    BreakStarted,
    /// Break ran out, the timer is idle again
    Completed,
}

/// Countdown engine cycling `Idle -> Focus -> Break -> Idle`
pub struct TimerEngine {
    config: TimerConfig,
    state: TimerState,
    idle_reason: IdleReason,
    observer: Option<StateObserver>,
}

impl TimerEngine {
    /// Create an idle engine for the given configuration
    pub fn new(config: TimerConfig) -> Self {
        Self {
            config,
            state: TimerState::new(),
            idle_reason: IdleReason::Ready,
            observer: None,
        }
    }

    /// Register the display observer, replacing any previous one
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: FnMut(&TimerState, IdleReason) + Send + 'static,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn idle_reason(&self) -> IdleReason {
        self.idle_reason
    }

    /// Begin a focus phase of `duration_seconds`.
    ///
    /// Starting while a countdown is already underway discards it and
    /// starts over. A non-positive duration is rejected and leaves the
    /// current state untouched.
    pub fn start(&mut self, duration_seconds: i64) -> Result<(), TimerError> {
        if duration_seconds <= 0 {
            return Err(TimerError::InvalidDuration(format!(
                "duration must be positive, got {}",
                duration_seconds
            )));
        }

        if !self.state.is_idle() {
            debug!("Restarting timer that was in {:?}", self.state.phase);
        }

        self.state = TimerState::focus(duration_seconds as u64);
        info!("Focus phase started for {}s", duration_seconds);
        self.notify();
        Ok(())
    }

    /// Stop counting down without leaving the current phase
    pub fn pause(&mut self) {
        if self.state.is_idle() || !self.state.running {
            return;
        }
        self.state.running = false;
        info!("Timer paused with {}s remaining", self.state.remaining_seconds);
        self.notify();
    }

    /// Continue a paused countdown
    pub fn resume(&mut self) {
        if self.state.is_idle() || self.state.remaining_seconds == 0 || self.state.running {
            return;
        }
        self.state.running = true;
        info!("Timer resumed with {}s remaining", self.state.remaining_seconds);
        self.notify();
    }

    /// Reset to idle from any state
    pub fn stop(&mut self) {
        self.state = TimerState::new();
        self.idle_reason = IdleReason::Stopped;
        info!("Timer stopped");
        self.notify();
    }

    /// Advance the countdown by one second
    pub fn tick(&mut self) -> TickOutcome {
        if self.state.is_idle() || !self.state.running {
            return TickOutcome::Skipped;
        }

        self.state.remaining_seconds = self.state.remaining_seconds.saturating_sub(1);

        let outcome = if self.state.remaining_seconds > 0 {
            TickOutcome::Counted
        } else {
            match self.state.phase {
                Phase::Focus => {
                    self.state.phase = Phase::Break;
                    self.state.remaining_seconds = self.config.break_seconds();
                    info!("Focus phase finished, break for {}s", self.state.remaining_seconds);
                    TickOutcome::BreakStarted
                }
                Phase::Break => {
                    self.state = TimerState::new();
                    self.idle_reason = IdleReason::Completed;
                    info!("Break phase finished, focus cycle complete");
                    TickOutcome::Completed
                }
                // unreachable: idle returned above
                Phase::Idle => TickOutcome::Skipped,
            }
        };

        self.notify();
        outcome
    }

    fn notify(&mut self) {
        if let Some(observer) = self.observer.as_mut() {
            observer(&self.state, self.idle_reason);
        }
    }
}

/// Convert user-entered minutes into a start duration in seconds.
///
/// Only a whole number (surrounding whitespace allowed) is accepted.
/// Prefixes such as `"2.5"` or `"25 min"` are rejected as non-numeric
/// rather than truncated to their leading digits.
pub fn parse_minutes(input: &str) -> Result<i64, TimerError> {
    let minutes: i64 = input
        .trim()
        .parse()
        .map_err(|_| TimerError::InvalidDuration(format!("not a whole number of minutes: {:?}", input)))?;

    if minutes <= 0 {
        return Err(TimerError::InvalidDuration(format!(
            "minutes must be positive, got {}",
            minutes
        )));
    }

    minutes
        .checked_mul(60)
        .ok_or_else(|| TimerError::InvalidDuration(format!("{} minutes is too long", minutes)))
}

impl fmt::Debug for TimerEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerEngine")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("idle_reason", &self.idle_reason)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn engine(focus_minutes: u64, break_minutes: u64) -> TimerEngine {
        TimerEngine::new(TimerConfig::new(focus_minutes, break_minutes).unwrap())
    }

    fn tick_n(engine: &mut TimerEngine, n: usize) -> TickOutcome {
        let mut last = TickOutcome::Skipped;
        for _ in 0..n {
            last = engine.tick();
        }
        last
    }

    #[test]
    fn test_start_sets_focus() {
        for d in [1, 59, 60, 1500, 86_400] {
            let mut engine = engine(25, 5);
            engine.start(d).unwrap();
            assert_eq!(engine.state(), TimerState::focus(d as u64));
        }
    }

    #[test]
    fn test_start_rejects_non_positive() {
        let mut engine = engine(25, 5);
        assert!(matches!(engine.start(0), Err(TimerError::InvalidDuration(_))));
        assert!(matches!(engine.start(-5), Err(TimerError::InvalidDuration(_))));
        assert_eq!(engine.state(), TimerState::new());
        assert_eq!(engine.idle_reason(), IdleReason::Ready);

        engine.start(30).unwrap();
        engine.tick();
        let before = engine.state();
        assert!(engine.start(-1).is_err());
        assert_eq!(engine.state(), before);
    }

    #[test]
    fn test_focus_to_break_to_idle() {
        let mut engine = engine(1, 1);
        engine.start(60).unwrap();
        assert_eq!(engine.state().remaining_seconds, 60);

        assert_eq!(tick_n(&mut engine, 59), TickOutcome::Counted);
        assert_eq!(engine.state().remaining_seconds, 1);
        assert_eq!(engine.tick(), TickOutcome::BreakStarted);
        assert_eq!(engine.state().phase, Phase::Break);
        assert_eq!(engine.state().remaining_seconds, 60);
        assert!(engine.state().running);

        assert_eq!(tick_n(&mut engine, 59), TickOutcome::Counted);
        assert_eq!(engine.tick(), TickOutcome::Completed);
        assert_eq!(engine.state(), TimerState::new());
        assert_eq!(engine.idle_reason(), IdleReason::Completed);

        assert_eq!(engine.tick(), TickOutcome::Skipped);
        assert_eq!(engine.state(), TimerState::new());
    }

    #[test]
    fn test_break_length_uses_config() {
        let mut engine = engine(25, 3);
        engine.start(2).unwrap();
        assert_eq!(tick_n(&mut engine, 2), TickOutcome::BreakStarted);
        assert_eq!(engine.state().remaining_seconds, 180);
    }

    #[test]
    fn test_longest_break_does_not_overflow() {
        let longest = crate::config::MAX_PHASE_MINUTES;
        let mut engine = engine(longest, longest);
        engine.start(1).unwrap();
        assert_eq!(engine.tick(), TickOutcome::BreakStarted);
        assert_eq!(engine.state().remaining_seconds, longest * 60);
        assert_eq!(engine.tick(), TickOutcome::Counted);
    }

    #[test]
    fn test_pause_holds_remaining() {
        let mut engine = engine(25, 5);
        engine.start(100).unwrap();
        tick_n(&mut engine, 10);
        engine.pause();
        assert!(engine.state().is_paused());

        assert_eq!(tick_n(&mut engine, 25), TickOutcome::Skipped);
        assert_eq!(engine.state().remaining_seconds, 90);

        engine.resume();
        assert!(engine.state().running);
        engine.tick();
        assert_eq!(engine.state().remaining_seconds, 89);
    }

    #[test]
    fn test_pause_resume_noops_when_idle() {
        let mut engine = engine(25, 5);
        engine.pause();
        engine.resume();
        assert_eq!(engine.state(), TimerState::new());
    }

    #[test]
    fn test_stop_from_any_state() {
        let mut engine = engine(1, 1);

        engine.stop();
        assert_eq!(engine.state(), TimerState::new());

        engine.start(10).unwrap();
        engine.stop();
        assert_eq!(engine.state(), TimerState::new());
        assert_eq!(engine.idle_reason(), IdleReason::Stopped);

        engine.start(1).unwrap();
        engine.tick();
        assert_eq!(engine.state().phase, Phase::Break);
        engine.pause();
        engine.stop();
        assert_eq!(engine.state(), TimerState::new());
        assert_eq!(engine.tick(), TickOutcome::Skipped);
    }

    #[test]
    fn test_restart_while_running() {
        let mut engine = engine(25, 5);
        engine.start(100).unwrap();
        tick_n(&mut engine, 5);
        engine.start(40).unwrap();
        assert_eq!(engine.state(), TimerState::focus(40));
    }

    #[test]
    fn test_parse_minutes() {
        assert_eq!(parse_minutes("25"), Ok(1500));
        assert_eq!(parse_minutes(" 1 "), Ok(60));
        assert!(matches!(parse_minutes("0"), Err(TimerError::InvalidDuration(_))));
        assert!(matches!(parse_minutes("-5"), Err(TimerError::InvalidDuration(_))));
        assert!(matches!(parse_minutes("abc"), Err(TimerError::InvalidDuration(_))));
        assert!(matches!(parse_minutes(""), Err(TimerError::InvalidDuration(_))));
        assert!(matches!(parse_minutes("2.5"), Err(TimerError::InvalidDuration(_))));
        assert!(matches!(parse_minutes("25 min"), Err(TimerError::InvalidDuration(_))));
        assert!(parse_minutes(&i64::MAX.to_string()).is_err());
    }

    #[test]
    fn test_observer_sees_mutations_only() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut engine = engine(1, 1).with_observer(move |state, _| {
            sink.lock().unwrap().push(*state);
        });

        engine.pause();
        engine.start(2).unwrap();
        engine.pause();
        engine.pause();
        engine.tick();
        engine.resume();
        engine.resume();
        engine.tick();
        engine.stop();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 5);
        assert_eq!(seen[0], TimerState::focus(2));
        assert!(seen[1].is_paused());
        assert!(seen[2].running);
        assert_eq!(seen[3].remaining_seconds, 1);
        assert_eq!(seen[4], TimerState::new());
    }
}
