//! Timer state structure and display formatting

use serde::{Deserialize, Serialize};

/// Countdown phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Focus,
    Break,
}

/// Why the timer is sitting in the idle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdleReason {
    /// Never started
    Ready,
    /// Break phase ran out
    Completed,
    /// Stopped by the user
    Stopped,
}

/// Timer state for tracking the focus/break countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerState {
    pub phase: Phase,
    pub remaining_seconds: u64,
    pub running: bool,
}

impl TimerState {
    /// Create a new idle timer state
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            remaining_seconds: 0,
            running: false,
        }
    }

    /// Create a running focus state with remaining seconds
    pub fn focus(remaining_seconds: u64) -> Self {
        Self {
            phase: Phase::Focus,
            remaining_seconds,
            running: true,
        }
    }

    /// Check if the timer is idle
    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Check if the timer is in a phase but not counting down
    pub fn is_paused(&self) -> bool {
        !self.is_idle() && !self.running
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// What the dashboard renders: the clock and the phase label
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerDisplay {
    pub clock: String,
    pub label: String,
    pub phase: Phase,
    pub running: bool,
    pub remaining_seconds: u64,
}

impl TimerDisplay {
    /// Build the display for a state; `idle_reason` only matters when idle
    pub fn render(state: &TimerState, idle_reason: IdleReason) -> Self {
        Self {
            clock: format_mmss(state.remaining_seconds),
            label: phase_label(state, idle_reason).to_string(),
            phase: state.phase,
            running: state.running,
            remaining_seconds: state.remaining_seconds,
        }
    }
}

impl Default for TimerDisplay {
    fn default() -> Self {
        Self::render(&TimerState::new(), IdleReason::Ready)
    }
}

/// Label shown next to the clock
pub fn phase_label(state: &TimerState, idle_reason: IdleReason) -> &'static str {
    match (state.phase, state.running) {
        (Phase::Focus, true) => "Focus Time",
        (Phase::Break, true) => "Break Time!",
        (Phase::Focus | Phase::Break, false) => "Paused",
        (Phase::Idle, _) => match idle_reason {
            IdleReason::Ready => "Ready",
            IdleReason::Completed => "Focus complete",
            IdleReason::Stopped => "Stopped",
        },
    }
}

/// Format seconds as zero-padded `MM:SS`; minutes are not wrapped into hours
pub fn format_mmss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_mmss() {
        assert_eq!(format_mmss(0), "00:00");
        assert_eq!(format_mmss(9), "00:09");
        assert_eq!(format_mmss(61), "01:01");
        assert_eq!(format_mmss(25 * 60), "25:00");
        assert_eq!(format_mmss(3600), "60:00");
    }

    #[test]
    fn test_labels() {
        let mut state = TimerState::focus(10);
        assert_eq!(phase_label(&state, IdleReason::Ready), "Focus Time");

        state.running = false;
        assert!(state.is_paused());
        assert_eq!(phase_label(&state, IdleReason::Ready), "Paused");

        state.phase = Phase::Break;
        state.running = true;
        assert_eq!(phase_label(&state, IdleReason::Ready), "Break Time!");

        let idle = TimerState::new();
        assert_eq!(phase_label(&idle, IdleReason::Ready), "Ready");
        assert_eq!(phase_label(&idle, IdleReason::Completed), "Focus complete");
        assert_eq!(phase_label(&idle, IdleReason::Stopped), "Stopped");
    }

    #[test]
    fn test_display_render() {
        let display = TimerDisplay::render(&TimerState::focus(90), IdleReason::Ready);
        assert_eq!(display.clock, "01:30");
        assert_eq!(display.label, "Focus Time");
        assert_eq!(display.phase, Phase::Focus);
        assert!(display.running);
    }

    #[test]
    fn test_phase_serializes_lowercase() {
        let json = serde_json::to_string(&Phase::Break).unwrap();
        assert_eq!(json, "\"break\"");
    }
}
