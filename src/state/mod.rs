//! State management module
//! 
//! This module contains the timer state machine and the application state
//! that owns it.

pub mod app_state;
pub mod engine;
pub mod timer_state;

// Re-export main types
pub use app_state::{AppState, Countdown};
pub use engine::{parse_minutes, StateObserver, TickOutcome, TimerEngine};
pub use timer_state::{format_mmss, IdleReason, Phase, TimerDisplay, TimerState};
