//! Focus Timer - A focus/break countdown server for dashboard widgets
//! 
//! This library provides the countdown state machine, the one-second tick
//! driver that advances it, and the HTTP API a dashboard uses to control it.

pub mod config;
pub mod error;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, TimerConfig};
pub use error::TimerError;
pub use state::{AppState, TimerEngine};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
