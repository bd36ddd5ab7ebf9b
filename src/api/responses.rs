//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{config::TimerConfig, state::TimerDisplay};

/// Body of `POST /timer/start`.
///
/// Durations are kept as raw JSON so that strings typed into the dashboard
/// input and malformed values both reach the timer's own validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StartRequest {
    /// Duration in seconds, takes precedence over `minutes`
    pub seconds: Option<serde_json::Value>,
    /// Duration in minutes, as a number or the raw input string
    pub minutes: Option<serde_json::Value>,
    /// Title of the task the countdown is for
    pub task: Option<String>,
}

/// API response structure for timer command endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerDisplay,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerDisplay) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Create an ok response
    pub fn ok(message: String, timer: TimerDisplay) -> Self {
        Self::new("ok".to_string(), message, timer)
    }

    /// Create an error response
    pub fn error(message: String, timer: TimerDisplay) -> Self {
        Self::new("error".to_string(), message, timer)
    }
}

/// Timer status with server metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub timer: TimerDisplay,
    pub task: Option<String>,
    pub config: TimerConfig,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
