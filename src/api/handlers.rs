//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::Json,
};
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    error::TimerError,
    state::AppState,
};
use super::responses::{ApiResponse, HealthResponse, StartRequest, StatusResponse};

type HandlerResult = Result<Json<ApiResponse>, (StatusCode, Json<ApiResponse>)>;

/// Handle POST /timer/start - Start or restart the focus countdown
///
/// An empty body starts a countdown of the configured focus length.
pub async fn start_handler(State(state): State<Arc<AppState>>, body: Bytes) -> HandlerResult {
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        StartRequest::default()
    } else {
        match serde_json::from_slice::<StartRequest>(&body) {
            Ok(request) => request,
            Err(e) => {
                let e = TimerError::InvalidDuration(format!("malformed start request: {}", e));
                return Err(error_response(&state, e));
            }
        }
    };
    let StartRequest { seconds, minutes, task } = request;

    let result = match (seconds, minutes) {
        (Some(seconds), _) => whole_number(&seconds).and_then(|s| state.start(s, task)),
        (None, Some(Value::String(input))) => state.start_minutes(&input, task),
        (None, Some(minutes)) => whole_number(&minutes)
            .and_then(|m| state.start_minutes(&m.to_string(), task)),
        (None, None) => state.start_default(task),
    };

    match result {
        Ok(timer) => {
            info!("Start endpoint called - countdown at {}", timer.clock);
            Ok(Json(ApiResponse::ok("Focus timer started".to_string(), timer)))
        }
        Err(e) => Err(error_response(&state, e)),
    }
}

/// Handle POST /timer/pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    match state.pause() {
        Ok(timer) => {
            info!("Pause endpoint called - {}", timer.label);
            Ok(Json(ApiResponse::ok("Timer paused".to_string(), timer)))
        }
        Err(e) => Err(error_response(&state, e)),
    }
}

/// Handle POST /timer/resume - Resume a paused countdown
pub async fn resume_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    match state.resume() {
        Ok(timer) => {
            info!("Resume endpoint called - {}", timer.label);
            Ok(Json(ApiResponse::ok("Timer resumed".to_string(), timer)))
        }
        Err(e) => Err(error_response(&state, e)),
    }
}

/// Handle POST /timer/stop - Stop and reset the countdown
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> HandlerResult {
    match state.stop() {
        Ok(timer) => {
            info!("Stop endpoint called - timer reset");
            Ok(Json(ApiResponse::ok("Timer stopped".to_string(), timer)))
        }
        Err(e) => Err(error_response(&state, e)),
    }
}

/// Handle GET /timer - Return current timer status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Json(StatusResponse {
        timer: state.display(),
        task: state.current_task(),
        config: state.timer_config,
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    })
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}

fn whole_number(value: &Value) -> Result<i64, TimerError> {
    value
        .as_i64()
        .ok_or_else(|| TimerError::InvalidDuration(format!("not a whole number: {}", value)))
}

fn error_response(state: &AppState, e: TimerError) -> (StatusCode, Json<ApiResponse>) {
    let timer = state.display();
    match e {
        TimerError::InvalidDuration(_) => {
            warn!("Rejected timer command: {}", e);
            (StatusCode::BAD_REQUEST, Json(ApiResponse::error(e.to_string(), timer)))
        }
        TimerError::StateLock(_) => {
            error!("Timer command failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, Json(ApiResponse::error(e.to_string(), timer)))
        }
    }
}
