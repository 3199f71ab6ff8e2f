//! API request and response structures

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    services::Task,
    state::{Notice, StartOutcome, StateError, TimerError, TimerMode, TimerSnapshot},
};

/// Response for timer transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub timer: TimerSnapshot,
}

impl ApiResponse {
    /// Create a new API response
    pub fn new(status: String, message: String, timer: TimerSnapshot) -> Self {
        Self {
            status,
            message,
            timestamp: Utc::now(),
            timer,
        }
    }

    /// Status reflects whether the timer is ticking
    pub fn from_timer(message: impl Into<String>, timer: TimerSnapshot) -> Self {
        let status = if timer.running { "running" } else { "idle" };
        Self::new(status.to_string(), message.into(), timer)
    }
}

/// Response for a start request; carries the offered tasks when prompting
#[derive(Debug, Clone, Serialize)]
pub struct StartResponse {
    pub status: StartOutcome,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub tasks: Vec<Task>,
    pub timer: TimerSnapshot,
}

/// Full status of the timer and the service
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    pub timer: TimerSnapshot,
    pub goal_title: Option<String>,
    pub pending_tasks: Vec<Task>,
    pub notice_count: usize,
    pub uptime: String,
    pub port: u16,
    pub host: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NoticesResponse {
    pub notices: Vec<Notice>,
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

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SelectRequest {
    #[serde(default)]
    pub task_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModeRequest {
    pub mode: TimerMode,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CustomMinutesRequest {
    pub minutes: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// A failed request, rendered as a JSON error body
#[derive(Debug)]
pub struct ApiError {
    pub code: StatusCode,
    pub message: String,
}

impl From<StateError> for ApiError {
    fn from(err: StateError) -> Self {
        let code = match &err {
            StateError::Timer(TimerError::InvalidConfig { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
            StateError::Timer(TimerError::UnknownTask(_)) => StatusCode::NOT_FOUND,
            StateError::Timer(_) => StatusCode::CONFLICT,
            StateError::Poisoned(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            code,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            status: "error".to_string(),
            message: self.message,
            timestamp: Utc::now(),
        };
        (self.code, Json(body)).into_response()
    }
}
