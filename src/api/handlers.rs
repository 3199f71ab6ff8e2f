//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{extract::State, response::Json};
use tracing::{info, warn};

use super::responses::{
    ApiError, ApiResponse, CustomMinutesRequest, HealthResponse, ModeRequest, NoticesResponse,
    SelectRequest, StartResponse, StatusResponse,
};
use crate::{
    services::Task,
    state::{AppState, Notice, StartOutcome, TimerConfig},
};

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Fetch the tasks to offer, degrading to none when the provider fails
async fn offered_tasks(state: &AppState) -> Vec<Task> {
    match state.collaborators.tasks.list_incomplete_tasks().await {
        Ok(tasks) => tasks,
        Err(e) => {
            warn!("Task provider unavailable: {}", e);
            let notice = Notice::provider_unavailable(format!(
                "Could not load tasks, starting without one: {}",
                e
            ));
            if let Err(e) = state.add_notice(notice) {
                warn!("Failed to add provider notice: {}", e);
            }
            Vec::new()
        }
    }
}

/// Handle POST /timer/start - Start the countdown or prompt for a task
pub async fn start_handler(State(state): State<Arc<AppState>>) -> ApiResult<StartResponse> {
    let tasks = if state.needs_task_prompt()? {
        offered_tasks(&state).await
    } else {
        Vec::new()
    };

    let outcome = state.start(tasks)?;
    let (message, tasks) = match outcome {
        StartOutcome::Running => ("Timer started".to_string(), Vec::new()),
        StartOutcome::AwaitingTaskSelection => (
            "Choose a task to focus on, or start without one".to_string(),
            state.pending_tasks()?,
        ),
    };

    Ok(Json(StartResponse {
        status: outcome,
        message,
        timestamp: chrono::Utc::now(),
        tasks,
        timer: state.snapshot()?,
    }))
}

/// Handle POST /timer/select - Confirm a pending start with an optional task
pub async fn select_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SelectRequest>,
) -> ApiResult<ApiResponse> {
    let selected = state.confirm_start(request.task_id)?;

    match selected.as_ref().map(|task| (task.id, task.goal_id)) {
        Some((task_id, Some(goal_id))) => {
            let title = state.collaborators.goals.find_goal_title(goal_id).await;
            // Skipped when a reset or mode change dropped the task meanwhile
            state.set_goal_title_for(task_id, title)?;
        }
        _ => state.set_goal_title(None)?,
    }

    let message = match &selected {
        Some(task) => format!("Timer started on \"{}\"", task.title),
        None => "Timer started without a task".to_string(),
    };
    Ok(Json(ApiResponse::from_timer(message, state.snapshot()?)))
}

/// Handle POST /timer/select/cancel - Dismiss the task prompt
pub async fn cancel_selection_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    state.cancel_selection()?;
    Ok(Json(ApiResponse::from_timer("Task selection cancelled", state.snapshot()?)))
}

/// Handle POST /timer/pause - Pause the countdown
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    state.pause()?;
    Ok(Json(ApiResponse::from_timer("Timer paused", state.snapshot()?)))
}

/// Handle POST /timer/reset - Refill the current session
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    state.reset()?;
    Ok(Json(ApiResponse::from_timer("Timer reset", state.snapshot()?)))
}

/// Handle POST /timer/mode - Switch between pomodoro and custom mode
pub async fn mode_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ModeRequest>,
) -> ApiResult<ApiResponse> {
    state.change_mode(request.mode)?;
    let message = format!("Switched to {} mode", request.mode.as_str());
    Ok(Json(ApiResponse::from_timer(message, state.snapshot()?)))
}

/// Handle PUT /timer/config - Replace the pomodoro durations
pub async fn config_handler(
    State(state): State<Arc<AppState>>,
    Json(config): Json<TimerConfig>,
) -> ApiResult<ApiResponse> {
    state.update_config(config)?;
    Ok(Json(ApiResponse::from_timer("Settings applied", state.snapshot()?)))
}

/// Handle DELETE /timer/config - Restore the classic pomodoro durations
pub async fn default_config_handler(State(state): State<Arc<AppState>>) -> ApiResult<ApiResponse> {
    state.update_config(TimerConfig::default())?;
    Ok(Json(ApiResponse::from_timer("Settings restored to defaults", state.snapshot()?)))
}

/// Handle PUT /timer/custom - Set the custom countdown length
pub async fn custom_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CustomMinutesRequest>,
) -> ApiResult<ApiResponse> {
    state.set_custom_minutes(request.minutes)?;
    let message = format!("Custom duration set to {} minutes", request.minutes);
    Ok(Json(ApiResponse::from_timer(message, state.snapshot()?)))
}

/// Handle GET /timer - Return the timer and service status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> ApiResult<StatusResponse> {
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        timer: state.latest_snapshot(),
        goal_title: state.goal_title()?,
        pending_tasks: state.pending_tasks()?,
        notice_count: state.notices()?.len(),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /notices - List passive failure notices
pub async fn notices_handler(State(state): State<Arc<AppState>>) -> ApiResult<NoticesResponse> {
    Ok(Json(NoticesResponse {
        notices: state.notices()?,
    }))
}

/// Handle DELETE /notices - Dismiss all notices
pub async fn clear_notices_handler(State(state): State<Arc<AppState>>) -> ApiResult<NoticesResponse> {
    let cleared = state.clear_notices()?;
    info!("Dismissed {} notices", cleared);
    Ok(Json(NoticesResponse { notices: Vec::new() }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
