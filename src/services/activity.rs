//! Activity logger: records completed focus sessions on the backend

use chrono::{DateTime, Utc};
use futures::future::{BoxFuture, FutureExt};
use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use super::backend::{check_status, BackendClient, BackendError};
use crate::state::{SessionKind, SessionLog};

pub trait ActivityLogger: Send + Sync {
    /// Record one completed session
    fn log_session(&self, log: SessionLog) -> BoxFuture<'_, Result<(), BackendError>>;
}

/// Request body for `POST /api/activities/`
#[derive(Debug, Serialize)]
struct ActivityCreate<'a> {
    activity_type: &'a str,
    title: &'a str,
    description: &'a str,
    duration_minutes: u32,
    extra_data: ExtraData<'a>,
}

#[derive(Debug, Serialize)]
struct ExtraData<'a> {
    mode: &'a str,
    session_type: SessionKind,
    todo_id: Option<i64>,
    goal_id: Option<i64>,
    completed_at: DateTime<Utc>,
}

impl<'a> From<&'a SessionLog> for ActivityCreate<'a> {
    fn from(log: &'a SessionLog) -> Self {
        Self {
            activity_type: &log.kind,
            title: &log.title,
            description: &log.description,
            duration_minutes: log.duration_minutes,
            extra_data: ExtraData {
                mode: log.metadata.mode.as_str(),
                session_type: log.metadata.session,
                todo_id: log.metadata.task_id,
                goal_id: log.metadata.goal_id,
                completed_at: log.metadata.completed_at,
            },
        }
    }
}

impl ActivityLogger for BackendClient {
    fn log_session(&self, log: SessionLog) -> BoxFuture<'_, Result<(), BackendError>> {
        async move {
            let body = ActivityCreate::from(&log);
            let response = self
                .request(Method::POST, "/api/activities/")
                .json(&body)
                .send()
                .await?;
            check_status(response).await?;
            debug!("Logged {} minute {}", log.duration_minutes, log.kind);
            Ok(())
        }
        .boxed()
    }
}
