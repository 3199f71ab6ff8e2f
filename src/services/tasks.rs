//! Task provider: incomplete todos offered when a focus session starts

use futures::future::{BoxFuture, FutureExt};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::backend::{check_status, BackendClient, BackendError};
use crate::state::SelectedTask;

/// A selectable work item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default)]
    pub goal_id: Option<i64>,
}

fn default_priority() -> String {
    "medium".to_string()
}

impl Task {
    pub fn to_selected(&self) -> SelectedTask {
        SelectedTask {
            id: self.id,
            title: self.title.clone(),
            goal_id: self.goal_id,
        }
    }
}

pub trait TaskProvider: Send + Sync {
    /// List the user's incomplete tasks
    fn list_incomplete_tasks(&self) -> BoxFuture<'_, Result<Vec<Task>, BackendError>>;
}

impl TaskProvider for BackendClient {
    fn list_incomplete_tasks(&self) -> BoxFuture<'_, Result<Vec<Task>, BackendError>> {
        async move {
            let response = self
                .request(Method::GET, "/api/todos/")
                .query(&[("completed", "false")])
                .send()
                .await?;
            let tasks: Vec<Task> = check_status(response).await?.json().await?;
            debug!("Fetched {} incomplete tasks", tasks.len());
            Ok(tasks)
        }
        .boxed()
    }
}
