//! In-memory collaborators for unit tests

use std::sync::{Arc, Mutex};

use futures::future::{self, BoxFuture, FutureExt};

use super::{ActivityLogger, BackendError, Collaborators, GoalLookup, Task, TaskProvider};
use crate::state::SessionLog;

#[derive(Default)]
pub struct FakeBackend {
    pub tasks: Vec<Task>,
    pub tasks_fail: bool,
    pub log_fails: bool,
    pub logged: Arc<Mutex<Vec<SessionLog>>>,
}

pub fn task(id: i64, title: &str, goal_id: Option<i64>) -> Task {
    Task {
        id,
        title: title.to_string(),
        priority: "medium".to_string(),
        goal_id,
    }
}

fn rejected() -> BackendError {
    BackendError::Status {
        status: 503,
        body: "unavailable".to_string(),
    }
}

impl FakeBackend {
    pub fn into_collaborators(self) -> Collaborators {
        let backend = Arc::new(self);
        Collaborators {
            tasks: backend.clone(),
            activity: backend.clone(),
            goals: backend,
        }
    }
}

impl TaskProvider for FakeBackend {
    fn list_incomplete_tasks(&self) -> BoxFuture<'_, Result<Vec<Task>, BackendError>> {
        let result = if self.tasks_fail {
            Err(rejected())
        } else {
            Ok(self.tasks.clone())
        };
        future::ready(result).boxed()
    }
}

impl ActivityLogger for FakeBackend {
    fn log_session(&self, log: SessionLog) -> BoxFuture<'_, Result<(), BackendError>> {
        let result = if self.log_fails {
            Err(rejected())
        } else {
            if let Ok(mut logged) = self.logged.lock() {
                logged.push(log);
            }
            Ok(())
        };
        future::ready(result).boxed()
    }
}

impl GoalLookup for FakeBackend {
    fn find_goal_title(&self, goal_id: i64) -> BoxFuture<'_, Option<String>> {
        future::ready(Some(format!("goal {goal_id}"))).boxed()
    }
}
