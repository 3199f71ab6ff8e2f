//! Goal lookup, used only to show which goal the selected task serves

use futures::future::{BoxFuture, FutureExt};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::warn;

use super::backend::{check_status, BackendClient, BackendError};

pub trait GoalLookup: Send + Sync {
    /// Title of the goal, or `None` if it is unknown or unreachable
    fn find_goal_title(&self, goal_id: i64) -> BoxFuture<'_, Option<String>>;
}

#[derive(Debug, Deserialize)]
struct GoalSummary {
    title: String,
}

impl BackendClient {
    async fn fetch_goal(&self, goal_id: i64) -> Result<Option<GoalSummary>, BackendError> {
        let response = self
            .request(Method::GET, &format!("/api/goals/{}", goal_id))
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let goal = check_status(response).await?.json().await?;
        Ok(Some(goal))
    }
}

impl GoalLookup for BackendClient {
    fn find_goal_title(&self, goal_id: i64) -> BoxFuture<'_, Option<String>> {
        async move {
            match self.fetch_goal(goal_id).await {
                Ok(goal) => goal.map(|g| g.title),
                Err(e) => {
                    warn!("Goal {} lookup failed: {}", goal_id, e);
                    None
                }
            }
        }
        .boxed()
    }
}
