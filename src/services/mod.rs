//! External collaborator module
//!
//! The focus timer depends on three backend contracts: a task provider, an
//! activity logger and a goal lookup. Each is a trait so the HTTP backend
//! can be swapped for fakes in tests.

pub mod activity;
pub mod backend;
pub mod goals;
pub mod tasks;

#[cfg(test)]
pub(crate) mod testing;

use std::sync::Arc;

// Re-export main types
pub use activity::ActivityLogger;
pub use backend::{BackendClient, BackendError};
pub use goals::GoalLookup;
pub use tasks::{Task, TaskProvider};

/// The set of collaborators the application state talks to
#[derive(Clone)]
pub struct Collaborators {
    pub tasks: Arc<dyn TaskProvider>,
    pub activity: Arc<dyn ActivityLogger>,
    pub goals: Arc<dyn GoalLookup>,
}

impl Collaborators {
    /// Use one REST backend for all three contracts
    pub fn backend(client: BackendClient) -> Self {
        let client = Arc::new(client);
        Self {
            tasks: client.clone(),
            activity: client.clone(),
            goals: client,
        }
    }
}
