//! Focus Timer - A state-managed HTTP service driving a pomodoro focus timer
//!
//! This library provides the focus timer state machine, the backend
//! collaborators it logs sessions to, and the HTTP API that drives it.

pub mod api;
pub mod config;
pub mod services;
pub mod state;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use api::create_router;
pub use config::Config;
pub use state::{AppState, TimerConfig, TimerState};
pub use utils::signals::shutdown_signal;
