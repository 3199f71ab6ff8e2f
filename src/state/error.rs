//! Error types for timer transitions and shared state access

use thiserror::Error;

/// A rejected timer operation; the timer is left untouched
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimerError {
    #[error("invalid {field}: {value} (must be a positive integer)")]
    InvalidConfig { field: &'static str, value: u32 },
    #[error("timer is already running")]
    AlreadyRunning,
    #[error("timer is not running")]
    NotRunning,
    #[error("settings can only be changed while the timer is stopped")]
    Busy,
    #[error("no task selection is pending")]
    NotAwaitingSelection,
    #[error("countdown finished; reset the timer before starting again")]
    Expired,
    #[error("task {0} is not among the offered tasks")]
    UnknownTask(i64),
}

/// Errors surfaced by [`AppState`](super::AppState) operations
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Timer(#[from] TimerError),
    #[error("failed to lock {0} state")]
    Poisoned(&'static str),
}
