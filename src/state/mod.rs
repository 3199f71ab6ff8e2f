//! State management module
//!
//! The pure focus timer, its configuration, and the shared application
//! state that owns the single timer instance.

pub mod app_state;
pub mod error;
pub mod notice;
pub mod timer_config;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use error::{StateError, TimerError};
pub use notice::{Notice, NoticeKind};
pub use timer_config::TimerConfig;
pub use timer_state::{
    Completion, Phase, SelectedTask, SessionKind, SessionLog, StartOutcome, TimerMode,
    TimerSnapshot, TimerState,
};
