//! Configuration and CLI argument handling

use std::time::Duration;

use clap::Parser;

use crate::state::{
    timer_config::{
        positive, DEFAULT_CUSTOM_MINUTES, DEFAULT_LONG_BREAK_MINUTES, DEFAULT_SESSIONS_BEFORE_LONG_BREAK,
        DEFAULT_SHORT_BREAK_MINUTES, DEFAULT_WORK_MINUTES,
    },
    TimerConfig, TimerError, TimerState,
};

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "focus-timer")]
#[command(about = "A state-managed HTTP service driving a pomodoro focus timer")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Base URL of the goals/todos/activities backend
    #[arg(long, env = "FOCUS_BACKEND_URL", default_value = "http://localhost:8000")]
    pub backend_url: String,

    /// Bearer token sent to the backend
    #[arg(long, env = "FOCUS_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Backend request timeout in seconds
    #[arg(long, default_value = "10")]
    pub request_timeout: u64,

    /// Focus session length in minutes
    #[arg(long, default_value_t = DEFAULT_WORK_MINUTES)]
    pub work: u32,

    /// Short break length in minutes
    #[arg(long, default_value_t = DEFAULT_SHORT_BREAK_MINUTES)]
    pub short_break: u32,

    /// Long break length in minutes
    #[arg(long, default_value_t = DEFAULT_LONG_BREAK_MINUTES)]
    pub long_break: u32,

    /// Focus sessions between long breaks
    #[arg(long, default_value_t = DEFAULT_SESSIONS_BEFORE_LONG_BREAK)]
    pub sessions_before_long_break: u32,

    /// Custom mode countdown length in minutes
    #[arg(long, default_value_t = DEFAULT_CUSTOM_MINUTES)]
    pub custom: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Validated pomodoro durations
    pub fn timer_config(&self) -> Result<TimerConfig, TimerError> {
        TimerConfig::new(
            self.work,
            self.short_break,
            self.long_break,
            self.sessions_before_long_break,
        )
    }

    /// The idle timer the service starts with
    pub fn initial_timer(&self) -> Result<TimerState, TimerError> {
        let custom = positive("custom_minutes", self.custom)?;
        Ok(TimerState::new(self.timer_config()?, custom))
    }
}
