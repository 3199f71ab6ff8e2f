//! Timer duration configuration and validation

use serde::{Deserialize, Serialize};

use super::TimerError;

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_SHORT_BREAK_MINUTES: u32 = 5;
pub const DEFAULT_LONG_BREAK_MINUTES: u32 = 15;
pub const DEFAULT_SESSIONS_BEFORE_LONG_BREAK: u32 = 4;
pub const DEFAULT_CUSTOM_MINUTES: u32 = 25;

/// Pomodoro durations, all in minutes except the session count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerConfig {
    pub work_minutes: u32,
    pub short_break_minutes: u32,
    pub long_break_minutes: u32,
    pub sessions_before_long_break: u32,
}

impl TimerConfig {
    /// Build a config, rejecting any non-positive value
    pub fn new(
        work_minutes: u32,
        short_break_minutes: u32,
        long_break_minutes: u32,
        sessions_before_long_break: u32,
    ) -> Result<Self, TimerError> {
        let config = Self {
            work_minutes,
            short_break_minutes,
            long_break_minutes,
            sessions_before_long_break,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check that every field is a positive integer
    pub fn validate(&self) -> Result<(), TimerError> {
        let fields = [
            ("work_minutes", self.work_minutes),
            ("short_break_minutes", self.short_break_minutes),
            ("long_break_minutes", self.long_break_minutes),
            ("sessions_before_long_break", self.sessions_before_long_break),
        ];

        for (field, value) in fields {
            positive(field, value)?;
        }
        Ok(())
    }

    pub fn work_seconds(&self) -> u64 {
        u64::from(self.work_minutes) * 60
    }

    pub fn short_break_seconds(&self) -> u64 {
        u64::from(self.short_break_minutes) * 60
    }

    pub fn long_break_seconds(&self) -> u64 {
        u64::from(self.long_break_minutes) * 60
    }

    /// Whether the break following `completed` focus sessions is a long one
    pub fn is_long_break_after(&self, completed: u32) -> bool {
        completed > 0 && completed % self.sessions_before_long_break == 0
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            short_break_minutes: DEFAULT_SHORT_BREAK_MINUTES,
            long_break_minutes: DEFAULT_LONG_BREAK_MINUTES,
            sessions_before_long_break: DEFAULT_SESSIONS_BEFORE_LONG_BREAK,
        }
    }
}

/// Reject zero for a minutes/count field
pub fn positive(field: &'static str, value: u32) -> Result<u32, TimerError> {
    if value == 0 {
        return Err(TimerError::InvalidConfig { field, value });
    }
    Ok(value)
}
