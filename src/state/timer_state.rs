//! Focus timer state machine
//!
//! The timer is a pure value: every transition is a method that mutates it
//! and, on completion, hands back a [`SessionLog`] command for the caller to
//! dispatch. Nothing in here touches a clock or the network.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    timer_config::{positive, TimerConfig, DEFAULT_CUSTOM_MINUTES},
    TimerError,
};
use crate::utils::format_clock;

pub const FOCUS_SESSION_KIND: &str = "focus_session";

/// Which countdown logic applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// Alternating focus/break cycle with a long break every N sessions
    Pomodoro,
    /// Single countdown, no breaks
    #[serde(alias = "straight")]
    Custom,
}

impl TimerMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Pomodoro => "pomodoro",
            TimerMode::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Focus,
    Break,
}

/// Where the timer is in its start/stop lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Idle,
    /// Start was requested; waiting for an optional task choice
    AwaitingTaskSelection,
    Running,
}

/// Weak reference to an external task, kept only for display and logging
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedTask {
    pub id: i64,
    pub title: String,
    pub goal_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionMetadata {
    pub mode: TimerMode,
    pub session: SessionKind,
    pub task_id: Option<i64>,
    pub goal_id: Option<i64>,
    pub completed_at: DateTime<Utc>,
}

/// Command describing a completed focus session to be logged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionLog {
    pub duration_minutes: u32,
    pub kind: String,
    pub title: String,
    pub description: String,
    pub metadata: SessionMetadata,
}

/// Result of a start request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StartOutcome {
    Running,
    AwaitingTaskSelection,
}

/// Emitted when a countdown reaches zero
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub finished: SessionKind,
    pub log: Option<SessionLog>,
}

/// The focus timer
#[derive(Debug, Clone)]
pub struct TimerState {
    config: TimerConfig,
    custom_minutes: u32,
    mode: TimerMode,
    session: SessionKind,
    phase: Phase,
    remaining_seconds: u64,
    completed_sessions: u32,
    selected_task: Option<SelectedTask>,
}

impl TimerState {
    /// Create an idle pomodoro timer at the start of a focus session
    pub fn new(config: TimerConfig, custom_minutes: u32) -> Self {
        Self {
            config,
            custom_minutes,
            mode: TimerMode::Pomodoro,
            session: SessionKind::Focus,
            phase: Phase::Idle,
            remaining_seconds: config.work_seconds(),
            completed_sessions: 0,
            selected_task: None,
        }
    }

    pub fn config(&self) -> TimerConfig {
        self.config
    }

    pub fn custom_minutes(&self) -> u32 {
        self.custom_minutes
    }

    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    pub fn session(&self) -> SessionKind {
        self.session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining_seconds
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn selected_task(&self) -> Option<&SelectedTask> {
        self.selected_task.as_ref()
    }

    /// Full length of the current session in seconds
    pub fn total_seconds(&self) -> u64 {
        match (self.mode, self.session) {
            (TimerMode::Custom, _) => u64::from(self.custom_minutes) * 60,
            (TimerMode::Pomodoro, SessionKind::Focus) => self.config.work_seconds(),
            (TimerMode::Pomodoro, SessionKind::Break) => {
                if self.config.is_long_break_after(self.completed_sessions) {
                    self.config.long_break_seconds()
                } else {
                    self.config.short_break_seconds()
                }
            }
        }
    }

    /// Fraction of the current session already elapsed, in [0, 1]
    pub fn progress(&self) -> f64 {
        let total = self.total_seconds();
        if total == 0 {
            return 0.0;
        }
        (total - self.remaining_seconds.min(total)) as f64 / total as f64
    }

    /// Whether starting now should first offer a task choice
    pub fn needs_task_prompt(&self) -> bool {
        self.mode == TimerMode::Pomodoro
            && self.session == SessionKind::Focus
            && self.selected_task.is_none()
            && self.phase != Phase::Running
    }

    /// Request the countdown to run
    pub fn start(&mut self, available_tasks: usize) -> Result<StartOutcome, TimerError> {
        if self.phase == Phase::Running {
            return Err(TimerError::AlreadyRunning);
        }
        if self.remaining_seconds == 0 {
            return Err(TimerError::Expired);
        }

        if self.needs_task_prompt() && available_tasks > 0 {
            self.phase = Phase::AwaitingTaskSelection;
            return Ok(StartOutcome::AwaitingTaskSelection);
        }

        self.phase = Phase::Running;
        Ok(StartOutcome::Running)
    }

    /// Leave the task prompt and start running, with or without a task
    pub fn confirm_start(&mut self, task: Option<SelectedTask>) -> Result<(), TimerError> {
        if self.phase != Phase::AwaitingTaskSelection {
            return Err(TimerError::NotAwaitingSelection);
        }
        self.selected_task = task;
        self.phase = Phase::Running;
        Ok(())
    }

    /// Dismiss the task prompt without starting
    pub fn cancel_selection(&mut self) -> Result<(), TimerError> {
        if self.phase != Phase::AwaitingTaskSelection {
            return Err(TimerError::NotAwaitingSelection);
        }
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Advance one second. Returns the completion when the countdown hits zero.
    pub fn tick(&mut self, now: DateTime<Utc>) -> Option<Completion> {
        if self.phase != Phase::Running {
            return None;
        }

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            Some(self.complete(now))
        } else {
            None
        }
    }

    fn complete(&mut self, now: DateTime<Utc>) -> Completion {
        self.phase = Phase::Idle;
        let finished = self.session;

        match (self.mode, self.session) {
            (TimerMode::Pomodoro, SessionKind::Focus) => {
                let log = self.session_log(self.config.work_minutes, now);
                self.completed_sessions += 1;
                self.session = SessionKind::Break;
                self.remaining_seconds = self.total_seconds();
                Completion { finished, log: Some(log) }
            }
            (TimerMode::Pomodoro, SessionKind::Break) => {
                self.session = SessionKind::Focus;
                self.remaining_seconds = self.total_seconds();
                Completion { finished, log: None }
            }
            (TimerMode::Custom, _) => {
                // stays at zero until reset
                let log = self.session_log(self.custom_minutes, now);
                Completion { finished, log: Some(log) }
            }
        }
    }

    fn session_log(&self, minutes: u32, now: DateTime<Utc>) -> SessionLog {
        let mode = self.mode.as_str();
        let (title, description) = match &self.selected_task {
            Some(task) => (
                format!("Focus: {}", task.title),
                format!(
                    "Worked on \"{}\" for {} minutes using {} mode",
                    task.title, minutes, mode
                ),
            ),
            None => {
                let title = match self.mode {
                    TimerMode::Pomodoro => "Pomodoro Focus Session",
                    TimerMode::Custom => "Deep Focus Session",
                };
                (
                    title.to_string(),
                    format!("Completed {} minute focus session using {} mode", minutes, mode),
                )
            }
        };

        SessionLog {
            duration_minutes: minutes,
            kind: FOCUS_SESSION_KIND.to_string(),
            title,
            description,
            metadata: SessionMetadata {
                mode: self.mode,
                session: self.session,
                task_id: self.selected_task.as_ref().map(|t| t.id),
                goal_id: self.selected_task.as_ref().and_then(|t| t.goal_id),
                completed_at: now,
            },
        }
    }

    /// Stop ticking, keeping the remaining time
    pub fn pause(&mut self) -> Result<(), TimerError> {
        if self.phase != Phase::Running {
            return Err(TimerError::NotRunning);
        }
        self.phase = Phase::Idle;
        Ok(())
    }

    /// Stop, drop the selected task and refill the current session
    pub fn reset(&mut self) {
        self.phase = Phase::Idle;
        self.selected_task = None;
        self.remaining_seconds = self.total_seconds();
    }

    /// Switch modes; always lands on a fresh focus session
    pub fn change_mode(&mut self, mode: TimerMode) {
        self.reset();
        self.mode = mode;
        self.session = SessionKind::Focus;
        self.remaining_seconds = self.total_seconds();
    }

    /// Replace the pomodoro durations while stopped
    pub fn update_config(&mut self, config: TimerConfig) -> Result<(), TimerError> {
        if self.phase == Phase::Running {
            return Err(TimerError::Busy);
        }
        config.validate()?;
        self.config = config;
        self.remaining_seconds = self.total_seconds();
        Ok(())
    }

    /// Replace the custom countdown length while stopped
    pub fn set_custom_minutes(&mut self, minutes: u32) -> Result<(), TimerError> {
        if self.phase == Phase::Running {
            return Err(TimerError::Busy);
        }
        self.custom_minutes = positive("custom_minutes", minutes)?;
        if self.mode == TimerMode::Custom {
            self.remaining_seconds = self.total_seconds();
        }
        Ok(())
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            session: self.session,
            phase: self.phase,
            running: self.is_running(),
            remaining_seconds: self.remaining_seconds,
            total_seconds: self.total_seconds(),
            progress: self.progress(),
            clock: format_clock(self.remaining_seconds),
            completed_sessions: self.completed_sessions,
            selected_task: self.selected_task.clone(),
            config: self.config,
            custom_minutes: self.custom_minutes,
        }
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new(TimerConfig::default(), DEFAULT_CUSTOM_MINUTES)
    }
}

/// Read-only view of the timer, including derived values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: TimerMode,
    pub session: SessionKind,
    pub phase: Phase,
    pub running: bool,
    pub remaining_seconds: u64,
    pub total_seconds: u64,
    pub progress: f64,
    pub clock: String,
    pub completed_sessions: u32,
    pub selected_task: Option<SelectedTask>,
    pub config: TimerConfig,
    pub custom_minutes: u32,
}
