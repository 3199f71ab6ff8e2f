//! Main application state management

use std::{sync::Mutex, time::Instant};

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{
    notice::push_bounded, Completion, Notice, SelectedTask, StartOutcome, StateError,
    TimerConfig, TimerError, TimerMode, TimerSnapshot, TimerState,
};
use crate::services::{Collaborators, Task};

/// Owns the single focus timer and everything the API reports about it
pub struct AppState {
    /// The focus timer; held only for the span of one transition
    pub timer: Mutex<TimerState>,
    /// Tasks offered by the last selection prompt
    pub pending_tasks: Mutex<Vec<Task>>,
    /// Display title of the selected task's goal, if any
    pub goal_title: Mutex<Option<String>>,
    /// Passive failure indicators
    pub notices: Mutex<Vec<Notice>>,
    /// Backend task provider, activity logger and goal lookup
    pub collaborators: Collaborators,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    /// Last action tracking
    pub last_action: Mutex<Option<String>>,
    pub last_action_time: Mutex<Option<DateTime<Utc>>>,
    /// Whether the timer is ticking; the driver task waits on this
    running_tx: watch::Sender<bool>,
    /// Latest timer snapshot for watchers
    timer_update_tx: watch::Sender<TimerSnapshot>,
}

impl AppState {
    /// Create a new AppState around an idle timer
    pub fn new(port: u16, host: String, timer: TimerState, collaborators: Collaborators) -> Self {
        let (running_tx, _) = watch::channel(timer.is_running());
        let (timer_update_tx, _) = watch::channel(timer.snapshot());

        Self {
            timer: Mutex::new(timer),
            pending_tasks: Mutex::new(Vec::new()),
            goal_title: Mutex::new(None),
            notices: Mutex::new(Vec::new()),
            collaborators,
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(None),
            last_action_time: Mutex::new(None),
            running_tx,
            timer_update_tx,
        }
    }

    /// Apply a transition to the timer and publish the new snapshot
    fn mutate<T, F>(&self, transition: F) -> Result<T, StateError>
    where
        F: FnOnce(&mut TimerState) -> Result<T, TimerError>,
    {
        let mut timer = self.timer.lock().map_err(|_| StateError::Poisoned("timer"))?;
        let result = transition(&mut *timer)?;
        let snapshot = timer.snapshot();

        // Publish under the lock so watchers see transitions in apply order
        let running = snapshot.running;
        self.running_tx.send_if_modified(|current| {
            let changed = *current != running;
            *current = running;
            changed
        });
        self.timer_update_tx.send_replace(snapshot);
        drop(timer);

        Ok(result)
    }

    /// Apply a user-initiated transition and record it as the last action
    fn act<T, F>(&self, action: &str, transition: F) -> Result<T, StateError>
    where
        F: FnOnce(&mut TimerState) -> Result<T, TimerError>,
    {
        let result = self.mutate(transition)?;

        if let Ok(mut last_action) = self.last_action.lock() {
            *last_action = Some(action.to_string());
        }
        if let Ok(mut last_time) = self.last_action_time.lock() {
            *last_time = Some(Utc::now());
        }

        Ok(result)
    }

    /// Current timer snapshot
    pub fn snapshot(&self) -> Result<TimerSnapshot, StateError> {
        self.timer
            .lock()
            .map(|timer| timer.snapshot())
            .map_err(|_| StateError::Poisoned("timer"))
    }

    /// Whether a start request may need to offer a task choice
    pub fn needs_task_prompt(&self) -> Result<bool, StateError> {
        self.timer
            .lock()
            .map(|timer| timer.needs_task_prompt())
            .map_err(|_| StateError::Poisoned("timer"))
    }

    /// Start the timer, offering `tasks` if a prompt is needed
    pub fn start(&self, tasks: Vec<Task>) -> Result<StartOutcome, StateError> {
        let outcome = self.act("start", |timer| timer.start(tasks.len()))?;

        if outcome == StartOutcome::AwaitingTaskSelection {
            info!("Awaiting task selection ({} tasks offered)", tasks.len());
            let mut pending = self
                .pending_tasks
                .lock()
                .map_err(|_| StateError::Poisoned("pending tasks"))?;
            *pending = tasks;
        } else {
            info!("Timer started");
        }

        Ok(outcome)
    }

    /// Confirm a pending start, optionally with one of the offered tasks
    pub fn confirm_start(&self, task_id: Option<i64>) -> Result<Option<SelectedTask>, StateError> {
        let selected = match task_id {
            Some(id) => {
                let pending = self
                    .pending_tasks
                    .lock()
                    .map_err(|_| StateError::Poisoned("pending tasks"))?;
                let task = pending
                    .iter()
                    .find(|task| task.id == id)
                    .ok_or(TimerError::UnknownTask(id))?;
                Some(task.to_selected())
            }
            None => None,
        };

        let chosen = selected.clone();
        self.act("select", move |timer| timer.confirm_start(chosen))?;
        self.clear_pending_tasks()?;

        match &selected {
            Some(task) => info!("Timer started on task {} ({})", task.id, task.title),
            None => info!("Timer started without a task"),
        }
        Ok(selected)
    }

    /// Dismiss a pending start
    pub fn cancel_selection(&self) -> Result<(), StateError> {
        self.act("cancel-selection", |timer| timer.cancel_selection())?;
        self.clear_pending_tasks()
    }

    pub fn pause(&self) -> Result<(), StateError> {
        self.act("pause", |timer| timer.pause())?;
        info!("Timer paused");
        Ok(())
    }

    pub fn reset(&self) -> Result<(), StateError> {
        self.act("reset", |timer| {
            timer.reset();
            Ok(())
        })?;
        self.clear_selection_display()?;
        info!("Timer reset");
        Ok(())
    }

    pub fn change_mode(&self, mode: TimerMode) -> Result<(), StateError> {
        self.act("mode", |timer| {
            timer.change_mode(mode);
            Ok(())
        })?;
        self.clear_selection_display()?;
        info!("Timer mode changed to {}", mode.as_str());
        Ok(())
    }

    /// Replace the pomodoro durations; rejected edits leave a notice
    pub fn update_config(&self, config: TimerConfig) -> Result<(), StateError> {
        let result = self.act("config", |timer| timer.update_config(config));
        self.note_invalid_config(&result)?;
        result?;
        info!("Timer config updated: {:?}", config);
        Ok(())
    }

    /// Replace the custom countdown length; rejected edits leave a notice
    pub fn set_custom_minutes(&self, minutes: u32) -> Result<(), StateError> {
        let result = self.act("custom", |timer| timer.set_custom_minutes(minutes));
        self.note_invalid_config(&result)?;
        result?;
        info!("Custom duration set to {} minutes", minutes);
        Ok(())
    }

    fn note_invalid_config(&self, result: &Result<(), StateError>) -> Result<(), StateError> {
        if let Err(StateError::Timer(err @ TimerError::InvalidConfig { .. })) = result {
            self.add_notice(Notice::invalid_config(err.to_string()))?;
        }
        Ok(())
    }

    /// Advance the running timer by one second
    pub fn tick(&self, now: DateTime<Utc>) -> Result<Option<Completion>, StateError> {
        self.mutate(|timer| Ok(timer.tick(now)))
    }

    fn clear_pending_tasks(&self) -> Result<(), StateError> {
        self.pending_tasks
            .lock()
            .map(|mut pending| pending.clear())
            .map_err(|_| StateError::Poisoned("pending tasks"))
    }

    fn clear_selection_display(&self) -> Result<(), StateError> {
        self.clear_pending_tasks()?;
        self.set_goal_title(None)
    }

    /// Tasks offered by the current selection prompt
    pub fn pending_tasks(&self) -> Result<Vec<Task>, StateError> {
        self.pending_tasks
            .lock()
            .map(|pending| pending.clone())
            .map_err(|_| StateError::Poisoned("pending tasks"))
    }

    pub fn goal_title(&self) -> Result<Option<String>, StateError> {
        self.goal_title
            .lock()
            .map(|title| title.clone())
            .map_err(|_| StateError::Poisoned("goal title"))
    }

    pub fn set_goal_title(&self, title: Option<String>) -> Result<(), StateError> {
        let mut current = self
            .goal_title
            .lock()
            .map_err(|_| StateError::Poisoned("goal title"))?;
        *current = title;
        Ok(())
    }

    /// Set the goal title only if `task_id` is still the selected task.
    ///
    /// The title is fetched after the selection commits, so a reset or mode
    /// change may have dropped the task in the meantime.
    pub fn set_goal_title_for(&self, task_id: i64, title: Option<String>) -> Result<bool, StateError> {
        let timer = self.timer.lock().map_err(|_| StateError::Poisoned("timer"))?;
        if timer.selected_task().map(|task| task.id) != Some(task_id) {
            debug!("Task {} no longer selected, dropping goal title", task_id);
            return Ok(false);
        }
        let mut current = self
            .goal_title
            .lock()
            .map_err(|_| StateError::Poisoned("goal title"))?;
        *current = title;
        Ok(true)
    }

    /// Record a passive failure notice
    pub fn add_notice(&self, notice: Notice) -> Result<(), StateError> {
        let mut notices = self.notices.lock().map_err(|_| StateError::Poisoned("notices"))?;
        warn!("Adding notice: {:?}: {}", notice.kind, notice.message);
        push_bounded(&mut notices, notice);
        Ok(())
    }

    pub fn notices(&self) -> Result<Vec<Notice>, StateError> {
        self.notices
            .lock()
            .map(|notices| notices.clone())
            .map_err(|_| StateError::Poisoned("notices"))
    }

    /// Dismiss all notices, returning how many were cleared
    pub fn clear_notices(&self) -> Result<usize, StateError> {
        let mut notices = self.notices.lock().map_err(|_| StateError::Poisoned("notices"))?;
        let cleared = notices.len();
        notices.clear();
        debug!("Cleared {} notices", cleared);
        Ok(cleared)
    }

    /// Receiver for running/stopped changes
    pub fn subscribe_running(&self) -> watch::Receiver<bool> {
        self.running_tx.subscribe()
    }

    /// Most recently published snapshot, read without taking the timer lock
    pub fn latest_snapshot(&self) -> TimerSnapshot {
        self.timer_update_tx.borrow().clone()
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        let duration = self.start_time.elapsed();
        let hours = duration.as_secs() / 3600;
        let minutes = (duration.as_secs() % 3600) / 60;
        let seconds = duration.as_secs() % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}s", seconds)
        }
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last_action = self.last_action.lock().ok().and_then(|a| a.clone());
        let last_action_time = self.last_action_time.lock().ok().and_then(|t| *t);
        (last_action, last_action_time)
    }
}
