//! Passive, non-fatal failure notices shown to the user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Most recent notices kept; older ones are dropped
pub const MAX_NOTICES: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// A completed session could not be recorded
    LogFailure,
    /// The task list could not be fetched; start proceeded without a prompt
    ProviderUnavailable,
    /// A settings edit was rejected and the previous value kept
    InvalidConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            at: Utc::now(),
        }
    }

    pub fn log_failure(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::LogFailure, message)
    }

    pub fn provider_unavailable(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::ProviderUnavailable, message)
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::InvalidConfig, message)
    }
}

/// Append a notice, trimming the list to [`MAX_NOTICES`]
pub fn push_bounded(notices: &mut Vec<Notice>, notice: Notice) {
    notices.push(notice);
    if notices.len() > MAX_NOTICES {
        let excess = notices.len() - MAX_NOTICES;
        notices.drain(..excess);
    }
}
