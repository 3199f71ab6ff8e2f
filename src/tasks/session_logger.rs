//! Fire-and-forget dispatch of completed session logs

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::state::{AppState, Notice, SessionLog};

/// Send `log` to the activity logger in the background.
///
/// The timer has already moved on by the time this runs. A failure is
/// recorded as a notice and never retried.
pub fn dispatch_session_log(state: Arc<AppState>, log: SessionLog) -> JoinHandle<()> {
    tokio::spawn(async move {
        let minutes = log.duration_minutes;
        let title = log.title.clone();

        match state.collaborators.activity.log_session(log).await {
            Ok(()) => info!("Logged {} minute session: {}", minutes, title),
            Err(e) => {
                warn!("Failed to log {} minute session: {}", minutes, e);
                let notice = Notice::log_failure(format!(
                    "Could not record \"{}\" ({} min): {}",
                    title, minutes, e
                ));
                if let Err(e) = state.add_notice(notice) {
                    error!("Failed to add log failure notice: {}", e);
                }
            }
        }
    })
}
