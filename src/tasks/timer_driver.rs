//! Timer driver background task

use std::{sync::Arc, time::Duration};

use chrono::Utc;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info};

use super::session_logger::dispatch_session_log;
use crate::state::AppState;

const TICK: Duration = Duration::from_secs(1);

/// Background task that ticks the focus timer once per second while it runs.
///
/// Ticking stops as soon as the timer leaves the running phase, whether by
/// pause, reset, mode change or completion.
pub async fn timer_driver_task(state: Arc<AppState>) {
    info!("Starting timer driver task");

    let mut running_rx = state.subscribe_running();

    loop {
        // Wait until the timer is started
        if running_rx.wait_for(|running| *running).await.is_err() {
            debug!("Running channel closed, stopping timer driver");
            return;
        }
        debug!("Timer running, ticking every {:?}", TICK);

        let mut interval = interval_at(Instant::now() + TICK, TICK);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match state.tick(Utc::now()) {
                        Ok(Some(completion)) => {
                            info!("{:?} session complete", completion.finished);
                            if let Some(log) = completion.log {
                                dispatch_session_log(Arc::clone(&state), log);
                            }
                        }
                        Ok(None) => {}
                        Err(e) => error!("Failed to tick timer: {}", e),
                    }
                }

                changed = running_rx.changed() => {
                    if changed.is_err() {
                        debug!("Running channel closed, stopping timer driver");
                        return;
                    }
                    if !*running_rx.borrow_and_update() {
                        debug!("Timer stopped, cancelling ticks");
                        break;
                    }
                }
            }
        }
    }
}
