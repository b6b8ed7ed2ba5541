//! Periodic background autosave.

use crate::store::TranscriptStore;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Default wake-up interval for the autosave task.
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(1);

/// Handle to a running autosave task.
#[derive(Debug)]
pub struct AutosaveHandle {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl AutosaveHandle {
    /// Signal the task to stop and wait for it to finish.
    ///
    /// A tick that is already writing completes before this returns.
    pub async fn stop(self) {
        let _ = self.stop.send(true);
        if let Err(err) = self.task.await {
            warn!("autosave task ended abnormally: {err}");
        }
    }
}

/// Spawn the autosave loop on the current tokio runtime.
///
/// Every `interval` the task checks [`TranscriptStore::needs_autosave`] and
/// calls [`TranscriptStore::autosave`] when it is set. Write failures are
/// logged and retried on the next tick.
pub fn spawn_autosave(store: Arc<TranscriptStore>, interval: Duration) -> AutosaveHandle {
    let (stop, mut stopped) = watch::channel(false);
    info!("starting autosave (interval_ms={})", interval.as_millis());
    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    autosave_tick(&store);
                }
                changed = stopped.changed() => {
                    if changed.is_err() || *stopped.borrow() {
                        break;
                    }
                }
            }
        }
        info!("autosave stopped");
    });
    AutosaveHandle { stop, task }
}

/// Run one autosave check; returns whether a file was written.
fn autosave_tick(store: &TranscriptStore) -> bool {
    if !store.needs_autosave() {
        return false;
    }
    match store.autosave() {
        Ok(wrote) => {
            if wrote {
                debug!("autosave tick wrote transcript (title={})", store.title());
            }
            wrote
        }
        Err(err) => {
            warn!("autosave failed: {err}");
            false
        }
    }
}
