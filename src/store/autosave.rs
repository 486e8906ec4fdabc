use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::EditorStore;

pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(30);

/// Periodic autosave flush running on the tokio runtime.
///
/// Dropping the handle without calling [`AutosaveTask::cancel`] also stops
/// the loop, but only `cancel` waits for it to exit.
#[derive(Debug)]
pub struct AutosaveTask {
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<()>,
}

impl AutosaveTask {
    /// Must be called from within a tokio runtime. The first tick fires one
    /// full `period` after spawning.
    pub fn spawn(store: EditorStore, period: Duration) -> Self {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let period = period.max(Duration::from_millis(1));

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!(period_ms = period.as_millis() as u64, "autosave task started");

            loop {
                tokio::select! {
                    biased;
                    _ = &mut shutdown_rx => break,
                    _ = ticker.tick() => {
                        store.autosave_tick();
                    }
                }
            }

            tracing::debug!("autosave task stopped");
        });

        Self {
            shutdown: Some(shutdown_tx),
            handle,
        }
    }

    /// Stops the loop and waits for it to exit. No tick runs after this
    /// returns.
    pub async fn cancel(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Err(err) = (&mut self.handle).await {
            tracing::warn!(?err, "autosave task ended abnormally");
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn dirty_state_is_flushed_after_one_interval() {
        let store = EditorStore::in_memory();
        store.set_content("draft");
        let task = AutosaveTask::spawn(store.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(29)).await;
        assert!(store.is_dirty());

        tokio::time::sleep(Duration::from_secs(2)).await;
        let state = store.snapshot();
        assert!(!state.is_dirty);
        assert!(state.last_auto_save.is_some());

        task.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_autosave_leaves_state_dirty() {
        let store = EditorStore::in_memory();
        store.set_content("draft");
        store.set_enable_autosave(false);
        let task = AutosaveTask::spawn(store.clone(), Duration::from_secs(30));

        tokio::time::sleep(Duration::from_secs(300)).await;
        assert!(store.is_dirty());

        task.cancel().await;
    }

    #[tokio::test(start_paused = true)]
    async fn no_tick_fires_after_cancel() {
        let store = EditorStore::in_memory();
        let task = AutosaveTask::spawn(store.clone(), Duration::from_secs(30));
        task.cancel().await;

        store.set_content("late edit");
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(store.is_dirty());
    }
}
