use std::sync::Arc;

use super::{AutosaveTask, DraftStorage, EditorStore, Persistence};
use crate::config::EditorConfig;

/// Owns an [`EditorStore`] together with its autosave task.
///
/// Create one at application start and call [`EditorRuntime::shutdown`]
/// before exiting. The autosave task only runs while autosave is enabled
/// and a storage capability was supplied.
pub struct EditorRuntime {
    store: EditorStore,
    config: EditorConfig,
    autosave: Option<AutosaveTask>,
}

impl EditorRuntime {
    /// Must be called from within a tokio runtime.
    pub fn start(config: EditorConfig, storage: Option<Arc<dyn DraftStorage>>) -> Self {
        let persistence = match storage {
            Some(storage) => Persistence::new(storage, config.storage_key.clone()),
            None => {
                tracing::info!("no durable storage available; draft stays in memory");
                Persistence::disabled()
            }
        };
        let store = EditorStore::open_with(persistence, config.enable_autosave);

        let mut runtime = Self {
            store,
            config,
            autosave: None,
        };
        runtime.sync_autosave_task();
        runtime
    }

    pub fn store(&self) -> &EditorStore {
        &self.store
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn autosave_running(&self) -> bool {
        self.autosave.is_some()
    }

    pub async fn set_enable_autosave(&mut self, enable: bool) {
        self.store.set_enable_autosave(enable);
        if !enable {
            if let Some(task) = self.autosave.take() {
                task.cancel().await;
            }
        }
        self.sync_autosave_task();
    }

    pub async fn shutdown(mut self) {
        if let Some(task) = self.autosave.take() {
            task.cancel().await;
        }
        tracing::debug!("editor runtime stopped");
    }

    fn sync_autosave_task(&mut self) {
        let wanted = self.store.snapshot().enable_autosave && self.store.persistence().is_enabled();
        if wanted && self.autosave.is_none() {
            self.autosave = Some(AutosaveTask::spawn(
                self.store.clone(),
                self.config.autosave_interval,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::store::MemoryDraftStorage;
    use crate::store::persist::DEFAULT_STORAGE_KEY;

    fn storage() -> Option<Arc<dyn DraftStorage>> {
        Some(Arc::new(MemoryDraftStorage::new()))
    }

    #[tokio::test(start_paused = true)]
    async fn autosave_runs_only_with_storage() {
        let runtime = EditorRuntime::start(EditorConfig::default(), None);
        assert!(!runtime.autosave_running());
        runtime.shutdown().await;

        let runtime = EditorRuntime::start(EditorConfig::default(), storage());
        assert!(runtime.autosave_running());
        runtime.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn startup_keeps_restored_autosave_time() -> anyhow::Result<()> {
        let stored = r#"{"content":"draft","seoData":{"title":"","description":"","keywords":[]},"lastAutoSave":"2020-01-01T00:00:00Z"}"#;
        let memory = MemoryDraftStorage::new();
        memory.set_item(DEFAULT_STORAGE_KEY, stored)?;

        let config = EditorConfig {
            enable_autosave: false,
            ..EditorConfig::default()
        };
        let runtime = EditorRuntime::start(config, Some(Arc::new(memory.clone())));

        let state = runtime.store().snapshot();
        assert_eq!(state.content, "draft");
        assert!(!state.enable_autosave);
        assert!(!state.is_dirty);
        assert_eq!(
            state.last_auto_save.map(|t| t.to_rfc3339()).as_deref(),
            Some("2020-01-01T00:00:00+00:00")
        );
        assert_eq!(memory.get_item(DEFAULT_STORAGE_KEY)?.as_deref(), Some(stored));

        runtime.shutdown().await;
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn toggling_autosave_starts_and_stops_the_task() {
        let config = EditorConfig {
            enable_autosave: false,
            autosave_interval: Duration::from_secs(10),
            ..EditorConfig::default()
        };
        let mut runtime = EditorRuntime::start(config, storage());
        assert!(!runtime.autosave_running());

        runtime.store().set_content("draft");
        runtime.set_enable_autosave(true).await;
        assert!(runtime.autosave_running());

        tokio::time::sleep(Duration::from_secs(11)).await;
        assert!(!runtime.store().is_dirty());

        runtime.set_enable_autosave(false).await;
        assert!(!runtime.autosave_running());
        runtime.store().set_content("more");
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(runtime.store().is_dirty());

        runtime.shutdown().await;
    }
}
