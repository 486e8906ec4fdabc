use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::Context as _;
use chrono::Utc;

use crate::formats::DraftSnapshot;
use crate::store::EditorState;

pub const DEFAULT_STORAGE_KEY: &str = "writely-editor-state";

/// Durable key/value storage for the draft, modeled on a browser's local
/// storage: synchronous and best-effort.
pub trait DraftStorage: Send + Sync {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove_item(&self, key: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDraftStorage {
    items: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryDraftStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DraftStorage for MemoryDraftStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        let mut items = self.items.lock().unwrap_or_else(PoisonError::into_inner);
        items.remove(key);
        Ok(())
    }
}

/// One JSON file per key under `base_dir`.
#[derive(Debug, Clone)]
pub struct FileDraftStorage {
    base_dir: PathBuf,
}

impl FileDraftStorage {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn item_path(&self, key: &str) -> anyhow::Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            anyhow::bail!("storage key must be a plain file name: {key:?}");
        }
        Ok(self.base_dir.join(format!("{key}.json")))
    }
}

impl DraftStorage for FileDraftStorage {
    fn get_item(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.item_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).with_context(|| format!("read draft: {}", path.display())),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> anyhow::Result<()> {
        let path = self.item_path(key)?;
        write_atomic(&path, value.as_bytes())
    }

    fn remove_item(&self, key: &str) -> anyhow::Result<()> {
        let path = self.item_path(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("remove draft: {}", path.display())),
        }
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("path has no parent: {}", path.display()))?;
    std::fs::create_dir_all(parent)
        .with_context(|| format!("create parent dir: {}", parent.display()))?;

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    std::fs::write(&tmp_path, data)
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    std::fs::rename(&tmp_path, path)
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}

/// Write-through persistence of the draft snapshot.
///
/// Without a storage capability every operation is a no-op and the store
/// behaves as a plain in-memory container.
#[derive(Clone)]
pub struct Persistence {
    storage: Option<Arc<dyn DraftStorage>>,
    key: String,
}

impl Persistence {
    pub fn new(storage: Arc<dyn DraftStorage>, key: impl Into<String>) -> Self {
        Self {
            storage: Some(storage),
            key: key.into(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            storage: None,
            key: DEFAULT_STORAGE_KEY.to_owned(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.storage.is_some()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Reads the stored draft. A missing key or unreadable payload yields
    /// `None`.
    pub fn load(&self) -> Option<DraftSnapshot> {
        let storage = self.storage.as_ref()?;
        let raw = match storage.get_item(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(key = %self.key, ?err, "failed to read stored draft; starting empty");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(err) => {
                tracing::warn!(key = %self.key, %err, "stored draft is malformed; starting empty");
                None
            }
        }
    }

    /// Applies a stored draft to a fresh state. A restored draft counts as
    /// clean.
    pub(crate) fn hydrate(&self, state: &mut EditorState) {
        let Some(snapshot) = self.load() else {
            return;
        };
        tracing::info!(
            key = %self.key,
            bytes = snapshot.content.len(),
            "restored draft from storage"
        );
        state.content = snapshot.content;
        state.seo_data = snapshot.seo_data;
        state.last_auto_save = snapshot.last_auto_save;
        state.is_dirty = false;
    }

    /// Runs after every mutation: stores the derived snapshot and stamps the
    /// autosave time on the live state.
    pub(crate) fn write_through(&self, state: &mut EditorState) {
        let Some(storage) = self.storage.as_ref() else {
            return;
        };
        let now = Utc::now();
        let snapshot = DraftSnapshot {
            content: state.content.clone(),
            seo_data: state.seo_data.clone(),
            last_auto_save: Some(now),
        };
        let result = serde_json::to_string(&snapshot)
            .context("serialize draft")
            .and_then(|json| storage.set_item(&self.key, &json));
        if let Err(err) = result {
            tracing::warn!(key = %self.key, ?err, "failed to persist draft");
        }
        state.last_auto_save = Some(now);
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        match self.storage.as_ref() {
            Some(storage) => storage.remove_item(&self.key),
            None => Ok(()),
        }
    }
}
