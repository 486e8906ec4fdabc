//! The editor's single source of truth.
//!
//! [`EditorStore`] is a cheap, cloneable handle. Every mutator applies its
//! change, then hands the state to [`Persistence`] for write-through before
//! the lock is released, so storage always reflects mutation N before
//! mutation N+1 begins. Readers only ever get owned snapshots.

pub mod autosave;
pub mod persist;
pub mod runtime;
pub mod tags;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::formats::{SeoData, SeoDataPatch};
use crate::frontmatter::ParsedDocument;
use crate::save::{PostDraft, SaveBackend};

pub use autosave::AutosaveTask;
pub use persist::{DraftStorage, FileDraftStorage, MemoryDraftStorage, Persistence};
pub use runtime::EditorRuntime;

/// Undo/redo availability as last reported by the editing widget.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistoryState {
    pub can_undo: bool,
    pub can_redo: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EditorState {
    pub content: String,
    pub is_dirty: bool,
    pub last_saved: Option<DateTime<Utc>>,
    pub last_auto_save: Option<DateTime<Utc>>,
    pub seo_data: SeoData,
    pub history: HistoryState,
    pub tags: Vec<String>,
    pub recent_tags: Vec<String>,
    pub suggested_tags: Vec<String>,
    pub enable_autosave: bool,
    /// Bumped by every change to user data; lets a finished save tell
    /// whether it still matches the live state.
    pub revision: u64,
}

impl Default for EditorState {
    fn default() -> Self {
        Self {
            content: String::new(),
            is_dirty: false,
            last_saved: None,
            last_auto_save: None,
            seo_data: SeoData::default(),
            history: HistoryState::default(),
            tags: Vec::new(),
            recent_tags: Vec::new(),
            suggested_tags: Vec::new(),
            enable_autosave: true,
            revision: 0,
        }
    }
}

impl EditorState {
    fn touch(&mut self) {
        self.is_dirty = true;
        self.revision += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Nothing to save.
    Clean,
    /// The backend accepted the draft but the state changed while it was in
    /// flight, so the store stays dirty.
    Superseded,
}

#[derive(Clone)]
pub struct EditorStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<EditorState>,
    persistence: Persistence,
}

impl EditorStore {
    /// Creates a store, restoring any draft the persistence layer holds.
    pub fn open(persistence: Persistence) -> Self {
        Self::open_with(persistence, EditorState::default().enable_autosave)
    }

    /// Like [`EditorStore::open`] with an initial autosave switch. Nothing
    /// is written to storage until the first mutation.
    pub fn open_with(persistence: Persistence, enable_autosave: bool) -> Self {
        let mut state = EditorState {
            enable_autosave,
            ..EditorState::default()
        };
        persistence.hydrate(&mut state);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(state),
                persistence,
            }),
        }
    }

    pub fn in_memory() -> Self {
        Self::open(Persistence::disabled())
    }

    pub fn persistence(&self) -> &Persistence {
        &self.inner.persistence
    }

    pub fn snapshot(&self) -> EditorState {
        self.lock().clone()
    }

    pub fn content(&self) -> String {
        self.lock().content.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.lock().is_dirty
    }

    pub fn set_content(&self, content: impl Into<String>) {
        let content = content.into();
        self.update("set_content", |state| {
            state.content = content;
            state.touch();
        });
    }

    pub fn set_seo_data(&self, patch: SeoDataPatch) {
        self.update("set_seo_data", |state| {
            state.seo_data.merge(patch);
            state.touch();
        });
    }

    pub fn mark_as_saved(&self) {
        self.update("mark_as_saved", |state| {
            state.is_dirty = false;
            state.last_saved = Some(Utc::now());
        });
    }

    pub fn reset_state(&self) {
        self.update("reset_state", |state| {
            let enable_autosave = state.enable_autosave;
            let revision = state.revision + 1;
            *state = EditorState {
                enable_autosave,
                revision,
                ..EditorState::default()
            };
        });
    }

    pub fn set_history_state(&self, history: HistoryState) {
        self.update("set_history_state", |state| {
            state.history = history;
        });
    }

    /// Returns whether the tag was new.
    pub fn add_tag(&self, tag: &str) -> bool {
        self.update("add_tag", |state| {
            let inserted = tags::insert_tag(&mut state.tags, &mut state.recent_tags, tag);
            if inserted {
                state.touch();
            }
            inserted
        })
    }

    pub fn remove_tag(&self, tag: &str) {
        self.update("remove_tag", |state| {
            tags::remove_tag(&mut state.tags, tag);
            state.touch();
        });
    }

    pub fn update_suggested_tags(&self, content: &str) {
        self.update("update_suggested_tags", |state| {
            state.suggested_tags = tags::suggest_tags(content, &state.tags);
        });
    }

    pub fn set_enable_autosave(&self, enable: bool) {
        self.update("set_enable_autosave", |state| {
            state.enable_autosave = enable;
        });
    }

    /// Loads an imported markdown document: the body becomes the content,
    /// SEO fields present in the front matter overwrite the current ones and
    /// front matter tags are added.
    pub fn import_document(&self, document: &ParsedDocument) {
        let attributes = &document.attributes;
        self.update("import_document", |state| {
            state.content = document.body.clone();
            state.seo_data.merge(SeoDataPatch {
                title: attributes.title.clone(),
                description: attributes.description.clone(),
                keywords: (!attributes.keywords.is_empty()).then(|| attributes.keywords.clone()),
                og_image: attributes.og_image.clone().map(Some),
            });
            for tag in &attributes.tags {
                tags::insert_tag(&mut state.tags, &mut state.recent_tags, tag);
            }
            state.touch();
        });
    }

    /// Sends the current draft to `backend`. The dirty flag is only cleared
    /// once the backend succeeds and nothing changed in the meantime; on
    /// failure the state is left untouched.
    pub async fn save_with(&self, backend: &dyn SaveBackend) -> anyhow::Result<SaveOutcome> {
        let state = self.snapshot();
        if !state.is_dirty {
            return Ok(SaveOutcome::Clean);
        }
        self.send_to(backend, state).await
    }

    /// Like [`EditorStore::save_with`] but also sends a clean draft. A draft
    /// restored from storage is clean without ever having been saved.
    pub async fn save_current_with(
        &self,
        backend: &dyn SaveBackend,
    ) -> anyhow::Result<SaveOutcome> {
        let state = self.snapshot();
        self.send_to(backend, state).await
    }

    async fn send_to(
        &self,
        backend: &dyn SaveBackend,
        state: EditorState,
    ) -> anyhow::Result<SaveOutcome> {
        let draft = PostDraft::from_state(&state);
        backend.save(&draft).await?;

        let outcome = self.update("save", |live| {
            if live.revision != state.revision {
                return SaveOutcome::Superseded;
            }
            live.is_dirty = false;
            live.last_saved = Some(Utc::now());
            SaveOutcome::Saved
        });
        tracing::info!(?outcome, revision = state.revision, "draft saved");
        Ok(outcome)
    }

    /// One autosave period: a dirty store with autosave enabled is flushed
    /// and marked clean. Returns whether anything was flushed.
    pub(crate) fn autosave_tick(&self) -> bool {
        let mut state = self.lock();
        if !state.enable_autosave || !state.is_dirty {
            return false;
        }
        state.is_dirty = false;
        state.last_auto_save = Some(Utc::now());
        self.inner.persistence.write_through(&mut state);
        tracing::info!(revision = state.revision, "autosaved draft");
        true
    }

    fn update<R>(&self, action: &'static str, apply: impl FnOnce(&mut EditorState) -> R) -> R {
        let mut state = self.lock();
        let out = apply(&mut state);
        self.inner.persistence.write_through(&mut state);
        tracing::debug!(
            action,
            revision = state.revision,
            dirty = state.is_dirty,
            "editor state updated"
        );
        out
    }

    fn lock(&self) -> MutexGuard<'_, EditorState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for EditorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorStore")
            .field("state", &*self.lock())
            .field("persistent", &self.inner.persistence.is_enabled())
            .finish()
    }
}
