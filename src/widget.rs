//! Boundary to the rich-text editing widget.
//!
//! The widget owns its document tree and undo stack. The editor only sees
//! serialized content and the undo/redo capability flags.

use crate::store::{EditorStore, HistoryState};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentUpdate {
    pub content: String,
    pub history: HistoryState,
}

pub type ContentListener = Box<dyn FnMut(ContentUpdate) + Send>;

pub trait RichTextWidget {
    fn serialized_content(&self) -> String;
    fn load_content(&mut self, content: &str);
    /// Returns whether anything was undone.
    fn undo(&mut self) -> bool;
    fn redo(&mut self) -> bool;
    fn can_undo(&self) -> bool;
    fn can_redo(&self) -> bool;
    /// Registers the callback fired after every user edit. Loading content
    /// does not fire it.
    fn on_content_changed(&mut self, listener: ContentListener);
}

/// Keeps an [`EditorStore`] in sync with a widget.
pub struct WidgetBinding<W> {
    store: EditorStore,
    widget: W,
}

impl<W: RichTextWidget> WidgetBinding<W> {
    /// Loads the store's content into the widget, then forwards every edit
    /// to the store.
    pub fn attach(store: EditorStore, mut widget: W) -> Self {
        widget.load_content(&store.content());

        let edits = store.clone();
        widget.on_content_changed(Box::new(move |update| {
            edits.set_content(update.content);
            edits.set_history_state(update.history);
        }));

        let binding = Self { store, widget };
        binding.refresh_history();
        binding
    }

    pub fn undo(&mut self) -> bool {
        let changed = self.widget.undo();
        self.sync_after_history_step();
        changed
    }

    pub fn redo(&mut self) -> bool {
        let changed = self.widget.redo();
        self.sync_after_history_step();
        changed
    }

    pub fn store(&self) -> &EditorStore {
        &self.store
    }

    pub fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    // Widgets differ on whether undo fires the change callback.
    fn sync_after_history_step(&self) {
        let content = self.widget.serialized_content();
        if content != self.store.content() {
            self.store.set_content(content);
        }
        self.refresh_history();
    }

    fn refresh_history(&self) {
        self.store.set_history_state(HistoryState {
            can_undo: self.widget.can_undo(),
            can_redo: self.widget.can_redo(),
        });
    }
}
