use std::sync::Arc;
use std::time::Duration;

use writely::config::EditorConfig;
use writely::formats::{DraftSnapshot, SeoDataPatch};
use writely::store::{DraftStorage, EditorRuntime, EditorStore, FileDraftStorage, Persistence};

fn file_store(dir: &std::path::Path) -> (EditorStore, Arc<FileDraftStorage>) {
    let storage = Arc::new(FileDraftStorage::new(dir));
    let store = EditorStore::open(Persistence::new(storage.clone(), "writely-editor-state"));
    (store, storage)
}

#[test]
fn every_mutation_is_written_through_to_disk() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let (store, storage) = file_store(temp.path());

    store.set_content("first");
    store.set_seo_data(SeoDataPatch {
        title: Some("A title".to_owned()),
        og_image: Some(Some("/og.png".to_owned())),
        ..SeoDataPatch::default()
    });

    let raw = storage
        .get_item("writely-editor-state")?
        .expect("draft written");
    let snapshot: DraftSnapshot = serde_json::from_str(&raw)?;
    assert_eq!(snapshot.content, "first");
    assert_eq!(snapshot.seo_data.title, "A title");
    assert_eq!(snapshot.seo_data.og_image.as_deref(), Some("/og.png"));
    assert!(snapshot.last_auto_save.is_some());

    let value: serde_json::Value = serde_json::from_str(&raw)?;
    assert_eq!(value["seoData"]["ogImage"], "/og.png");
    Ok(())
}

#[test]
fn reopening_restores_a_clean_draft() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    {
        let (store, _) = file_store(temp.path());
        store.set_content("survives restarts");
        assert!(store.is_dirty());
    }

    let (store, _) = file_store(temp.path());
    let state = store.snapshot();
    assert_eq!(state.content, "survives restarts");
    assert!(!state.is_dirty);
    assert!(state.last_saved.is_none());
    Ok(())
}

#[test]
fn corrupt_storage_starts_empty() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    std::fs::write(temp.path().join("writely-editor-state.json"), "{{{")?;

    let (store, _) = file_store(temp.path());
    assert_eq!(store.snapshot().content, "");

    store.set_content("recovered");
    let (reopened, _) = file_store(temp.path());
    assert_eq!(reopened.snapshot().content, "recovered");
    Ok(())
}

#[test]
fn clear_removes_the_draft() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let (store, storage) = file_store(temp.path());
    store.set_content("to be cleared");

    store.persistence().clear()?;
    assert_eq!(storage.get_item("writely-editor-state")?, None);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn runtime_autosaves_after_the_configured_interval() -> anyhow::Result<()> {
    let temp = tempfile::TempDir::new()?;
    let config = EditorConfig {
        autosave_interval: Duration::from_secs(30),
        data_dir: Some(temp.path().to_path_buf()),
        ..EditorConfig::default()
    };
    let storage: Arc<dyn DraftStorage> = Arc::new(FileDraftStorage::new(temp.path()));
    let runtime = EditorRuntime::start(config, Some(storage));

    runtime.store().set_content("autosaved");
    let before = runtime.store().snapshot().last_auto_save;

    tokio::time::sleep(Duration::from_secs(31)).await;
    let state = runtime.store().snapshot();
    assert!(!state.is_dirty);
    assert!(state.last_auto_save >= before);

    runtime.shutdown().await;
    Ok(())
}
