use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;

use crate::cli::{DraftDirArgs, DraftImportArgs, SaveArgs};
use crate::config::{ENV_DATA_DIR, EditorConfig};
use crate::frontmatter;
use crate::save::FilePostStore;
use crate::store::{EditorStore, FileDraftStorage, Persistence};

fn open_persistence(data_dir: Option<&str>) -> anyhow::Result<Persistence> {
    let config = EditorConfig::from_env().context("load config")?;
    let data_dir = data_dir
        .map(PathBuf::from)
        .or(config.data_dir)
        .with_context(|| format!("no draft directory: pass --data-dir or set {ENV_DATA_DIR}"))?;

    tracing::debug!(data_dir = %data_dir.display(), key = %config.storage_key, "using file draft storage");
    Ok(Persistence::new(
        Arc::new(FileDraftStorage::new(data_dir)),
        config.storage_key,
    ))
}

pub fn show(args: DraftDirArgs) -> anyhow::Result<()> {
    let persistence = open_persistence(args.data_dir.as_deref())?;
    match persistence.load() {
        Some(snapshot) => {
            let json = serde_json::to_string_pretty(&snapshot).context("serialize draft")?;
            println!("{json}");
        }
        None => println!("no draft stored"),
    }
    Ok(())
}

pub fn clear(args: DraftDirArgs) -> anyhow::Result<()> {
    let persistence = open_persistence(args.data_dir.as_deref())?;
    persistence.clear().context("remove stored draft")?;
    tracing::info!(key = %persistence.key(), "draft cleared");
    Ok(())
}

pub fn import(args: DraftImportArgs) -> anyhow::Result<()> {
    let markdown = std::fs::read_to_string(&args.file)
        .with_context(|| format!("read document: {}", args.file))?;
    let parsed = frontmatter::parse_for_import(&markdown)?;

    let store = EditorStore::open(open_persistence(args.data_dir.as_deref())?);
    store.import_document(&parsed);

    let state = store.snapshot();
    tracing::info!(
        file = %args.file,
        title = %state.seo_data.title,
        tags = state.tags.len(),
        "document imported into draft"
    );
    Ok(())
}

pub async fn save(args: SaveArgs) -> anyhow::Result<()> {
    let store = EditorStore::open(open_persistence(args.data_dir.as_deref())?);
    let state = store.snapshot();
    if state.content.trim().is_empty() {
        anyhow::bail!("stored draft is empty; nothing to save");
    }

    let backend = FilePostStore::new(&args.out);
    store
        .save_current_with(&backend)
        .await
        .context("save post")?;

    println!("{}", backend.path_for_title(&state.seo_data.title).display());
    Ok(())
}
