use std::path::{Path, PathBuf};

use anyhow::Context as _;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;

use crate::formats::{FrontMatter, SeoData};
use crate::frontmatter;
use crate::store::EditorState;

/// What an explicit save hands to a backend.
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub content: String,
    pub seo_data: SeoData,
    pub tags: Vec<String>,
    pub saved_at: DateTime<Utc>,
}

impl PostDraft {
    pub fn from_state(state: &EditorState) -> Self {
        Self {
            content: state.content.clone(),
            seo_data: state.seo_data.clone(),
            tags: state.tags.clone(),
            saved_at: Utc::now(),
        }
    }

    pub fn front_matter(&self) -> FrontMatter {
        let seo = &self.seo_data;
        let non_empty = |s: &str| (!s.trim().is_empty()).then(|| s.to_owned());
        FrontMatter {
            title: non_empty(&seo.title),
            description: non_empty(&seo.description),
            keywords: seo.keywords.clone(),
            og_image: seo.og_image.clone(),
            tags: self.tags.clone(),
            saved_at: Some(self.saved_at),
            ..FrontMatter::default()
        }
    }

    pub fn to_markdown(&self) -> anyhow::Result<String> {
        frontmatter::render(&self.front_matter(), &self.content)
    }
}

#[async_trait]
pub trait SaveBackend: Send + Sync {
    async fn save(&self, draft: &PostDraft) -> anyhow::Result<()>;
}

/// Saves posts as `<dir>/<slug>.md` with a YAML front matter header.
#[derive(Debug, Clone)]
pub struct FilePostStore {
    base_dir: PathBuf,
}

impl FilePostStore {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn post_path(&self, draft: &PostDraft) -> PathBuf {
        self.path_for_title(&draft.seo_data.title)
    }

    pub fn path_for_title(&self, title: &str) -> PathBuf {
        self.base_dir.join(format!("{}.md", slugify(title)))
    }
}

#[async_trait]
impl SaveBackend for FilePostStore {
    async fn save(&self, draft: &PostDraft) -> anyhow::Result<()> {
        let path = self.post_path(draft);
        let markdown = draft.to_markdown().context("render post")?;
        write_atomic(&path, markdown.as_bytes())
            .await
            .with_context(|| format!("write post: {}", path.display()))?;
        tracing::info!(path = %path.display(), "saved post");
        Ok(())
    }
}

/// `"Hello, World!"` becomes `hello-world`; titles without ASCII
/// alphanumerics become `untitled`.
pub fn slugify(title: &str) -> String {
    let slug = title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    if slug.is_empty() {
        "untitled".to_owned()
    } else {
        slug
    }
}

async fn write_atomic(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("path has no parent: {}", path.display()))?;
    fs::create_dir_all(parent)
        .await
        .with_context(|| format!("create parent dir: {}", parent.display()))?;

    let tmp_path = path.with_extension(format!("tmp.{}", uuid::Uuid::new_v4().simple()));
    fs::write(&tmp_path, data)
        .await
        .with_context(|| format!("write tmp: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("rename tmp to final: {}", path.display()))?;
    Ok(())
}
