use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use base64::Engine as _;
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use url::Url;

/// A user-selected image, already read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ImageFile {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !self.mime_type.starts_with("image/") {
            anyhow::bail!(
                "{} is not an image (mime type {})",
                self.file_name,
                self.mime_type
            );
        }
        if self.bytes.is_empty() {
            anyhow::bail!("{} is empty", self.file_name);
        }
        Ok(())
    }
}

/// Turns an image into a URL the document can reference.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    async fn upload(&self, file: &ImageFile) -> anyhow::Result<String>;
}

/// Embeds the image itself as a `data:` URI.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineImageUploader;

#[async_trait]
impl ImageUploader for InlineImageUploader {
    async fn upload(&self, file: &ImageFile) -> anyhow::Result<String> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&file.bytes);
        Ok(format!("data:{};base64,{encoded}", file.mime_type))
    }
}

/// POSTs the raw bytes to an upload endpoint that answers with
/// `{"url": "..."}`.
#[derive(Debug, Clone)]
pub struct HttpImageUploader {
    client: reqwest::Client,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    url: String,
}

impl HttpImageUploader {
    pub fn new(endpoint: Url) -> anyhow::Result<Self> {
        if endpoint.scheme() != "http" && endpoint.scheme() != "https" {
            anyhow::bail!("upload endpoint must be http/https: {endpoint}");
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("build upload http client")?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ImageUploader for HttpImageUploader {
    async fn upload(&self, file: &ImageFile) -> anyhow::Result<String> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, &file.mime_type)
            .header("X-File-Name", &file.file_name)
            .body(file.bytes.clone())
            .send()
            .await
            .with_context(|| format!("send upload request: {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("upload failed ({status})");
        }

        let body: UploadResponse = response.json().await.context("parse upload response")?;
        let url = self
            .endpoint
            .join(body.url.trim())
            .with_context(|| format!("resolve uploaded url: {}", body.url))?;
        Ok(url.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEmbed {
    pub url: String,
    pub alt: String,
    pub caption: Option<String>,
}

impl ImageEmbed {
    pub fn to_markdown(&self) -> String {
        let alt = self.alt.replace(['[', ']'], "");
        match &self.caption {
            Some(caption) => format!("![{alt}]({} \"{}\")", self.url, caption.replace('"', "'")),
            None => format!("![{alt}]({})", self.url),
        }
    }
}

/// Validates and uploads `file`, returning an embed only when every step
/// succeeded.
pub async fn attach_image(
    uploader: &dyn ImageUploader,
    file: &ImageFile,
    alt: &str,
    caption: Option<&str>,
) -> anyhow::Result<ImageEmbed> {
    let alt = alt.trim();
    if alt.is_empty() {
        anyhow::bail!("alt text is required");
    }
    file.validate()?;

    let url = uploader
        .upload(file)
        .await
        .with_context(|| format!("upload image: {}", file.file_name))?;
    tracing::info!(file = %file.file_name, bytes = file.bytes.len(), "image attached");

    Ok(ImageEmbed {
        url,
        alt: alt.to_owned(),
        caption: caption
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_owned),
    })
}
