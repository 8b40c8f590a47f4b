//! External image upload collaborator.

use std::path::Path;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;

use crate::config::UploadConfig;
use crate::error::{AppError, Result};

/// File chosen by the user, read into memory.
#[derive(Debug, Clone)]
pub struct PickedFile {
    pub name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

impl PickedFile {
    /// Read a file from disk.
    pub async fn read(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self {
            mime: mime_for(&name),
            name,
            bytes,
        })
    }
}

/// Guess an image MIME type from the file extension.
pub fn mime_for(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Image extensions offered in the file picker.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp", "svg"];

/// Upload service consumed by the team panel and the biography editor.
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Store the file and return an opaque reference.
    async fn upload(&self, file: PickedFile) -> Result<String>;

    /// Turn a stored reference into a displayable URL.
    fn resolve_url(&self, reference: &str) -> String;
}

/// Upload service reply. Either field may carry the reference.
#[derive(Debug, Deserialize)]
struct UploadReply {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Multipart HTTP uploader.
pub struct HttpUploader {
    client: Client,
    endpoint: String,
    public_base_url: String,
}

impl HttpUploader {
    /// `client` should be the API client's so session cookies are sent.
    pub fn new(client: Client, config: &UploadConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        }
    }

    async fn send(&self, file: PickedFile) -> Result<String> {
        if self.endpoint.is_empty() {
            return Err(AppError::upload("no upload endpoint configured"));
        }

        let size = file.bytes.len();
        let part = Part::bytes(file.bytes)
            .file_name(file.name.clone())
            .mime_str(file.mime)?;
        let form = Form::new().part("file", part);

        tracing::info!("Uploading {} ({} bytes)", file.name, size);
        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::upload(format!("upload service returned {status}")));
        }

        let reply: UploadReply = response.json().await?;
        reply
            .key
            .or(reply.url)
            .filter(|r| !r.is_empty())
            .ok_or_else(|| AppError::upload("upload reply had no key or url"))
    }
}

#[async_trait]
impl ImageUploader for HttpUploader {
    async fn upload(&self, file: PickedFile) -> Result<String> {
        // Every failure surfaces as an upload failure, not a form failure.
        self.send(file).await.map_err(|e| match e {
            AppError::Upload(_) => e,
            other => AppError::upload(other.to_string()),
        })
    }

    fn resolve_url(&self, reference: &str) -> String {
        resolve_reference(&self.public_base_url, reference)
    }
}

/// Join a key onto the public base URL; absolute URLs pass through.
pub fn resolve_reference(public_base_url: &str, reference: &str) -> String {
    if reference.starts_with("http://") || reference.starts_with("https://") || public_base_url.is_empty() {
        return reference.to_string();
    }
    format!(
        "{}/{}",
        public_base_url.trim_end_matches('/'),
        reference.trim_start_matches('/')
    )
}
