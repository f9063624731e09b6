use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::config::Configuration;
use crate::dtos::form::UploadFilePayload;

const DEFAULT_MEDIA_ROOT: &str = "./media";
const DEFAULT_MEDIA_URL: &str = "/media/";

/// Stores uploads under the media root as `<prefix>/<uuid><ext>` and maps the
/// stored relative paths to public URLs. The extension follows the sniffed
/// image format, falling back to the client's file name.
#[derive(Clone, Debug)]
pub struct MediaStorage {
    root: PathBuf,
    base_url: String,
}

impl MediaStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: &str) -> Self {
        let mut base_url = base_url.to_string();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            root: root.into(),
            base_url,
        }
    }

    pub fn from_config(config: &Configuration) -> Self {
        Self::new(
            config.get_or("media.root", DEFAULT_MEDIA_ROOT),
            config.get_or("media.url", DEFAULT_MEDIA_URL),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn save(&self, prefix: &str, file: &UploadFilePayload) -> Result<String> {
        let relative = Self::generated_name(prefix, file);
        let absolute = self.absolute_path(&relative);
        if let Some(parent) = absolute.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        fs::write(&absolute, &file.bytes)
            .await
            .with_context(|| format!("failed to write {}", absolute.display()))?;

        log::debug!("Stored upload {} ({} bytes)", relative, file.bytes.len());
        Ok(relative)
    }

    /// Removes a stored upload whose record never made it to the database.
    pub async fn discard(&self, relative: &str) {
        let absolute = self.absolute_path(relative);
        match fs::remove_file(&absolute).await {
            Ok(()) => log::debug!("Discarded upload {}", relative),
            Err(e) => log::warn!("Failed to discard {}: {}", absolute.display(), e),
        }
    }

    pub fn absolute_path(&self, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|segment| !segment.is_empty() && *segment != "..")
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    pub fn url(&self, relative: &str) -> String {
        format!("{}{}", self.base_url, relative.trim_start_matches('/'))
    }

    fn generated_name(prefix: &str, file: &UploadFilePayload) -> String {
        let sniffed = image::guess_format(&file.bytes)
            .ok()
            .and_then(|format| format.extensions_str().first().copied())
            .map(str::to_string);
        let extension = sniffed
            .or_else(|| {
                Path::new(&file.file_name)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .filter(|ext| ext.chars().all(|c| c.is_ascii_alphanumeric()))
                    .map(str::to_ascii_lowercase)
            })
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();
        format!("{}/{}{}", prefix.trim_matches('/'), Uuid::new_v4(), extension)
    }
}
