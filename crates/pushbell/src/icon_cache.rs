//! Local copies of notification icons.
//!
//! Notification servers only accept icon names or local files, while pushes
//! carry inline `data:` URIs (mirrors) or remote image URLs. Both are
//! normalized to PNG files under the cache directory, keyed by a hash of
//! the original reference.

use crate::{AppError, AppResult};

use std::{
    fs,
    panic::Location,
    path::{Path, PathBuf},
    time::Duration,
};

use base64::Engine;
use error_location::ErrorLocation;
use image::ImageFormat;
use sha2::{Digest, Sha256};
use tracing::{debug, instrument};

const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(10);

/// Icon references that must be materialized before display.
pub fn is_cacheable(icon: &str) -> bool {
    icon.starts_with("data:") || icon.starts_with("http://") || icon.starts_with("https://")
}

/// Raw bytes of a base64 `data:` URI.
#[track_caller]
pub fn decode_data_uri(uri: &str) -> AppResult<Vec<u8>> {
    let location = ErrorLocation::from(Location::caller());

    let (header, payload) = uri
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
        .ok_or_else(|| AppError::IconError {
            reason: "Malformed data URI".to_string(),
            location,
        })?;

    if !header.ends_with(";base64") {
        return Err(AppError::IconError {
            reason: format!("Unsupported data URI encoding: {}", header),
            location,
        });
    }

    base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| AppError::IconError {
            reason: format!("Invalid base64 icon: {}", e),
            location,
        })
}

/// Directory of PNG icons derived from push icon references.
pub struct IconCache {
    dir: PathBuf,
    http: reqwest::Client,
}

impl IconCache {
    /// Cache icons under `dir`, created on first store.
    pub fn new(dir: PathBuf) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(DOWNLOAD_TIMEOUT)
            .build()?;

        Ok(Self { dir, http })
    }

    /// Path of the cached PNG for `icon`, fetching and converting it if
    /// not present yet.
    #[instrument(skip(self, icon))]
    pub async fn resolve(&self, icon: &str) -> AppResult<PathBuf> {
        let path = self.path_for(icon);
        if path.is_file() {
            return Ok(path);
        }

        let bytes = if icon.starts_with("data:") {
            decode_data_uri(icon)?
        } else {
            self.download(icon).await?
        };

        let target = path.clone();
        tokio::task::spawn_blocking(move || store_png(&bytes, &target))
            .await
            .map_err(|e| AppError::IconError {
                reason: format!("Icon conversion task failed: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })??;

        debug!(path = ?path, "Icon cached");

        Ok(path)
    }

    fn path_for(&self, icon: &str) -> PathBuf {
        let mut hasher = Sha256::new();
        hasher.update(icon.as_bytes());
        let key = hex::encode(&hasher.finalize()[..16]);
        self.dir.join(format!("{}.png", key))
    }

    async fn download(&self, url: &str) -> AppResult<Vec<u8>> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes.to_vec())
    }
}

/// Decode any supported image format and write it as PNG.
///
/// Written to a temporary file first so a concurrent reader never sees a
/// partial icon.
#[track_caller]
fn store_png(bytes: &[u8], path: &Path) -> AppResult<()> {
    let image = image::load_from_memory(bytes).map_err(|e| AppError::IconError {
        reason: format!("Failed to decode icon: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;

    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir)?;
    }

    let temp_path = path.with_extension("png.tmp");
    image
        .save_with_format(&temp_path, ImageFormat::Png)
        .map_err(|e| AppError::IconError {
            reason: format!("Failed to write icon: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;
    fs::rename(&temp_path, path)?;

    Ok(())
}
