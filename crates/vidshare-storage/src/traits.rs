//! Media store abstraction trait
//!
//! Backends implement the fallible `upload`/`destroy` pair. Callers use the
//! provided `store`/`remove` methods, which never raise: failures come back
//! as `None`/`false` and are logged here.

use async_trait::async_trait;
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::path::Path;
use thiserror::Error;

use crate::asset_url::{parse_asset_url, AssetRef};
use crate::temp_file::TempFileGuard;
use crate::MediaBackend;

/// Media store operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Delete failed: {0}")]
    DeleteFailed(String),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid asset URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for media store operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Kind of remote resource, inferred from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Image,
    Video,
}

/// Extensions the remote store files under its video resource type (audio included).
const VIDEO_EXTENSIONS: &[&str] = &[
    "mp4", "mov", "avi", "mkv", "webm", "flv", "wmv", "m4v", "mpeg", "mpg", "3gp", "ogv", "ts",
    "mp3", "wav", "ogg", "aac", "m4a", "flac",
];

impl ResourceKind {
    pub fn from_extension(ext: &str) -> Self {
        let ext = ext.to_ascii_lowercase();
        if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
            ResourceKind::Video
        } else {
            ResourceKind::Image
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Image => "image",
            ResourceKind::Video => "video",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

/// A successfully uploaded asset.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAsset {
    pub url: String,
    pub public_id: String,
    pub kind: ResourceKind,
    /// Playback length in seconds, reported for video resources only
    pub duration: Option<f64>,
}

#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Upload a local file. The caller owns the file's lifetime.
    async fn upload(&self, local_path: &Path) -> StorageResult<StoredAsset>;

    /// Delete an asset. Deleting an asset that no longer exists succeeds.
    async fn destroy(&self, asset: &AssetRef) -> StorageResult<()>;

    fn backend(&self) -> MediaBackend;

    /// Upload a local temporary file and always delete it afterwards.
    ///
    /// Returns `None` when the upload fails for any reason.
    async fn store(&self, local_path: &Path) -> Option<StoredAsset> {
        let _guard = TempFileGuard::new(local_path);

        match self.upload(local_path).await {
            Ok(asset) => {
                tracing::info!(
                    backend = %self.backend(),
                    public_id = %asset.public_id,
                    kind = %asset.kind,
                    "Asset uploaded"
                );
                Some(asset)
            }
            Err(e) => {
                tracing::warn!(
                    backend = %self.backend(),
                    path = %local_path.display(),
                    error = %e,
                    "Asset upload failed"
                );
                None
            }
        }
    }

    /// Delete the asset behind a URL previously returned by `store`.
    async fn try_remove(&self, url: &str) -> StorageResult<()> {
        let asset = parse_asset_url(url).ok_or_else(|| StorageError::InvalidUrl(url.to_string()))?;
        self.destroy(&asset).await
    }

    /// Like `try_remove`, reporting failure as `false`.
    async fn remove(&self, url: &str) -> bool {
        match self.try_remove(url).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    backend = %self.backend(),
                    url = %url,
                    error = %e,
                    "Asset removal failed"
                );
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_kind_from_extension() {
        assert_eq!(ResourceKind::from_extension("MP4"), ResourceKind::Video);
        assert_eq!(ResourceKind::from_extension("webm"), ResourceKind::Video);
        assert_eq!(ResourceKind::from_extension("png"), ResourceKind::Image);
        assert_eq!(ResourceKind::from_extension(""), ResourceKind::Image);
    }
}
