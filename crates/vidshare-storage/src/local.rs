use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

use crate::asset_url::AssetRef;
use crate::traits::{MediaStore, ResourceKind, StorageError, StorageResult, StoredAsset};
use crate::MediaBackend;

/// Local filesystem media store.
///
/// Files live under `{base_path}/{kind}/{public_id}.{ext}` and are served at
/// `{base_url}/{kind}/upload/v{unix_ts}/{public_id}.{ext}`.
#[derive(Clone)]
pub struct LocalMediaStore {
    base_path: PathBuf,
    base_url: String,
}

impl LocalMediaStore {
    /// * `base_path` - Root directory for stored assets (e.g., "/var/lib/vidshare/media")
    /// * `base_url` - Base URL the directory is served from (e.g., "http://localhost:8000/media")
    pub async fn new(base_path: impl Into<PathBuf>, base_url: String) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create media directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(Self {
            base_path,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a stored asset to its path, refusing ids that escape the root.
    fn asset_path(&self, kind: ResourceKind, public_id: &str, format: Option<&str>) -> StorageResult<PathBuf> {
        if public_id.contains("..") || public_id.starts_with('/') || public_id.contains('\\') {
            return Err(StorageError::InvalidKey(public_id.to_string()));
        }
        let file_name = match format {
            Some(ext) => format!("{}.{}", public_id, ext),
            None => public_id.to_string(),
        };
        Ok(self.base_path.join(kind.as_str()).join(file_name))
    }
}

#[async_trait]
impl MediaStore for LocalMediaStore {
    async fn upload(&self, local_path: &Path) -> StorageResult<StoredAsset> {
        if !fs::try_exists(local_path).await.unwrap_or(false) {
            return Err(StorageError::NotFound(local_path.display().to_string()));
        }

        let format = local_path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .filter(|e| !e.is_empty());
        let kind = format
            .as_deref()
            .map(ResourceKind::from_extension)
            .unwrap_or(ResourceKind::Image);

        let public_id = Uuid::new_v4().simple().to_string();
        let target = self.asset_path(kind, &public_id, format.as_deref())?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        let size = fs::copy(local_path, &target).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to copy to {}: {}", target.display(), e))
        })?;

        let file_name = match &format {
            Some(ext) => format!("{}.{}", public_id, ext),
            None => public_id.clone(),
        };
        let url = format!(
            "{}/{}/upload/v{}/{}",
            self.base_url,
            kind,
            chrono::Utc::now().timestamp(),
            file_name
        );

        tracing::debug!(
            path = %target.display(),
            size_bytes = size,
            "Local media upload successful"
        );

        Ok(StoredAsset {
            url,
            public_id,
            kind,
            duration: None,
        })
    }

    async fn destroy(&self, asset: &AssetRef) -> StorageResult<()> {
        let path = self.asset_path(asset.kind, &asset.public_id, asset.format.as_deref())?;

        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(());
        }

        fs::remove_file(&path).await.map_err(|e| {
            StorageError::DeleteFailed(format!("Failed to delete {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), "Local media delete successful");
        Ok(())
    }

    fn backend(&self) -> MediaBackend {
        MediaBackend::Local
    }
}
