#[cfg(feature = "storage-cloudinary")]
use crate::CloudinaryStore;
#[cfg(feature = "storage-local")]
use crate::LocalMediaStore;
use crate::{MediaBackend, MediaStore, StorageError, StorageResult};
use std::sync::Arc;
use vidshare_core::Config;

/// Create the media store selected by configuration
pub async fn create_media_store(config: &Config) -> StorageResult<Arc<dyn MediaStore>> {
    match config.media_backend() {
        #[cfg(feature = "storage-cloudinary")]
        MediaBackend::Cloudinary => {
            let required = |value: Option<&str>, name: &str| {
                value
                    .map(String::from)
                    .ok_or_else(|| StorageError::ConfigError(format!("{} not configured", name)))
            };
            let store = CloudinaryStore::new(
                required(config.cloudinary_cloud_name(), "CLOUDINARY_CLOUD_NAME")?,
                required(config.cloudinary_api_key(), "CLOUDINARY_API_KEY")?,
                required(config.cloudinary_api_secret(), "CLOUDINARY_API_SECRET")?,
            )?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-cloudinary"))]
        MediaBackend::Cloudinary => Err(StorageError::ConfigError(
            "Cloudinary backend not available (storage-cloudinary feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-local")]
        MediaBackend::Local => {
            let base_path = config.local_media_path().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_MEDIA_PATH not configured".to_string())
            })?;
            let base_url = config.local_media_base_url().ok_or_else(|| {
                StorageError::ConfigError("LOCAL_MEDIA_BASE_URL not configured".to_string())
            })?;

            let store = LocalMediaStore::new(base_path, base_url.to_string()).await?;
            Ok(Arc::new(store))
        }

        #[cfg(not(feature = "storage-local"))]
        MediaBackend::Local => Err(StorageError::ConfigError(
            "Local backend not available (storage-local feature not enabled)".to_string(),
        )),
    }
}
