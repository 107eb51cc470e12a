//! Application state shared by every handler.

use std::path::PathBuf;
use std::sync::Arc;
use vidshare_db::Repositories;
use vidshare_infra::AssetCleanup;
use vidshare_storage::MediaStore;

/// Where multipart uploads are spooled and how large each file may be.
#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub temp_dir: PathBuf,
    pub max_file_size: usize,
}

#[derive(Clone)]
pub struct AppState {
    pub repos: Repositories,
    pub media: Arc<dyn MediaStore>,
    /// Removes remote assets, recording failures for later retry
    pub cleanup: AssetCleanup,
    pub uploads: UploadConfig,
    pub pagination_max_limit: i64,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        media: Arc<dyn MediaStore>,
        uploads: UploadConfig,
        pagination_max_limit: i64,
    ) -> Self {
        let cleanup = AssetCleanup::new(repos.orphaned_assets.clone(), media.clone());
        Self {
            repos,
            media,
            cleanup,
            uploads,
            pagination_max_limit,
        }
    }
}
