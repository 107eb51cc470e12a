//! Application setup and initialization

pub mod database;
pub mod routes;
pub mod server;

use crate::state::{AppState, UploadConfig};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use vidshare_core::Config;
use vidshare_db::Repositories;
use vidshare_infra::{AssetCleanupConfig, AssetCleanupService};

/// A fully wired application, ready to be served.
pub struct App {
    pub state: Arc<AppState>,
    pub router: axum::Router,
    /// Running orphaned-asset cleanup, unless disabled by configuration
    pub cleanup_service: Option<AssetCleanupService>,
}

/// Where multipart uploads are spooled, created if missing.
pub async fn upload_config(config: &Config) -> Result<UploadConfig> {
    let temp_dir = config
        .upload_temp_dir()
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);
    tokio::fs::create_dir_all(&temp_dir)
        .await
        .with_context(|| format!("Failed to create upload directory {}", temp_dir.display()))?;

    Ok(UploadConfig {
        temp_dir,
        max_file_size: config.max_upload_size_bytes(),
    })
}

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<App> {
    config.validate().context("Configuration validation failed")?;

    vidshare_infra::init_telemetry(config.environment())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        media_backend = %config.media_backend(),
        "Configuration loaded and validated successfully"
    );

    let pool = database::setup_database(&config).await?;

    let media = vidshare_storage::create_media_store(&config)
        .await
        .context("Failed to initialize media store")?;
    tracing::info!(backend = %media.backend(), "Media store initialized");

    let uploads = upload_config(&config).await?;
    let state = Arc::new(AppState::new(
        Repositories::postgres(pool),
        media,
        uploads,
        config.pagination_max_limit(),
    ));

    let cleanup_service = match config.asset_cleanup_interval_secs() {
        0 => {
            tracing::info!("Orphaned asset cleanup disabled");
            None
        }
        interval_secs => Some(AssetCleanupService::start(
            state.cleanup.clone(),
            AssetCleanupConfig {
                interval_secs,
                ..AssetCleanupConfig::default()
            },
        )),
    };

    let router = routes::setup_routes(&config, state.clone())?;

    Ok(App {
        state,
        router,
        cleanup_service,
    })
}
