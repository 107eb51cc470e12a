//! Orphaned asset cleanup
//!
//! Remote asset deletions that fail are recorded in the orphaned asset table
//! instead of being dropped. [`AssetCleanupService`] periodically retries
//! them; deleting an asset that is already gone counts as success, so a
//! record can be retried any number of times.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use vidshare_db::OrphanedAssetRepository;
use vidshare_storage::{MediaStore, StorageError};

/// Configuration for the cleanup service
#[derive(Debug, Clone)]
pub struct AssetCleanupConfig {
    pub interval_secs: u64,
    pub batch_size: i64,
}

impl Default for AssetCleanupConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            batch_size: 50,
        }
    }
}

/// Outcome of one cleanup pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub resolved: usize,
    pub failed: usize,
}

/// Removes remote assets, keeping a record of every removal that failed.
#[derive(Clone)]
pub struct AssetCleanup {
    assets: Arc<dyn OrphanedAssetRepository>,
    media: Arc<dyn MediaStore>,
}

impl AssetCleanup {
    pub fn new(assets: Arc<dyn OrphanedAssetRepository>, media: Arc<dyn MediaStore>) -> Self {
        Self { assets, media }
    }

    /// Delete a remote asset now, or record it for a later retry.
    ///
    /// Returns whether the asset was removed immediately.
    pub async fn remove_or_record(&self, url: &str, reason: &str) -> bool {
        let error = match self.media.try_remove(url).await {
            Ok(()) => return true,
            Err(e) => e.to_string(),
        };

        tracing::warn!(url = %url, reason = %reason, error = %error, "Asset removal failed, recording orphan");
        if let Err(e) = self.assets.record(url, reason, Some(&error)).await {
            tracing::error!(url = %url, error = %e, "Failed to record orphaned asset");
        }
        false
    }

    /// Retry up to `batch_size` pending records.
    pub async fn run_once(&self, batch_size: i64) -> Result<CleanupReport> {
        let pending = self
            .assets
            .pending(batch_size)
            .await
            .context("Failed to load orphaned assets")?;

        let mut report = CleanupReport::default();
        for asset in pending {
            match self.media.try_remove(&asset.url).await {
                Ok(()) => {
                    self.assets
                        .mark_resolved(asset.id)
                        .await
                        .context("Failed to mark orphaned asset resolved")?;
                    report.resolved += 1;
                }
                // Retrying cannot help a URL this store does not recognise.
                Err(StorageError::InvalidUrl(url)) => {
                    tracing::error!(asset_id = %asset.id, url = %url, "Unparseable orphaned asset URL, giving up");
                    self.assets
                        .mark_resolved(asset.id)
                        .await
                        .context("Failed to mark orphaned asset resolved")?;
                    report.failed += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        asset_id = %asset.id,
                        attempts = asset.attempts + 1,
                        error = %e,
                        "Orphaned asset removal failed"
                    );
                    self.assets
                        .record_failure(asset.id, &e.to_string())
                        .await
                        .context("Failed to record cleanup failure")?;
                    report.failed += 1;
                }
            }
        }

        if report != CleanupReport::default() {
            tracing::info!(resolved = report.resolved, failed = report.failed, "Orphaned asset cleanup pass finished");
        }
        Ok(report)
    }
}

/// Background task running [`AssetCleanup::run_once`] on an interval.
pub struct AssetCleanupService {
    shutdown_tx: mpsc::Sender<()>,
}

impl AssetCleanupService {
    pub fn start(cleanup: AssetCleanup, config: AssetCleanupConfig) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);

        tokio::spawn(async move {
            Self::worker_loop(cleanup, config, shutdown_rx).await;
        });

        Self { shutdown_tx }
    }

    async fn worker_loop(
        cleanup: AssetCleanup,
        config: AssetCleanupConfig,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        let mut ticker = interval(Duration::from_secs(config.interval_secs.max(1)));

        tracing::info!(
            interval_secs = config.interval_secs,
            batch_size = config.batch_size,
            "Asset cleanup service started"
        );

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = cleanup.run_once(config.batch_size).await {
                        tracing::error!(error = %e, "Error running asset cleanup");
                    }
                }
                _ = shutdown_rx.recv() => {
                    tracing::info!("Asset cleanup service shutting down");
                    break;
                }
            }
        }
    }

    pub async fn shutdown(&self) {
        if let Err(e) = self.shutdown_tx.send(()).await {
            tracing::warn!(error = %e, "Failed to send shutdown signal to asset cleanup service");
        }
    }
}
