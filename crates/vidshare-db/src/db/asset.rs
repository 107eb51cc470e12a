use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use vidshare_core::models::OrphanedAsset;
use vidshare_core::AppError;

use crate::traits::OrphanedAssetRepository;

const ASSET_COLUMNS: &str = "id, url, reason, attempts, last_error, created_at, resolved_at";

/// Repository for remote assets awaiting deletion
#[derive(Clone)]
pub struct PgOrphanedAssetRepository {
    pool: PgPool,
}

impl PgOrphanedAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrphanedAssetRepository for PgOrphanedAssetRepository {
    #[tracing::instrument(skip(self), fields(db.table = "orphaned_assets", db.operation = "insert"))]
    async fn record(
        &self,
        url: &str,
        reason: &str,
        error: Option<&str>,
    ) -> Result<OrphanedAsset, AppError> {
        let asset = sqlx::query_as::<Postgres, OrphanedAsset>(&format!(
            "INSERT INTO orphaned_assets (url, reason, last_error) VALUES ($1, $2, $3) RETURNING {ASSET_COLUMNS}"
        ))
        .bind(url)
        .bind(reason)
        .bind(error)
        .fetch_one(&self.pool)
        .await?;

        Ok(asset)
    }

    /// Least-attempted first, so records that keep failing cannot starve newer ones.
    #[tracing::instrument(skip(self), fields(db.table = "orphaned_assets", db.operation = "select"))]
    async fn pending(&self, limit: i64) -> Result<Vec<OrphanedAsset>, AppError> {
        let assets = sqlx::query_as::<Postgres, OrphanedAsset>(&format!(
            "SELECT {ASSET_COLUMNS} FROM orphaned_assets WHERE resolved_at IS NULL ORDER BY attempts ASC, created_at ASC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(assets)
    }

    #[tracing::instrument(skip(self), fields(db.table = "orphaned_assets", db.operation = "update", db.record_id = %id))]
    async fn mark_resolved(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE orphaned_assets SET resolved_at = NOW(), attempts = attempts + 1 WHERE id = $1",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    #[tracing::instrument(skip(self), fields(db.table = "orphaned_assets", db.operation = "update", db.record_id = %id))]
    async fn record_failure(&self, id: Uuid, error: &str) -> Result<(), AppError> {
        sqlx::query(
            "UPDATE orphaned_assets SET attempts = attempts + 1, last_error = $2 WHERE id = $1",
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
