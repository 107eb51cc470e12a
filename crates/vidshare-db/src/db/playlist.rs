use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use vidshare_core::models::{MembershipChange, Playlist};
use vidshare_core::AppError;

use crate::traits::PlaylistRepository;

const PLAYLIST_COLUMNS: &str =
    "id, name, description, owner_id, videos, version, created_at, updated_at";

pub(crate) const DUPLICATE_PLAYLIST: &str =
    "A playlist with this name already exists. Please choose a different name.";

fn duplicate_name(err: sqlx::Error) -> AppError {
    let err = AppError::from(err);
    if err.is_unique_violation() {
        AppError::Conflict(DUPLICATE_PLAYLIST.to_string())
    } else {
        err
    }
}

/// Repository for playlists
#[derive(Clone)]
pub struct PgPlaylistRepository {
    pool: PgPool,
}

impl PgPlaylistRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlaylistRepository for PgPlaylistRepository {
    #[tracing::instrument(skip(self, description), fields(db.table = "playlists", db.operation = "insert"))]
    async fn create(
        &self,
        owner_id: Uuid,
        name: &str,
        description: &str,
    ) -> Result<Playlist, AppError> {
        sqlx::query_as::<Postgres, Playlist>(&format!(
            "INSERT INTO playlists (name, description, owner_id) VALUES ($1, $2, $3) RETURNING {PLAYLIST_COLUMNS}"
        ))
        .bind(name)
        .bind(description)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
        .map_err(duplicate_name)
    }

    #[tracing::instrument(skip(self), fields(db.table = "playlists", db.operation = "select"))]
    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Playlist>, AppError> {
        let playlists = sqlx::query_as::<Postgres, Playlist>(&format!(
            "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(playlists)
    }

    #[tracing::instrument(skip(self), fields(db.table = "playlists", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Playlist>, AppError> {
        let playlist = sqlx::query_as::<Postgres, Playlist>(&format!(
            "SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(playlist)
    }

    #[tracing::instrument(skip(self, description), fields(db.table = "playlists", db.operation = "update", db.record_id = %id))]
    async fn update(
        &self,
        id: Uuid,
        expected_version: i32,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Playlist>, AppError> {
        sqlx::query_as::<Postgres, Playlist>(&format!(
            r#"
            UPDATE playlists
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                version = version + 1,
                updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING {PLAYLIST_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected_version)
        .bind(name)
        .bind(description)
        .fetch_optional(&self.pool)
        .await
        .map_err(duplicate_name)
    }

    #[tracing::instrument(skip(self), fields(db.table = "playlists", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM playlists WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[tracing::instrument(skip(self), fields(db.table = "playlists", db.operation = "update", db.record_id = %id))]
    async fn add_video(&self, id: Uuid, video_id: Uuid) -> Result<MembershipChange, AppError> {
        let (found, changed) = sqlx::query_as::<Postgres, (bool, bool)>(
            r#"
            WITH updated AS (
                UPDATE playlists
                SET videos = array_append(videos, $2), version = version + 1, updated_at = NOW()
                WHERE id = $1 AND NOT ($2 = ANY(videos))
                RETURNING id
            )
            SELECT EXISTS(SELECT 1 FROM playlists WHERE id = $1),
                   EXISTS(SELECT 1 FROM updated)
            "#,
        )
        .bind(id)
        .bind(video_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(MembershipChange::from_flags(found, changed))
    }

    #[tracing::instrument(skip(self), fields(db.table = "playlists", db.operation = "update", db.record_id = %id))]
    async fn remove_video(
        &self,
        id: Uuid,
        video_id: Uuid,
    ) -> Result<MembershipChange, AppError> {
        let (found, changed) = sqlx::query_as::<Postgres, (bool, bool)>(
            r#"
            WITH updated AS (
                UPDATE playlists
                SET videos = array_remove(videos, $2), version = version + 1, updated_at = NOW()
                WHERE id = $1 AND $2 = ANY(videos)
                RETURNING id
            )
            SELECT EXISTS(SELECT 1 FROM playlists WHERE id = $1),
                   EXISTS(SELECT 1 FROM updated)
            "#,
        )
        .bind(id)
        .bind(video_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(MembershipChange::from_flags(found, changed))
    }
}
