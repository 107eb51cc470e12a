use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use vidshare_core::models::{NewVideo, Video, VideoChanges, VideoDetails, VideoFilter};
use vidshare_core::{AppError, Page, PageRequest, SortSpec, VideoSortField};

use super::feed::{FeedFilter, FeedQuery};
use crate::traits::VideoRepository;

const VIDEO_COLUMNS: &str = "id, title, description, owner_id, video_file, thumbnail, duration, \
     views, is_published, created_at, updated_at";

/// Repository for videos
#[derive(Clone)]
pub struct PgVideoRepository {
    pool: PgPool,
}

impl PgVideoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoRepository for PgVideoRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select"))]
    async fn list(
        &self,
        filter: &VideoFilter,
        sort: SortSpec<VideoSortField>,
        page: PageRequest,
    ) -> Result<Page<Video>, AppError> {
        let mut query = FeedQuery::new("videos", VIDEO_COLUMNS)
            .order_by(sort.column(), "id", sort.direction)
            .page(page);

        if let Some(owner_id) = filter.owner_id {
            query = query.filter(FeedFilter::Eq {
                column: "owner_id",
                value: owner_id,
            });
        }
        if let Some(needle) = filter.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            query = query.filter(FeedFilter::ContainsAny {
                columns: &["title", "description"],
                needle: needle.to_string(),
            });
        }

        query.fetch(&self.pool).await
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "insert"))]
    async fn create(&self, video: NewVideo) -> Result<Video, AppError> {
        let created = sqlx::query_as::<Postgres, Video>(&format!(
            r#"
            INSERT INTO videos (title, description, owner_id, video_file, thumbnail, duration)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(&video.title)
        .bind(&video.description)
        .bind(video.owner_id)
        .bind(&video.video_file)
        .bind(&video.thumbnail)
        .bind(video.duration)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(&format!(
            "SELECT {VIDEO_COLUMNS} FROM videos WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn find_details(&self, id: Uuid) -> Result<Option<VideoDetails>, AppError> {
        let details = sqlx::query_as::<Postgres, VideoDetails>(
            r#"
            SELECT v.id, v.title, v.description, v.video_file, v.thumbnail, v.duration,
                   v.views, v.is_published, v.created_at, v.updated_at,
                   u.username, u.full_name, u.avatar, u.email
            FROM videos v
            LEFT JOIN users u ON u.id = v.owner_id
            WHERE v.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(details)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn exists(&self, id: Uuid) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(
            "SELECT EXISTS(SELECT 1 FROM videos WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    #[tracing::instrument(skip(self, changes), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn update_fields(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: &VideoChanges,
    ) -> Result<Option<Video>, AppError> {
        let updated = sqlx::query_as::<Postgres, Video>(&format!(
            r#"
            UPDATE videos
            SET title = COALESCE($3, title),
                description = COALESCE($4, description),
                thumbnail = COALESCE($5, thumbnail),
                updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .bind(changes.title.as_deref())
        .bind(changes.description.as_deref())
        .bind(changes.thumbnail.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "update", db.record_id = %id))]
    async fn toggle_publish(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Video>, AppError> {
        let updated = sqlx::query_as::<Postgres, Video>(&format!(
            r#"
            UPDATE videos
            SET is_published = NOT is_published, updated_at = NOW()
            WHERE id = $1 AND owner_id = $2
            RETURNING {VIDEO_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(updated)
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "delete", db.record_id = %id))]
    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Video>, AppError> {
        let deleted = sqlx::query_as::<Postgres, Video>(&format!(
            "DELETE FROM videos WHERE id = $1 AND owner_id = $2 RETURNING {VIDEO_COLUMNS}"
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(deleted)
    }
}
