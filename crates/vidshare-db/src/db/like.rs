use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use vidshare_core::models::{LikeTarget, LikedVideo, ToggleOutcome};
use vidshare_core::{AppError, Page, PageRequest, SortDirection};

use super::feed::{FeedFilter, FeedQuery};
use crate::traits::LikeRepository;

/// Insert/delete rounds before giving up on a target another request keeps flipping.
const TOGGLE_ATTEMPTS: usize = 3;

/// Repository for likes
#[derive(Clone)]
pub struct PgLikeRepository {
    pool: PgPool,
}

impl PgLikeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LikeRepository for PgLikeRepository {
    #[tracing::instrument(skip(self), fields(db.table = target.table(), db.operation = "select"))]
    async fn target_exists(&self, target: LikeTarget) -> Result<bool, AppError> {
        let exists = sqlx::query_scalar::<Postgres, bool>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)",
            target.table()
        ))
        .bind(target.id())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// The partial unique index on `(liked_by, <target>_id)` makes the insert
    /// the arbiter: a conflict means a like exists, so the delete runs instead.
    #[tracing::instrument(skip(self), fields(db.table = "likes", db.operation = "upsert"))]
    async fn toggle(&self, actor: Uuid, target: LikeTarget) -> Result<ToggleOutcome, AppError> {
        let column = target.column();
        let insert = format!(
            "INSERT INTO likes (liked_by, {column}) VALUES ($1, $2) \
             ON CONFLICT (liked_by, {column}) WHERE {column} IS NOT NULL DO NOTHING \
             RETURNING id"
        );
        let delete = format!("DELETE FROM likes WHERE liked_by = $1 AND {column} = $2 RETURNING id");

        for _ in 0..TOGGLE_ATTEMPTS {
            let inserted = sqlx::query_scalar::<Postgres, Uuid>(&insert)
                .bind(actor)
                .bind(target.id())
                .fetch_optional(&self.pool)
                .await?;
            if inserted.is_some() {
                return Ok(ToggleOutcome::Added);
            }

            let deleted = sqlx::query_scalar::<Postgres, Uuid>(&delete)
                .bind(actor)
                .bind(target.id())
                .fetch_optional(&self.pool)
                .await?;
            if deleted.is_some() {
                return Ok(ToggleOutcome::Removed);
            }
            // A concurrent toggle removed the like between our two statements.
        }

        tracing::warn!(%actor, target = %target, "Toggle kept racing with concurrent requests");
        Err(AppError::Conflict(
            "Like state changed concurrently, please retry".to_string(),
        ))
    }

    #[tracing::instrument(skip(self), fields(db.table = "likes", db.operation = "select"))]
    async fn liked_videos(
        &self,
        actor: Uuid,
        page: PageRequest,
    ) -> Result<Page<LikedVideo>, AppError> {
        FeedQuery::new(
            "likes l",
            "l.id AS like_id, l.video_id AS video_id, v.title, v.thumbnail, l.created_at AS liked_at",
        )
        .join("LEFT JOIN videos v ON v.id = l.video_id")
        .filter(FeedFilter::Eq {
            column: "l.liked_by",
            value: actor,
        })
        .filter(FeedFilter::NotNull {
            column: "l.video_id",
        })
        .order_by("l.created_at", "l.id", SortDirection::Desc)
        .page(page)
        .fetch(&self.pool)
        .await
    }
}
