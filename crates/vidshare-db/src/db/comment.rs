use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;
use vidshare_core::models::{Comment, CommentWithOwner, OwnerSummary};
use vidshare_core::{AppError, Page, PageRequest, SortDirection};

use super::feed::{FeedFilter, FeedQuery};
use crate::traits::CommentRepository;

const COMMENT_COLUMNS: &str = "id, content, video_id, owner_id, version, created_at, updated_at";

/// Comment joined with its author's profile columns.
#[derive(FromRow)]
struct CommentRow {
    id: Uuid,
    content: String,
    video_id: Uuid,
    owner_id: Uuid,
    version: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_username: Option<String>,
    owner_full_name: Option<String>,
    owner_avatar: Option<String>,
}

impl From<CommentRow> for CommentWithOwner {
    fn from(row: CommentRow) -> Self {
        let owner_details = match (row.owner_username, row.owner_full_name) {
            (Some(username), Some(full_name)) => Some(OwnerSummary {
                id: row.owner_id,
                username,
                full_name,
                avatar: row.owner_avatar,
            }),
            _ => None,
        };

        CommentWithOwner {
            comment: Comment {
                id: row.id,
                content: row.content,
                video_id: row.video_id,
                owner_id: row.owner_id,
                version: row.version,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            owner_details,
        }
    }
}

/// Repository for comments
#[derive(Clone)]
pub struct PgCommentRepository {
    pool: PgPool,
}

impl PgCommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CommentRepository for PgCommentRepository {
    #[tracing::instrument(skip(self), fields(db.table = "comments", db.operation = "select"))]
    async fn list_for_video(
        &self,
        video_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<CommentWithOwner>, AppError> {
        let rows = FeedQuery::new(
            "comments c",
            "c.id, c.content, c.video_id, c.owner_id, c.version, c.created_at, c.updated_at, \
             u.username AS owner_username, u.full_name AS owner_full_name, u.avatar AS owner_avatar",
        )
        .join("LEFT JOIN users u ON u.id = c.owner_id")
        .filter(FeedFilter::Eq {
            column: "c.video_id",
            value: video_id,
        })
        .order_by("c.created_at", "c.id", SortDirection::Desc)
        .page(page)
        .fetch::<CommentRow>(&self.pool)
        .await?;

        Ok(rows.map(CommentWithOwner::from))
    }

    #[tracing::instrument(skip(self, content), fields(db.table = "comments", db.operation = "insert"))]
    async fn create(
        &self,
        video_id: Uuid,
        owner_id: Uuid,
        content: &str,
    ) -> Result<Comment, AppError> {
        let comment = sqlx::query_as::<Postgres, Comment>(&format!(
            "INSERT INTO comments (content, video_id, owner_id) VALUES ($1, $2, $3) RETURNING {COMMENT_COLUMNS}"
        ))
        .bind(content)
        .bind(video_id)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    #[tracing::instrument(skip(self), fields(db.table = "comments", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, AppError> {
        let comment = sqlx::query_as::<Postgres, Comment>(&format!(
            "SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    #[tracing::instrument(skip(self, content), fields(db.table = "comments", db.operation = "update", db.record_id = %id))]
    async fn update_content(
        &self,
        id: Uuid,
        expected_version: i32,
        content: &str,
    ) -> Result<Option<Comment>, AppError> {
        let comment = sqlx::query_as::<Postgres, Comment>(&format!(
            r#"
            UPDATE comments
            SET content = $3, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING {COMMENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected_version)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(comment)
    }

    #[tracing::instrument(skip(self), fields(db.table = "comments", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM comments WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
