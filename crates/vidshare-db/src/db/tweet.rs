use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use uuid::Uuid;
use vidshare_core::models::Tweet;
use vidshare_core::{AppError, Page, PageRequest, SortDirection};

use super::feed::{FeedFilter, FeedQuery};
use crate::traits::TweetRepository;

const TWEET_COLUMNS: &str = "id, content, owner_id, version, created_at, updated_at";

/// Repository for tweets
#[derive(Clone)]
pub struct PgTweetRepository {
    pool: PgPool,
}

impl PgTweetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TweetRepository for PgTweetRepository {
    #[tracing::instrument(skip(self), fields(db.table = "tweets", db.operation = "select"))]
    async fn list_for_owner(
        &self,
        owner_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<Tweet>, AppError> {
        FeedQuery::new("tweets", TWEET_COLUMNS)
            .filter(FeedFilter::Eq {
                column: "owner_id",
                value: owner_id,
            })
            .order_by("created_at", "id", SortDirection::Desc)
            .page(page)
            .fetch(&self.pool)
            .await
    }

    #[tracing::instrument(skip(self, content), fields(db.table = "tweets", db.operation = "insert"))]
    async fn create(&self, owner_id: Uuid, content: &str) -> Result<Tweet, AppError> {
        let tweet = sqlx::query_as::<Postgres, Tweet>(&format!(
            "INSERT INTO tweets (content, owner_id) VALUES ($1, $2) RETURNING {TWEET_COLUMNS}"
        ))
        .bind(content)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(tweet)
    }

    #[tracing::instrument(skip(self), fields(db.table = "tweets", db.operation = "select", db.record_id = %id))]
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tweet>, AppError> {
        let tweet = sqlx::query_as::<Postgres, Tweet>(&format!(
            "SELECT {TWEET_COLUMNS} FROM tweets WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tweet)
    }

    #[tracing::instrument(skip(self, content), fields(db.table = "tweets", db.operation = "update", db.record_id = %id))]
    async fn update_content(
        &self,
        id: Uuid,
        expected_version: i32,
        content: &str,
    ) -> Result<Option<Tweet>, AppError> {
        let tweet = sqlx::query_as::<Postgres, Tweet>(&format!(
            r#"
            UPDATE tweets
            SET content = $3, version = version + 1, updated_at = NOW()
            WHERE id = $1 AND version = $2
            RETURNING {TWEET_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(expected_version)
        .bind(content)
        .fetch_optional(&self.pool)
        .await?;

        Ok(tweet)
    }

    #[tracing::instrument(skip(self), fields(db.table = "tweets", db.operation = "delete", db.record_id = %id))]
    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM tweets WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
