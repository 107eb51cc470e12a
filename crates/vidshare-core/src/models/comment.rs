use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::OwnerSummary;
use crate::ownership::Owned;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub content: String,
    #[serde(rename = "video")]
    pub video_id: Uuid,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    /// Incremented on every update; a write against a stale version is rejected
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Comment {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

/// Comment as listed under a video, with its author's summary.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommentWithOwner {
    #[serde(flatten)]
    pub comment: Comment,
    pub owner_details: Option<OwnerSummary>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CommentRequest {
    #[serde(default)]
    #[validate(length(max = 5000, message = "Comment cannot exceed 5000 characters"))]
    pub content: Option<String>,
}
