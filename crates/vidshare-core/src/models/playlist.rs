use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::ownership::Owned;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub description: String,
    #[serde(rename = "owner")]
    pub owner_id: Uuid,
    /// Ordered, duplicate-free video references
    pub videos: Vec<Uuid>,
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Owned for Playlist {
    fn owner_id(&self) -> Uuid {
        self.owner_id
    }
}

/// Result of adding a video to, or removing one from, a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipChange {
    Applied,
    /// Already present on add, absent on remove
    Unchanged,
    PlaylistMissing,
}

impl MembershipChange {
    pub fn from_flags(found: bool, changed: bool) -> Self {
        match (found, changed) {
            (_, true) => MembershipChange::Applied,
            (true, false) => MembershipChange::Unchanged,
            (false, false) => MembershipChange::PlaylistMissing,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct PlaylistRequest {
    #[serde(default)]
    #[validate(length(max = 255, message = "Playlist name cannot exceed 255 characters"))]
    pub name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    pub description: Option<String>,
}
