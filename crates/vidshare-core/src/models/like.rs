use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;
use uuid::Uuid;

/// The entity a like points at. Exactly one per like.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LikeTarget {
    Video(Uuid),
    Comment(Uuid),
    Tweet(Uuid),
}

impl LikeTarget {
    pub fn id(&self) -> Uuid {
        match self {
            LikeTarget::Video(id) | LikeTarget::Comment(id) | LikeTarget::Tweet(id) => *id,
        }
    }

    /// Column on `likes` that references this kind of target.
    pub fn column(&self) -> &'static str {
        match self {
            LikeTarget::Video(_) => "video_id",
            LikeTarget::Comment(_) => "comment_id",
            LikeTarget::Tweet(_) => "tweet_id",
        }
    }

    /// Table holding this kind of target.
    pub fn table(&self) -> &'static str {
        match self {
            LikeTarget::Video(_) => "videos",
            LikeTarget::Comment(_) => "comments",
            LikeTarget::Tweet(_) => "tweets",
        }
    }
}

impl Display for LikeTarget {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            LikeTarget::Video(_) => write!(f, "Video"),
            LikeTarget::Comment(_) => write!(f, "Comment"),
            LikeTarget::Tweet(_) => write!(f, "Tweet"),
        }
    }
}

/// Result of a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Like {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub liked_by: Uuid,
    #[serde(rename = "video", skip_serializing_if = "Option::is_none")]
    pub video_id: Option<Uuid>,
    #[serde(rename = "comment", skip_serializing_if = "Option::is_none")]
    pub comment_id: Option<Uuid>,
    #[serde(rename = "tweet", skip_serializing_if = "Option::is_none")]
    pub tweet_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl Like {
    pub fn target(&self) -> Option<LikeTarget> {
        match (self.video_id, self.comment_id, self.tweet_id) {
            (Some(id), None, None) => Some(LikeTarget::Video(id)),
            (None, Some(id), None) => Some(LikeTarget::Comment(id)),
            (None, None, Some(id)) => Some(LikeTarget::Tweet(id)),
            _ => None,
        }
    }
}

/// A liked video with the video's title and thumbnail joined in.
///
/// Title and thumbnail are absent when the video was deleted after the like.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct LikedVideo {
    #[serde(rename = "_id")]
    pub like_id: Uuid,
    pub video_id: Uuid,
    pub title: Option<String>,
    pub thumbnail: Option<String>,
    pub liked_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_like_target_roundtrips_through_columns() {
        let id = Uuid::new_v4();
        let like = Like {
            id: Uuid::new_v4(),
            liked_by: Uuid::new_v4(),
            video_id: None,
            comment_id: Some(id),
            tweet_id: None,
            created_at: Utc::now(),
        };
        let target = like.target().unwrap();
        assert_eq!(target, LikeTarget::Comment(id));
        assert_eq!(target.column(), "comment_id");
        assert_eq!(target.table(), "comments");
    }

    #[test]
    fn test_like_with_two_targets_has_no_target() {
        let like = Like {
            id: Uuid::new_v4(),
            liked_by: Uuid::new_v4(),
            video_id: Some(Uuid::new_v4()),
            comment_id: None,
            tweet_id: Some(Uuid::new_v4()),
            created_at: Utc::now(),
        };
        assert!(like.target().is_none());
    }
}
