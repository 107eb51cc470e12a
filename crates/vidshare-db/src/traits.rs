//! Repository traits
//!
//! Each trait covers one entity. Implementations must make the toggle and
//! playlist membership writes atomic, and must reject version-guarded
//! updates made against a stale version by returning `None`.

use async_trait::async_trait;
use uuid::Uuid;
use vidshare_core::models::{
    Comment, CommentWithOwner, LikeTarget, LikedVideo, MembershipChange, NewVideo, OrphanedAsset,
    Playlist, ToggleOutcome, Tweet, Video, VideoChanges, VideoDetails, VideoFilter,
};
use vidshare_core::{AppError, Page, PageRequest, SortSpec, VideoSortField};

#[async_trait]
pub trait VideoRepository: Send + Sync {
    async fn list(
        &self,
        filter: &VideoFilter,
        sort: SortSpec<VideoSortField>,
        page: PageRequest,
    ) -> Result<Page<Video>, AppError>;

    async fn create(&self, video: NewVideo) -> Result<Video, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    /// Video with its owner's public profile joined in
    async fn find_details(&self, id: Uuid) -> Result<Option<VideoDetails>, AppError>;

    async fn exists(&self, id: Uuid) -> Result<bool, AppError>;

    /// Apply field-level changes to a video owned by `owner_id`.
    async fn update_fields(
        &self,
        id: Uuid,
        owner_id: Uuid,
        changes: &VideoChanges,
    ) -> Result<Option<Video>, AppError>;

    /// Flip the publish flag of a video owned by `owner_id`.
    async fn toggle_publish(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Video>, AppError>;

    /// Delete a video owned by `owner_id`, returning the removed row.
    async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<Option<Video>, AppError>;
}

#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Newest first, with author summaries
    async fn list_for_video(
        &self,
        video_id: Uuid,
        page: PageRequest,
    ) -> Result<Page<CommentWithOwner>, AppError>;

    async fn create(&self, video_id: Uuid, owner_id: Uuid, content: &str)
        -> Result<Comment, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, AppError>;

    /// `None` when the comment is gone or `expected_version` is stale.
    async fn update_content(
        &self,
        id: Uuid,
        expected_version: i32,
        content: &str,
    ) -> Result<Option<Comment>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait TweetRepository: Send + Sync {
    /// Newest first
    async fn list_for_owner(&self, owner_id: Uuid, page: PageRequest)
        -> Result<Page<Tweet>, AppError>;

    async fn create(&self, owner_id: Uuid, content: &str) -> Result<Tweet, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tweet>, AppError>;

    /// `None` when the tweet is gone or `expected_version` is stale.
    async fn update_content(
        &self,
        id: Uuid,
        expected_version: i32,
        content: &str,
    ) -> Result<Option<Tweet>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait LikeRepository: Send + Sync {
    /// Whether the liked entity currently exists
    async fn target_exists(&self, target: LikeTarget) -> Result<bool, AppError>;

    /// Atomically add the actor's like on `target`, or remove it if present.
    async fn toggle(&self, actor: Uuid, target: LikeTarget) -> Result<ToggleOutcome, AppError>;

    /// Videos liked by `actor`, most recent like first
    async fn liked_videos(&self, actor: Uuid, page: PageRequest)
        -> Result<Page<LikedVideo>, AppError>;
}

#[async_trait]
pub trait PlaylistRepository: Send + Sync {
    /// Fails with `Conflict` when the owner already has a playlist of that name.
    async fn create(
        &self,
        owner_id: Uuid,
        name: &str,
        description: &str,
    ) -> Result<Playlist, AppError>;

    async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Playlist>, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Playlist>, AppError>;

    /// `None` when the playlist is gone or `expected_version` is stale.
    /// Fails with `Conflict` when renaming onto another playlist's name.
    async fn update(
        &self,
        id: Uuid,
        expected_version: i32,
        name: Option<&str>,
        description: Option<&str>,
    ) -> Result<Option<Playlist>, AppError>;

    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Append unless already present.
    async fn add_video(&self, id: Uuid, video_id: Uuid) -> Result<MembershipChange, AppError>;

    /// Remove if present.
    async fn remove_video(&self, id: Uuid, video_id: Uuid)
        -> Result<MembershipChange, AppError>;
}

#[async_trait]
pub trait OrphanedAssetRepository: Send + Sync {
    async fn record(
        &self,
        url: &str,
        reason: &str,
        error: Option<&str>,
    ) -> Result<OrphanedAsset, AppError>;

    /// Unresolved records, oldest first
    async fn pending(&self, limit: i64) -> Result<Vec<OrphanedAsset>, AppError>;

    async fn mark_resolved(&self, id: Uuid) -> Result<(), AppError>;

    async fn record_failure(&self, id: Uuid, error: &str) -> Result<(), AppError>;
}

#[async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), AppError>;
}
