use sqlx::PgPool;
use std::sync::Arc;

use crate::db::{
    PgCommentRepository, PgHealthCheck, PgLikeRepository, PgOrphanedAssetRepository,
    PgPlaylistRepository, PgTweetRepository, PgVideoRepository,
};
use crate::traits::{
    CommentRepository, HealthCheck, LikeRepository, OrphanedAssetRepository, PlaylistRepository,
    TweetRepository, VideoRepository,
};

/// Every repository the application uses, behind trait objects.
#[derive(Clone)]
pub struct Repositories {
    pub videos: Arc<dyn VideoRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub likes: Arc<dyn LikeRepository>,
    pub tweets: Arc<dyn TweetRepository>,
    pub playlists: Arc<dyn PlaylistRepository>,
    pub orphaned_assets: Arc<dyn OrphanedAssetRepository>,
    pub health: Arc<dyn HealthCheck>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            videos: Arc::new(PgVideoRepository::new(pool.clone())),
            comments: Arc::new(PgCommentRepository::new(pool.clone())),
            likes: Arc::new(PgLikeRepository::new(pool.clone())),
            tweets: Arc::new(PgTweetRepository::new(pool.clone())),
            playlists: Arc::new(PgPlaylistRepository::new(pool.clone())),
            orphaned_assets: Arc::new(PgOrphanedAssetRepository::new(pool.clone())),
            health: Arc::new(PgHealthCheck::new(pool)),
        }
    }

    /// All repositories backed by one shared in-memory database.
    #[cfg(any(test, feature = "test-helpers"))]
    pub fn in_memory(db: crate::test_helpers::InMemoryDatabase) -> Self {
        Self {
            videos: Arc::new(db.clone()),
            comments: Arc::new(db.clone()),
            likes: Arc::new(db.clone()),
            tweets: Arc::new(db.clone()),
            playlists: Arc::new(db.clone()),
            orphaned_assets: Arc::new(db.clone()),
            health: Arc::new(db),
        }
    }
}
