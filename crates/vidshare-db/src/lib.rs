//! Vidshare data access layer
//!
//! Repository traits describe the narrow interface the HTTP layer needs from
//! the store. `db` holds the PostgreSQL implementations; `test_helpers`
//! (feature `test-helpers`) holds an in-memory implementation of the same
//! traits for tests.

pub mod db;
mod repositories;
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
pub mod traits;

pub use db::{
    FeedFilter, FeedQuery, PgCommentRepository, PgHealthCheck, PgLikeRepository,
    PgOrphanedAssetRepository, PgPlaylistRepository, PgTweetRepository, PgVideoRepository,
};
pub use repositories::Repositories;
pub use traits::{
    CommentRepository, HealthCheck, LikeRepository, OrphanedAssetRepository, PlaylistRepository,
    TweetRepository, VideoRepository,
};
