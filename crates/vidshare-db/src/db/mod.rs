//! PostgreSQL repositories
//!
//! One repository per entity, each holding a cloned `PgPool`. Paginated
//! listings go through [`FeedQuery`].

pub mod asset;
pub mod comment;
pub mod feed;
pub mod health;
pub mod like;
pub mod playlist;
pub mod tweet;
pub mod video;

pub use asset::PgOrphanedAssetRepository;
pub use comment::PgCommentRepository;
pub use feed::{FeedFilter, FeedQuery};
pub use health::PgHealthCheck;
pub use like::PgLikeRepository;
pub use playlist::PgPlaylistRepository;
pub use tweet::PgTweetRepository;
pub use video::PgVideoRepository;
