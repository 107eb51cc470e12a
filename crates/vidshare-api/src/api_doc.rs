//! OpenAPI documentation, served at `/api/openapi.json` and rendered by
//! RapiDoc at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use crate::response;
use vidshare_core::models;

/// Registers the bearer JWT scheme referenced by protected paths.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Vidshare API",
        version = "0.1.0",
        description = "Video sharing backend (v1): videos, comments, likes, tweets and playlists. All endpoints are versioned under /api/v1/ and, apart from the health check, require a bearer JWT."
    ),
    paths(
        handlers::health::healthcheck,
        // Videos
        handlers::videos::list_videos,
        handlers::videos::publish_video,
        handlers::videos::get_video,
        handlers::videos::update_video,
        handlers::videos::delete_video,
        handlers::videos::toggle_publish,
        // Comments
        handlers::comments::list_comments,
        handlers::comments::add_comment,
        handlers::comments::update_comment,
        handlers::comments::delete_comment,
        // Likes
        handlers::likes::toggle_video_like,
        handlers::likes::toggle_comment_like,
        handlers::likes::toggle_tweet_like,
        handlers::likes::liked_videos,
        // Tweets
        handlers::tweets::create_tweet,
        handlers::tweets::user_tweets,
        handlers::tweets::update_tweet,
        handlers::tweets::delete_tweet,
        // Playlists
        handlers::playlists::create_playlist,
        handlers::playlists::user_playlists,
        handlers::playlists::get_playlist,
        handlers::playlists::update_playlist,
        handlers::playlists::delete_playlist,
        handlers::playlists::add_video,
        handlers::playlists::remove_video,
    ),
    components(
        schemas(
            models::Video,
            models::VideoDetails,
            models::Comment,
            models::CommentWithOwner,
            models::CommentRequest,
            models::OwnerSummary,
            models::LikedVideo,
            models::Tweet,
            models::TweetRequest,
            models::Playlist,
            models::PlaylistRequest,
            handlers::health::HealthStatus,
            handlers::videos::PublishVideoForm,
            handlers::videos::UpdateVideoForm,
            response::Empty,
            error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Service and database status"),
        (name = "videos", description = "Video publishing, listing and management"),
        (name = "comments", description = "Comments on videos"),
        (name = "likes", description = "Like toggles and liked videos"),
        (name = "tweets", description = "Short text posts"),
        (name = "playlists", description = "Private, ordered video collections")
    )
)]
pub struct ApiDoc;
