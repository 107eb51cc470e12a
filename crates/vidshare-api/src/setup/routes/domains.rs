//! Domain route groups (videos, comments, likes, tweets, playlists).

use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::routing::{get, patch, post};
use axum::Router;
use std::sync::Arc;

pub fn video_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/videos", API_PREFIX),
            get(handlers::videos::list_videos).post(handlers::videos::publish_video),
        )
        .route(
            &format!("{}/videos/{{videoId}}", API_PREFIX),
            get(handlers::videos::get_video)
                .patch(handlers::videos::update_video)
                .delete(handlers::videos::delete_video),
        )
        .route(
            &format!("{}/videos/{{videoId}}/publish", API_PREFIX),
            patch(handlers::videos::toggle_publish),
        )
        .with_state(state)
}

pub fn comment_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/videos/{{videoId}}/comments", API_PREFIX),
            get(handlers::comments::list_comments).post(handlers::comments::add_comment),
        )
        .route(
            &format!("{}/comments/{{commentId}}", API_PREFIX),
            patch(handlers::comments::update_comment).delete(handlers::comments::delete_comment),
        )
        .with_state(state)
}

pub fn like_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/videos/{{videoId}}/like", API_PREFIX),
            post(handlers::likes::toggle_video_like),
        )
        .route(
            &format!("{}/comments/{{commentId}}/like", API_PREFIX),
            post(handlers::likes::toggle_comment_like),
        )
        .route(
            &format!("{}/tweets/{{tweetId}}/like", API_PREFIX),
            post(handlers::likes::toggle_tweet_like),
        )
        .route(
            &format!("{}/likes/videos", API_PREFIX),
            get(handlers::likes::liked_videos),
        )
        .with_state(state)
}

pub fn tweet_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/tweets", API_PREFIX),
            post(handlers::tweets::create_tweet),
        )
        .route(
            &format!("{}/tweets/user/{{userId}}", API_PREFIX),
            get(handlers::tweets::user_tweets),
        )
        .route(
            &format!("{}/tweets/{{tweetId}}", API_PREFIX),
            patch(handlers::tweets::update_tweet).delete(handlers::tweets::delete_tweet),
        )
        .with_state(state)
}

pub fn playlist_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/playlists", API_PREFIX),
            post(handlers::playlists::create_playlist),
        )
        .route(
            &format!("{}/playlists/user/{{userId}}", API_PREFIX),
            get(handlers::playlists::user_playlists),
        )
        .route(
            &format!("{}/playlists/{{playlistId}}", API_PREFIX),
            get(handlers::playlists::get_playlist)
                .patch(handlers::playlists::update_playlist)
                .delete(handlers::playlists::delete_playlist),
        )
        .route(
            &format!("{}/playlists/{{playlistId}}/videos/{{videoId}}", API_PREFIX),
            post(handlers::playlists::add_video).delete(handlers::playlists::remove_video),
        )
        .with_state(state)
}
