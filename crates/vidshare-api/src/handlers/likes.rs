//! Like toggles and the liked-videos feed.

use crate::auth::UserContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::handlers::PageQuery;
use crate::response::{ApiResponse, Empty};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use std::sync::Arc;
use uuid::Uuid;
use vidshare_core::models::{LikeTarget, ToggleOutcome};
use vidshare_core::{parse_object_id, AppError};

async fn toggle_like(
    state: &AppState,
    actor: Uuid,
    target: LikeTarget,
) -> Result<ApiResponse<Empty>, HttpAppError> {
    if !state.repos.likes.target_exists(target).await? {
        return Err(AppError::NotFound(format!("{} not found", target)).into());
    }

    let outcome = state.repos.likes.toggle(actor, target).await?;
    tracing::debug!(target_id = %target.id(), outcome = ?outcome, "Like toggled");

    let message = match outcome {
        ToggleOutcome::Added => format!("{} liked successfully", target),
        ToggleOutcome::Removed => format!("{} like removed successfully", target),
    };
    Ok(ApiResponse::empty(message))
}

#[utoipa::path(
    post,
    path = "/api/v1/videos/{videoId}/like",
    tag = "likes",
    params(("videoId" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Like added or removed", body = Object),
        (status = 400, description = "Invalid video id", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn toggle_video_like(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_object_id(&video_id, "video")?;
    toggle_like(&state, user.user_id, LikeTarget::Video(id)).await
}

#[utoipa::path(
    post,
    path = "/api/v1/comments/{commentId}/like",
    tag = "likes",
    params(("commentId" = String, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Like added or removed", body = Object),
        (status = 400, description = "Invalid comment id", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn toggle_comment_like(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_object_id(&comment_id, "comment")?;
    toggle_like(&state, user.user_id, LikeTarget::Comment(id)).await
}

#[utoipa::path(
    post,
    path = "/api/v1/tweets/{tweetId}/like",
    tag = "likes",
    params(("tweetId" = String, Path, description = "Tweet ID")),
    responses(
        (status = 200, description = "Like added or removed", body = Object),
        (status = 400, description = "Invalid tweet id", body = ErrorResponse),
        (status = 404, description = "Tweet not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id))]
pub async fn toggle_tweet_like(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(tweet_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_object_id(&tweet_id, "tweet")?;
    toggle_like(&state, user.user_id, LikeTarget::Tweet(id)).await
}

#[utoipa::path(
    get,
    path = "/api/v1/likes/videos",
    tag = "likes",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of liked videos, possibly empty", body = Object)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, params), fields(user_id = %user.user_id))]
pub async fn liked_videos(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let page = params.resolve(state.pagination_max_limit);
    let liked = state.repos.likes.liked_videos(user.user_id, page).await?;

    let message = if liked.is_empty() {
        "No liked videos found"
    } else {
        "Liked videos fetched successfully"
    };
    Ok(ApiResponse::ok(liked, message))
}
