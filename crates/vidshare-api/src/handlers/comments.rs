use crate::auth::UserContext;
use crate::error::{validate_body, ErrorResponse, HttpAppError, ValidatedJson};
use crate::handlers::PageQuery;
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use vidshare_core::models::{Comment, CommentRequest};
use vidshare_core::{ensure_owner, parse_object_id, require_text, AppError};

const EMPTY_CONTENT: &str = "Comment content cannot be empty";

async fn load_comment(state: &AppState, raw_id: &str) -> Result<Comment, AppError> {
    let id = parse_object_id(raw_id, "comment")?;
    state
        .repos
        .comments
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".to_string()))
}

#[utoipa::path(
    get,
    path = "/api/v1/videos/{videoId}/comments",
    tag = "comments",
    params(("videoId" = String, Path, description = "Video ID"), PageQuery),
    responses(
        (status = 200, description = "Page of comments with author summaries", body = Object),
        (status = 400, description = "Invalid video id", body = ErrorResponse),
        (status = 404, description = "Video not found, or it has no comments", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, params), fields(operation = "list_comments"))]
pub async fn list_comments(
    _user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    Query(params): Query<PageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video_id = parse_object_id(&video_id, "video")?;

    if !state.repos.videos.exists(video_id).await? {
        return Err(AppError::NotFound("Video not found".to_string()).into());
    }

    let page = params.resolve(state.pagination_max_limit);
    let comments = state.repos.comments.list_for_video(video_id, page).await?;
    if comments.is_empty() {
        return Err(AppError::NotFound("No comments found for this video".to_string()).into());
    }

    Ok(ApiResponse::ok(comments, "Comments fetched successfully"))
}

#[utoipa::path(
    post,
    path = "/api/v1/videos/{videoId}/comments",
    tag = "comments",
    params(("videoId" = String, Path, description = "Video ID")),
    request_body = CommentRequest,
    responses(
        (status = 201, description = "Comment added", body = Comment),
        (status = 400, description = "Invalid id or empty content", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %user.user_id, operation = "add_comment"))]
pub async fn add_comment(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    ValidatedJson(request): ValidatedJson<CommentRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let video_id = parse_object_id(&video_id, "video")?;

    if !state.repos.videos.exists(video_id).await? {
        return Err(AppError::NotFound("Video not found".to_string()).into());
    }

    let content = require_text(request.content.as_deref(), EMPTY_CONTENT)?;
    let comment = state
        .repos
        .comments
        .create(video_id, user.user_id, &content)
        .await?;

    Ok(ApiResponse::created(comment, "Comment added successfully"))
}

#[utoipa::path(
    patch,
    path = "/api/v1/comments/{commentId}",
    tag = "comments",
    params(("commentId" = String, Path, description = "Comment ID")),
    request_body = CommentRequest,
    responses(
        (status = 200, description = "Comment updated, or nothing to update", body = Object),
        (status = 400, description = "Invalid id or empty content", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse),
        (status = 409, description = "Comment changed concurrently", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id, operation = "update_comment"))]
pub async fn update_comment(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<String>,
    payload: Result<Json<CommentRequest>, JsonRejection>,
) -> Result<Response, HttpAppError> {
    let comment = load_comment(&state, &comment_id).await?;
    ensure_owner(&comment, user.user_id, "edit your own comments")?;

    let request = validate_body(payload)?;
    let content = require_text(request.content.as_deref(), EMPTY_CONTENT)?;
    if content == comment.content {
        return Ok(ApiResponse::empty("Nothing to update").into_response());
    }

    let updated = state
        .repos
        .comments
        .update_content(comment.id, comment.version, &content)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("Comment was modified concurrently, please retry".to_string())
        })?;

    Ok(ApiResponse::ok(updated, "Comment updated successfully").into_response())
}

#[utoipa::path(
    delete,
    path = "/api/v1/comments/{commentId}",
    tag = "comments",
    params(("commentId" = String, Path, description = "Comment ID")),
    responses(
        (status = 200, description = "Comment deleted", body = Object),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Comment not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "delete_comment"))]
pub async fn delete_comment(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let comment = load_comment(&state, &comment_id).await?;
    ensure_owner(&comment, user.user_id, "delete your own comments")?;

    if !state.repos.comments.delete(comment.id).await? {
        return Err(AppError::NotFound("Comment not found".to_string()).into());
    }

    Ok(ApiResponse::empty("Comment deleted successfully"))
}
