//! Video handlers: listing, publishing, updates and deletion.
//!
//! Publishing and thumbnail replacement upload through the media store.
//! Remote assets that become unreferenced are removed through
//! [`AssetCleanup`](vidshare_infra::AssetCleanup) so a failed removal is
//! retried later instead of being lost.

use crate::auth::UserContext;
use crate::error::{ErrorResponse, HttpAppError};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::utils::upload::{read_upload_form, UploadedFile};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};
use vidshare_core::models::{NewVideo, VideoChanges, VideoDetails, VideoFilter};
use vidshare_core::{
    ensure_owner, optional_text, parse_object_id, AppError, PageRequest, SortSpec, VideoSortField,
};
use vidshare_storage::StoredAsset;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct VideoListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Case-insensitive match against title or description
    pub query: Option<String>,
    /// One of createdAt, title, views, duration
    pub sort_by: Option<String>,
    /// `1` or `asc` for ascending, anything else descends
    pub sort_type: Option<String>,
    /// Only videos owned by this user
    pub user_id: Option<String>,
}

/// Multipart body of `POST /videos`
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct PublishVideoForm {
    title: String,
    description: String,
    #[schema(value_type = String, format = Binary)]
    video_file: Vec<u8>,
    #[schema(value_type = String, format = Binary)]
    thumbnail: Vec<u8>,
}

/// Multipart body of `PATCH /videos/{videoId}`
#[derive(Deserialize, ToSchema)]
#[allow(dead_code)]
pub struct UpdateVideoForm {
    title: Option<String>,
    description: Option<String>,
    #[schema(value_type = Option<String>, format = Binary)]
    thumbnail: Option<Vec<u8>>,
}

async fn store_file(
    state: &AppState,
    file: UploadedFile,
    failure: &str,
) -> Result<StoredAsset, AppError> {
    let stored = state.media.store(file.path()).await;
    drop(file);
    stored.ok_or_else(|| AppError::UploadFailure(failure.to_string()))
}

#[utoipa::path(
    get,
    path = "/api/v1/videos",
    tag = "videos",
    params(VideoListQuery),
    responses(
        (status = 200, description = "Page of videos", body = Object),
        (status = 400, description = "Invalid sort key or user id", body = ErrorResponse),
        (status = 404, description = "No video found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, params), fields(user_id = %user.user_id, operation = "list_videos"))]
pub async fn list_videos(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Query(params): Query<VideoListQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let owner_id = match optional_text(params.user_id.as_deref()) {
        Some(raw) => Some(parse_object_id(&raw, "user")?),
        None => None,
    };
    let sort = SortSpec::<VideoSortField>::from_raw(
        params.sort_by.as_deref(),
        params.sort_type.as_deref(),
    )?;
    let page = PageRequest::from_raw(
        params.page.as_deref(),
        params.limit.as_deref(),
        state.pagination_max_limit,
    );
    let filter = VideoFilter {
        query: optional_text(params.query.as_deref()),
        owner_id,
    };

    let videos = state.repos.videos.list(&filter, sort, page).await?;
    if videos.is_empty() {
        return Err(AppError::NotFound("No video found".to_string()).into());
    }

    Ok(ApiResponse::ok(videos, "Videos fetched successfully"))
}

#[utoipa::path(
    post,
    path = "/api/v1/videos",
    tag = "videos",
    request_body(content = PublishVideoForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Video published", body = Object),
        (status = 400, description = "Missing field or file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Upload failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %user.user_id, operation = "publish_video"))]
pub async fn publish_video(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    let mut form = read_upload_form(multipart, &state.uploads).await?;

    let (Some(title), Some(description)) = (
        optional_text(form.text("title")),
        optional_text(form.text("description")),
    ) else {
        return Err(AppError::Validation("Title and description both required".to_string()).into());
    };
    let video_file = form
        .take_file("videoFile")
        .ok_or_else(|| AppError::Validation("Video file is required".to_string()))?;
    let thumbnail = form
        .take_file("thumbnail")
        .ok_or_else(|| AppError::Validation("Thumbnail file is required".to_string()))?;

    let video_asset = store_file(&state, video_file, "Failed to upload video file").await?;
    let thumbnail_asset = match store_file(&state, thumbnail, "Failed to upload thumbnail").await {
        Ok(asset) => asset,
        Err(e) => {
            state
                .cleanup
                .remove_or_record(&video_asset.url, "thumbnail upload failed")
                .await;
            return Err(e.into());
        }
    };

    let new_video = NewVideo {
        title,
        description,
        owner_id: user.user_id,
        video_file: video_asset.url.clone(),
        thumbnail: thumbnail_asset.url.clone(),
        duration: video_asset.duration.unwrap_or(0.0),
    };

    let video = match state.repos.videos.create(new_video).await {
        Ok(video) => video,
        Err(e) => {
            for url in [&video_asset.url, &thumbnail_asset.url] {
                state.cleanup.remove_or_record(url, "video insert failed").await;
            }
            return Err(e.into());
        }
    };

    tracing::info!(video_id = %video.id, duration = video.duration, "Video published");

    Ok(ApiResponse::created(video, "Video published successfully").into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/videos/{videoId}",
    tag = "videos",
    params(("videoId" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video with owner profile", body = VideoDetails),
        (status = 400, description = "Invalid video id", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(operation = "get_video"))]
pub async fn get_video(
    _user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_object_id(&video_id, "video")?;

    let video = state
        .repos
        .videos
        .find_details(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

#[utoipa::path(
    patch,
    path = "/api/v1/videos/{videoId}",
    tag = "videos",
    params(("videoId" = String, Path, description = "Video ID")),
    request_body(content = UpdateVideoForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video updated, or nothing to update", body = Object),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 409, description = "Video changed concurrently", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, multipart), fields(user_id = %user.user_id, operation = "update_video"))]
pub async fn update_video(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, HttpAppError> {
    let id = parse_object_id(&video_id, "video")?;

    let video = state
        .repos
        .videos
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
    ensure_owner(&video, user.user_id, "update your own videos")?;

    let mut form = read_upload_form(multipart, &state.uploads).await?;

    let mut changes = VideoChanges {
        title: optional_text(form.text("title")).filter(|t| *t != video.title),
        description: optional_text(form.text("description"))
            .filter(|d| *d != video.description),
        thumbnail: None,
    };
    if let Some(file) = form.take_file("thumbnail") {
        let asset = store_file(&state, file, "Failed to upload thumbnail").await?;
        changes.thumbnail = Some(asset.url);
    }

    if changes.is_empty() {
        return Ok(ApiResponse::empty("Nothing to update").into_response());
    }

    let result = state
        .repos
        .videos
        .update_fields(id, user.user_id, &changes)
        .await
        .and_then(|updated| {
            updated.ok_or_else(|| AppError::Conflict("Video was deleted while updating".to_string()))
        });
    let updated = match result {
        Ok(updated) => updated,
        Err(e) => {
            if let Some(url) = &changes.thumbnail {
                state.cleanup.remove_or_record(url, "video update failed").await;
            }
            return Err(e.into());
        }
    };

    if changes.thumbnail.is_some() {
        state
            .cleanup
            .remove_or_record(&video.thumbnail, "thumbnail replaced")
            .await;
    }

    Ok(ApiResponse::ok(updated, "Video updated successfully").into_response())
}

#[utoipa::path(
    delete,
    path = "/api/v1/videos/{videoId}",
    tag = "videos",
    params(("videoId" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Video deleted", body = Object),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "delete_video"))]
pub async fn delete_video(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_object_id(&video_id, "video")?;

    let video = state
        .repos
        .videos
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
    ensure_owner(&video, user.user_id, "delete your own videos")?;

    let deleted = state
        .repos
        .videos
        .delete_owned(id, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    // Row first, then assets; a failed removal is recorded as an orphan
    for url in [&deleted.video_file, &deleted.thumbnail] {
        state.cleanup.remove_or_record(url, "video deleted").await;
    }

    tracing::info!(video_id = %id, "Video deleted");

    Ok(ApiResponse::empty("Video deleted successfully"))
}

#[utoipa::path(
    patch,
    path = "/api/v1/videos/{videoId}/publish",
    tag = "videos",
    params(("videoId" = String, Path, description = "Video ID")),
    responses(
        (status = 200, description = "Publish flag flipped", body = Object),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "toggle_publish"))]
pub async fn toggle_publish(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(video_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_object_id(&video_id, "video")?;

    let video = state
        .repos
        .videos
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
    ensure_owner(&video, user.user_id, "change the publish status of your own videos")?;

    let updated = state
        .repos
        .videos
        .toggle_publish(id, user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;

    Ok(ApiResponse::ok(updated, "Video publish status toggled successfully"))
}
