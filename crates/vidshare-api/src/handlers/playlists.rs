//! Playlist handlers
//!
//! Playlists are private: only the owner can read them, and reads by anyone
//! else look the same as a missing playlist.

use crate::auth::UserContext;
use crate::error::{validate_body, ErrorResponse, HttpAppError, ValidatedJson};
use crate::response::ApiResponse;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use vidshare_core::models::{MembershipChange, Playlist, PlaylistRequest};
use vidshare_core::{ensure_owner, optional_text, parse_object_id, require_text, AppError};

fn playlist_missing() -> AppError {
    AppError::NotFound("Playlist not found".to_string())
}

async fn load_playlist(state: &AppState, id: Uuid) -> Result<Playlist, AppError> {
    state
        .repos
        .playlists
        .find_by_id(id)
        .await?
        .ok_or_else(playlist_missing)
}

/// Parse both ids of a membership route and load the caller's playlist.
async fn load_owned_for_membership(
    state: &AppState,
    user: UserContext,
    playlist_id: &str,
    video_id: &str,
) -> Result<(Playlist, Uuid), AppError> {
    let playlist_id = parse_object_id(playlist_id, "playlist")?;
    let video_id = parse_object_id(video_id, "video")?;

    let playlist = load_playlist(state, playlist_id).await?;
    ensure_owner(&playlist, user.user_id, "modify your own playlists")?;

    Ok((playlist, video_id))
}

#[utoipa::path(
    post,
    path = "/api/v1/playlists",
    tag = "playlists",
    request_body = PlaylistRequest,
    responses(
        (status = 201, description = "Playlist created", body = Playlist),
        (status = 400, description = "Missing name or description", body = ErrorResponse),
        (status = 409, description = "A playlist with this name already exists", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %user.user_id, operation = "create_playlist"))]
pub async fn create_playlist(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<PlaylistRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let name = require_text(request.name.as_deref(), "Playlist name cannot be empty")?;
    let description = require_text(request.description.as_deref(), "Description cannot be empty")?;

    let playlist = state
        .repos
        .playlists
        .create(user.user_id, &name, &description)
        .await?;

    Ok(ApiResponse::created(playlist, "Playlist created successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/playlists/user/{userId}",
    tag = "playlists",
    params(("userId" = String, Path, description = "Owner ID, must be the caller")),
    responses(
        (status = 200, description = "The caller's playlists", body = [Playlist]),
        (status = 400, description = "Invalid user id", body = ErrorResponse),
        (status = 403, description = "Not the caller's own playlists", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "user_playlists"))]
pub async fn user_playlists(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(owner_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let owner_id = parse_object_id(&owner_id, "user")?;
    if owner_id != user.user_id {
        return Err(AppError::Forbidden("You can only view your own playlists".to_string()).into());
    }

    let playlists = state.repos.playlists.list_for_owner(owner_id).await?;

    Ok(ApiResponse::ok(playlists, "User playlists fetched successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/playlists/{playlistId}",
    tag = "playlists",
    params(("playlistId" = String, Path, description = "Playlist ID")),
    responses(
        (status = 200, description = "Playlist found", body = Playlist),
        (status = 400, description = "Invalid playlist id", body = ErrorResponse),
        (status = 404, description = "Playlist missing or not the caller's", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "get_playlist"))]
pub async fn get_playlist(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(playlist_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_object_id(&playlist_id, "playlist")?;

    let playlist = state
        .repos
        .playlists
        .find_by_id(id)
        .await?
        .filter(|p| p.owner_id == user.user_id)
        .ok_or_else(|| {
            AppError::NotFound(
                "Playlist does not exist or you do not have access to it".to_string(),
            )
        })?;

    Ok(ApiResponse::ok(playlist, "Playlist fetched successfully"))
}

#[utoipa::path(
    patch,
    path = "/api/v1/playlists/{playlistId}",
    tag = "playlists",
    params(("playlistId" = String, Path, description = "Playlist ID")),
    request_body = PlaylistRequest,
    responses(
        (status = 200, description = "Playlist updated, or nothing to update", body = Object),
        (status = 400, description = "Neither name nor description given", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Playlist not found", body = ErrorResponse),
        (status = 409, description = "Name taken, or playlist changed concurrently", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id, operation = "update_playlist"))]
pub async fn update_playlist(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(playlist_id): Path<String>,
    payload: Result<Json<PlaylistRequest>, JsonRejection>,
) -> Result<Response, HttpAppError> {
    let id = parse_object_id(&playlist_id, "playlist")?;
    let playlist = load_playlist(&state, id).await?;
    ensure_owner(&playlist, user.user_id, "update your own playlists")?;

    let request = validate_body(payload)?;
    let name = optional_text(request.name.as_deref());
    let description = optional_text(request.description.as_deref());
    if name.is_none() && description.is_none() {
        return Err(AppError::Validation(
            "At least one of 'name' or 'description' must be provided".to_string(),
        )
        .into());
    }

    let name = name.filter(|n| *n != playlist.name);
    let description = description.filter(|d| *d != playlist.description);
    if name.is_none() && description.is_none() {
        return Ok(ApiResponse::empty("Nothing to update").into_response());
    }

    let updated = state
        .repos
        .playlists
        .update(id, playlist.version, name.as_deref(), description.as_deref())
        .await?
        .ok_or_else(|| {
            AppError::Conflict("Playlist was modified concurrently, please retry".to_string())
        })?;

    Ok(ApiResponse::ok(updated, "Playlist updated successfully").into_response())
}

#[utoipa::path(
    delete,
    path = "/api/v1/playlists/{playlistId}",
    tag = "playlists",
    params(("playlistId" = String, Path, description = "Playlist ID")),
    responses(
        (status = 200, description = "Playlist deleted", body = Object),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Playlist not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "delete_playlist"))]
pub async fn delete_playlist(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(playlist_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let id = parse_object_id(&playlist_id, "playlist")?;
    let playlist = load_playlist(&state, id).await?;
    ensure_owner(&playlist, user.user_id, "delete your own playlists")?;

    if !state.repos.playlists.delete(id).await? {
        return Err(playlist_missing().into());
    }

    Ok(ApiResponse::empty("Playlist deleted successfully"))
}

#[utoipa::path(
    post,
    path = "/api/v1/playlists/{playlistId}/videos/{videoId}",
    tag = "playlists",
    params(
        ("playlistId" = String, Path, description = "Playlist ID"),
        ("videoId" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video added", body = Object),
        (status = 400, description = "Invalid id", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Playlist or video not found", body = ErrorResponse),
        (status = 409, description = "Video is already in the playlist", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "add_video_to_playlist"))]
pub async fn add_video(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path((playlist_id, video_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (playlist, video_id) =
        load_owned_for_membership(&state, user, &playlist_id, &video_id).await?;

    if !state.repos.videos.exists(video_id).await? {
        return Err(AppError::NotFound("Video not found".to_string()).into());
    }

    match state.repos.playlists.add_video(playlist.id, video_id).await? {
        MembershipChange::Applied => Ok(ApiResponse::empty("Video added to playlist")),
        MembershipChange::Unchanged => {
            Err(AppError::Conflict("Video is already in the playlist".to_string()).into())
        }
        MembershipChange::PlaylistMissing => Err(playlist_missing().into()),
    }
}

#[utoipa::path(
    delete,
    path = "/api/v1/playlists/{playlistId}/videos/{videoId}",
    tag = "playlists",
    params(
        ("playlistId" = String, Path, description = "Playlist ID"),
        ("videoId" = String, Path, description = "Video ID")
    ),
    responses(
        (status = 200, description = "Video removed", body = Object),
        (status = 400, description = "Invalid id, or video not in the playlist", body = ErrorResponse),
        (status = 403, description = "Not the owner", body = ErrorResponse),
        (status = 404, description = "Playlist not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "remove_video_from_playlist"))]
pub async fn remove_video(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path((playlist_id, video_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpAppError> {
    let (playlist, video_id) =
        load_owned_for_membership(&state, user, &playlist_id, &video_id).await?;

    match state.repos.playlists.remove_video(playlist.id, video_id).await? {
        MembershipChange::Applied => Ok(ApiResponse::empty("Video removed from playlist")),
        MembershipChange::Unchanged => {
            Err(AppError::Validation("Video is not in the playlist".to_string()).into())
        }
        MembershipChange::PlaylistMissing => Err(playlist_missing().into()),
    }
}
