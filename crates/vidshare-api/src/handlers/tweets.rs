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
use vidshare_core::models::{Tweet, TweetRequest};
use vidshare_core::{ensure_owner, parse_object_id, require_text, AppError};

async fn load_tweet(state: &AppState, raw_id: &str) -> Result<Tweet, AppError> {
    let id = parse_object_id(raw_id, "tweet")?;
    state
        .repos
        .tweets
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound("Tweet not found".to_string()))
}

#[utoipa::path(
    post,
    path = "/api/v1/tweets",
    tag = "tweets",
    request_body = TweetRequest,
    responses(
        (status = 201, description = "Tweet created", body = Tweet),
        (status = 400, description = "Content is missing", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, request), fields(user_id = %user.user_id, operation = "create_tweet"))]
pub async fn create_tweet(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<TweetRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let content = require_text(request.content.as_deref(), "Content is missing")?;
    let tweet = state.repos.tweets.create(user.user_id, &content).await?;

    Ok(ApiResponse::created(tweet, "Tweet created successfully"))
}

#[utoipa::path(
    get,
    path = "/api/v1/tweets/user/{userId}",
    tag = "tweets",
    params(("userId" = String, Path, description = "Author ID"), PageQuery),
    responses(
        (status = 200, description = "Page of tweets, newest first, possibly empty", body = Object),
        (status = 400, description = "Invalid user id", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, params), fields(operation = "user_tweets"))]
pub async fn user_tweets(
    _user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    Query(params): Query<PageQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let owner_id = parse_object_id(&user_id, "user")?;
    let page = params.resolve(state.pagination_max_limit);

    let tweets = state.repos.tweets.list_for_owner(owner_id, page).await?;
    let message = if tweets.is_empty() {
        "No tweets posted yet"
    } else {
        "Tweets fetched successfully"
    };

    Ok(ApiResponse::ok(tweets, message))
}

#[utoipa::path(
    patch,
    path = "/api/v1/tweets/{tweetId}",
    tag = "tweets",
    params(("tweetId" = String, Path, description = "Tweet ID")),
    request_body = TweetRequest,
    responses(
        (status = 200, description = "Tweet updated, or nothing to update", body = Object),
        (status = 400, description = "Invalid id or empty content", body = ErrorResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Tweet not found", body = ErrorResponse),
        (status = 409, description = "Tweet changed concurrently", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, payload), fields(user_id = %user.user_id, operation = "update_tweet"))]
pub async fn update_tweet(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(tweet_id): Path<String>,
    payload: Result<Json<TweetRequest>, JsonRejection>,
) -> Result<Response, HttpAppError> {
    let tweet = load_tweet(&state, &tweet_id).await?;
    ensure_owner(&tweet, user.user_id, "update your own tweets")?;

    let request = validate_body(payload)?;
    let content = require_text(request.content.as_deref(), "Tweet content cannot be empty")?;
    if content == tweet.content {
        return Ok(ApiResponse::empty("Nothing to update").into_response());
    }

    let updated = state
        .repos
        .tweets
        .update_content(tweet.id, tweet.version, &content)
        .await?
        .ok_or_else(|| {
            AppError::Conflict("Tweet was modified concurrently, please retry".to_string())
        })?;

    Ok(ApiResponse::ok(updated, "Tweet updated successfully").into_response())
}

#[utoipa::path(
    delete,
    path = "/api/v1/tweets/{tweetId}",
    tag = "tweets",
    params(("tweetId" = String, Path, description = "Tweet ID")),
    responses(
        (status = 200, description = "Tweet deleted", body = Object),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Tweet not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "delete_tweet"))]
pub async fn delete_tweet(
    user: UserContext,
    State(state): State<Arc<AppState>>,
    Path(tweet_id): Path<String>,
) -> Result<impl IntoResponse, HttpAppError> {
    let tweet = load_tweet(&state, &tweet_id).await?;
    ensure_owner(&tweet, user.user_id, "delete your own tweets")?;

    if !state.repos.tweets.delete(tweet.id).await? {
        return Err(AppError::NotFound("Tweet not found".to_string()).into());
    }

    Ok(ApiResponse::empty("Tweet deleted successfully"))
}
