//! Video API integration tests.
//!
//! Run with: `cargo test -p vidshare-api --test videos_test`

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::MultipartForm;
use helpers::{api_path, fixtures, setup_test_app, MEDIA_BASE_URL};
use serde_json::Value;

#[tokio::test]
async fn test_publish_video_stores_both_assets() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");

    let video = app.publish_video(&alice, "First clip").await;

    assert_eq!(video["title"], "First clip");
    assert_eq!(video["owner"], alice.id());
    assert_eq!(video["isPublished"], true);
    let video_file = video["videoFile"].as_str().unwrap();
    let thumbnail = video["thumbnail"].as_str().unwrap();
    assert!(video_file.starts_with(&format!("{}/video/upload/v", MEDIA_BASE_URL)));
    assert!(video_file.ends_with(".mp4"));
    assert!(thumbnail.starts_with(&format!("{}/image/upload/v", MEDIA_BASE_URL)));
    assert_eq!(app.stored_file_count(), 2);

    // Spooled uploads never outlive the request
    let leftovers = std::fs::read_dir(&app.state.uploads.temp_dir).unwrap().count();
    assert_eq!(leftovers, 0);
}

#[tokio::test]
async fn test_publish_video_requires_fields_and_files() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");

    let blank_title = MultipartForm::new()
        .add_text("title", "   ")
        .add_text("description", "desc")
        .add_part("videoFile", fixtures::video_part())
        .add_part("thumbnail", fixtures::thumbnail_part());
    let response = app
        .client()
        .post(&api_path("/videos"))
        .add_header("Authorization", alice.bearer())
        .multipart(blank_title)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Title and description both required"
    );

    let no_thumbnail = MultipartForm::new()
        .add_text("title", "Clip")
        .add_text("description", "desc")
        .add_part("videoFile", fixtures::video_part());
    let response = app
        .client()
        .post(&api_path("/videos"))
        .add_header("Authorization", alice.bearer())
        .multipart(no_thumbnail)
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Thumbnail file is required");

    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn test_oversized_upload_rejected() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");

    let huge = axum_test::multipart::Part::bytes(vec![0u8; helpers::MAX_UPLOAD_BYTES + 1])
        .file_name("big.mp4")
        .mime_type("video/mp4");
    let form = MultipartForm::new()
        .add_text("title", "Big")
        .add_text("description", "Too big")
        .add_part("videoFile", huge)
        .add_part("thumbnail", fixtures::thumbnail_part());

    let response = app
        .client()
        .post(&api_path("/videos"))
        .add_header("Authorization", alice.bearer())
        .multipart(form)
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(app.stored_file_count(), 0);
}

#[tokio::test]
async fn test_list_videos_empty_is_not_found() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");

    let response = app
        .client()
        .get(&api_path("/videos"))
        .add_header("Authorization", alice.bearer())
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["message"], "No video found");
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_list_videos_paginates_filters_and_sorts() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");
    let bob = app.add_user("bob");

    app.publish_video(&alice, "Cooking pasta").await;
    app.publish_video(&alice, "Baking bread").await;
    app.publish_video(&bob, "Cooking rice").await;

    let response = app
        .client()
        .get(&api_path("/videos?page=1&limit=2"))
        .add_header("Authorization", alice.bearer())
        .await;
    response.assert_status_ok();
    let page = &response.json::<Value>()["data"];
    assert_eq!(page["docs"].as_array().unwrap().len(), 2);
    assert_eq!(page["totalDocs"], 3);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["hasNextPage"], true);
    // Newest first by default
    assert_eq!(page["docs"][0]["title"], "Cooking rice");

    let response = app
        .client()
        .get(&api_path("/videos?query=COOKING&sortBy=title&sortType=asc"))
        .add_header("Authorization", alice.bearer())
        .await;
    response.assert_status_ok();
    let docs = response.json::<Value>()["data"]["docs"].clone();
    let titles: Vec<&str> = docs
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Cooking pasta", "Cooking rice"]);

    let response = app
        .client()
        .get(&api_path(&format!("/videos?userId={}", bob.id())))
        .add_header("Authorization", alice.bearer())
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["totalDocs"], 1);
}

#[tokio::test]
async fn test_list_videos_rejects_unlisted_sort_key_and_bad_user_id() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");
    app.publish_video(&alice, "Clip").await;

    let response = app
        .client()
        .get(&api_path("/videos?sortBy=password"))
        .add_header("Authorization", alice.bearer())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["code"], "VALIDATION_ERROR");

    let response = app
        .client()
        .get(&api_path("/videos?userId=12345"))
        .add_header("Authorization", alice.bearer())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["message"], "Invalid user id");
}

#[tokio::test]
async fn test_get_video_includes_owner_profile() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");
    let video = app.publish_video(&alice, "Clip").await;

    let response = app
        .client()
        .get(&api_path(&format!("/videos/{}", video["_id"].as_str().unwrap())))
        .add_header("Authorization", alice.bearer())
        .await;

    response.assert_status_ok();
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["title"], "Clip");
    assert_eq!(data["username"], "alice");
    assert_eq!(data["email"], "alice@example.com");
}

#[tokio::test]
async fn test_get_video_malformed_and_unknown_ids() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");

    let response = app
        .client()
        .get(&api_path("/videos/not-an-id"))
        .add_header("Authorization", alice.bearer())
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], "INVALID_IDENTIFIER");
    assert_eq!(body["message"], "Invalid video id");

    let response = app
        .client()
        .get(&api_path(&format!("/videos/{}", uuid::Uuid::new_v4())))
        .add_header("Authorization", alice.bearer())
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_video_by_non_owner_is_forbidden() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");
    let bob = app.add_user("bob");
    let video = app.publish_video(&alice, "Clip").await;

    let response = app
        .client()
        .patch(&api_path(&format!("/videos/{}", video["_id"].as_str().unwrap())))
        .add_header("Authorization", bob.bearer())
        .multipart(MultipartForm::new().add_text("title", "Stolen"))
        .await;

    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(
        response.json::<Value>()["message"],
        "You can only update your own videos"
    );
}

#[tokio::test]
async fn test_update_video_fields_and_noop() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");
    let video = app.publish_video(&alice, "Clip").await;
    let path = api_path(&format!("/videos/{}", video["_id"].as_str().unwrap()));

    let response = app
        .client()
        .patch(&path)
        .add_header("Authorization", alice.bearer())
        .multipart(MultipartForm::new().add_text("title", "Clip").add_text("description", "  "))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Nothing to update");
    assert_eq!(body["data"], serde_json::json!({}));

    let response = app
        .client()
        .patch(&path)
        .add_header("Authorization", alice.bearer())
        .multipart(MultipartForm::new().add_text("title", "  Renamed  "))
        .await;
    response.assert_status_ok();
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["title"], "Renamed");
    assert_eq!(data["description"], video["description"]);
}

#[tokio::test]
async fn test_update_thumbnail_removes_previous_asset() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");
    let video = app.publish_video(&alice, "Clip").await;

    let response = app
        .client()
        .patch(&api_path(&format!("/videos/{}", video["_id"].as_str().unwrap())))
        .add_header("Authorization", alice.bearer())
        .multipart(MultipartForm::new().add_part("thumbnail", fixtures::thumbnail_part()))
        .await;

    response.assert_status_ok();
    let data = &response.json::<Value>()["data"];
    assert_ne!(data["thumbnail"], video["thumbnail"]);
    assert_eq!(app.stored_file_count(), 2);
    assert!(app.db.orphaned_assets().is_empty());
}

#[tokio::test]
async fn test_delete_video_removes_row_and_assets() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");
    let bob = app.add_user("bob");
    let video = app.publish_video(&alice, "Clip").await;
    let path = api_path(&format!("/videos/{}", video["_id"].as_str().unwrap()));

    let response = app
        .client()
        .delete(&path)
        .add_header("Authorization", bob.bearer())
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
    assert_eq!(app.stored_file_count(), 2);

    let response = app
        .client()
        .delete(&path)
        .add_header("Authorization", alice.bearer())
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["message"], "Video deleted successfully");
    assert_eq!(app.stored_file_count(), 0);
    assert!(app.db.orphaned_assets().is_empty());

    let response = app
        .client()
        .get(&path)
        .add_header("Authorization", alice.bearer())
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_toggle_publish_flips_flag() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");
    let bob = app.add_user("bob");
    let video = app.publish_video(&alice, "Clip").await;
    let path = api_path(&format!("/videos/{}/publish", video["_id"].as_str().unwrap()));

    let response = app
        .client()
        .patch(&path)
        .add_header("Authorization", alice.bearer())
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["isPublished"], false);

    let response = app
        .client()
        .patch(&path)
        .add_header("Authorization", alice.bearer())
        .await;
    assert_eq!(response.json::<Value>()["data"]["isPublished"], true);

    let response = app
        .client()
        .patch(&path)
        .add_header("Authorization", bob.bearer())
        .await;
    response.assert_status(StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_requests_without_token_are_unauthorized() {
    let app = setup_test_app().await;

    let response = app.client().get(&api_path("/videos")).await;
    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(response.json::<Value>()["code"], "UNAUTHORIZED");

    let response = app
        .client()
        .get(&api_path("/videos"))
        .add_header("Authorization", "Bearer not.a.jwt")
        .await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}
