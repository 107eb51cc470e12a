//! Tweet API integration tests.

mod helpers;

use axum::http::StatusCode;
use helpers::{api_path, setup_test_app, TestApp, TestUser};
use serde_json::{json, Value};

async fn user_tweets(app: &TestApp, viewer: &TestUser, author: &TestUser) -> Value {
    let response = app
        .client()
        .get(&api_path(&format!("/tweets/user/{}", author.id())))
        .add_header("Authorization", viewer.bearer())
        .await;
    response.assert_status_ok();
    response.json::<Value>()["data"].clone()
}

#[tokio::test]
async fn test_tweet_lifecycle() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");
    let bob = app.add_user("bob");

    let response = app
        .client()
        .post(&api_path("/tweets"))
        .add_header("Authorization", alice.bearer())
        .json(&json!({ "content": "hello" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let tweet = response.json::<Value>()["data"].clone();
    let path = api_path(&format!("/tweets/{}", tweet["_id"].as_str().unwrap()));

    let page = user_tweets(&app, &bob, &alice).await;
    assert_eq!(page["totalDocs"], 1);
    assert_eq!(page["docs"][0]["content"], "hello");

    let response = app
        .client()
        .patch(&path)
        .add_header("Authorization", bob.bearer())
        .json(&json!({ "content": "hijacked" }))
        .await;
    response.assert_status(StatusCode::FORBIDDEN);

    let response = app
        .client()
        .patch(&path)
        .add_header("Authorization", alice.bearer())
        .json(&json!({ "content": "" }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["message"],
        "Tweet content cannot be empty"
    );
    let page = user_tweets(&app, &alice, &alice).await;
    assert_eq!(page["docs"][0]["content"], "hello");

    let response = app
        .client()
        .delete(&path)
        .add_header("Authorization", alice.bearer())
        .await;
    response.assert_status_ok();

    let page = user_tweets(&app, &alice, &alice).await;
    assert_eq!(page["docs"], json!([]));
    assert_eq!(page["totalDocs"], 0);
}

#[tokio::test]
async fn test_create_tweet_requires_content() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");

    for body in [json!({}), json!({ "content": "   " })] {
        let response = app
            .client()
            .post(&api_path("/tweets"))
            .add_header("Authorization", alice.bearer())
            .json(&body)
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], "Content is missing");
    }

    let response = app
        .client()
        .post(&api_path("/tweets"))
        .add_header("Authorization", alice.bearer())
        .json(&json!({ "content": "x".repeat(281) }))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_tweet_same_content_is_noop() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");

    let tweet = app
        .client()
        .post(&api_path("/tweets"))
        .add_header("Authorization", alice.bearer())
        .json(&json!({ "content": "hello" }))
        .await
        .json::<Value>()["data"]
        .clone();

    let response = app
        .client()
        .patch(&api_path(&format!("/tweets/{}", tweet["_id"].as_str().unwrap())))
        .add_header("Authorization", alice.bearer())
        .json(&json!({ "content": " hello " }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["message"], "Nothing to update");
}

#[tokio::test]
async fn test_user_tweets_pagination_is_clamped() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");

    for i in 0..3 {
        app.client()
            .post(&api_path("/tweets"))
            .add_header("Authorization", alice.bearer())
            .json(&json!({ "content": format!("tweet {}", i) }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let fetch = |query: &'static str| {
        app.client()
            .get(&api_path(&format!("/tweets/user/{}{}", alice.id(), query)))
            .add_header("Authorization", alice.bearer())
    };

    let defaults = fetch("").await.json::<Value>()["data"].clone();
    let invalid = fetch("?page=0&limit=-5").await.json::<Value>()["data"].clone();
    assert_eq!(defaults, invalid);
    assert_eq!(defaults["page"], 1);
    assert_eq!(defaults["limit"], 10);

    let clamped = fetch("?limit=1000").await.json::<Value>()["data"].clone();
    assert_eq!(clamped["limit"], helpers::PAGINATION_MAX_LIMIT);
    assert_eq!(clamped["docs"][0]["content"], "tweet 2");
}

#[tokio::test]
async fn test_tweet_routes_reject_malformed_ids() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");

    let responses = [
        app.client()
            .get(&api_path("/tweets/user/alice"))
            .add_header("Authorization", alice.bearer())
            .await,
        app.client()
            .patch(&api_path("/tweets/0000"))
            .add_header("Authorization", alice.bearer())
            .json(&json!({ "content": "x" }))
            .await,
        app.client()
            .delete(&api_path("/tweets/0000"))
            .add_header("Authorization", alice.bearer())
            .await,
    ];

    for response in responses {
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["code"], "INVALID_IDENTIFIER");
    }
}

#[tokio::test]
async fn test_user_tweets_with_huge_page_number() {
    let app = setup_test_app().await;
    let alice = app.add_user("alice");

    let response = app
        .client()
        .get(&api_path(&format!(
            "/tweets/user/{}?page=9223372036854775807",
            alice.id()
        )))
        .add_header("Authorization", alice.bearer())
        .await;

    response.assert_status_ok();
    let page = response.json::<Value>()["data"].clone();
    assert_eq!(page["docs"], json!([]));
    assert_eq!(page["page"], i64::MAX);
    assert_eq!(page["pagingCounter"], i64::MAX);
}
