//! Test helpers: build the real router over the in-memory repositories and a
//! local media store in a temporary directory.
//!
//! Run from workspace root: `cargo test -p vidshare-api`.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;

use axum_test::TestServer;
use std::sync::Arc;
use tempfile::TempDir;
use vidshare_api::constants;
use vidshare_api::setup::routes;
use vidshare_api::state::{AppState, UploadConfig};
use vidshare_core::config::{BaseConfig, VidshareConfig};
use vidshare_core::models::UserProfile;
use vidshare_core::{Config, MediaBackend};
use vidshare_db::test_helpers::InMemoryDatabase;
use vidshare_db::Repositories;
use vidshare_storage::LocalMediaStore;

pub const MEDIA_BASE_URL: &str = "http://localhost:8000/media";
pub const PAGINATION_MAX_LIMIT: i64 = 100;
pub const MAX_UPLOAD_BYTES: usize = 64 * 1024;

/// API path prefix for tests (`/api/v1`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// A registered user and a token minted for them.
pub struct TestUser {
    pub profile: UserProfile,
    pub token: String,
}

impl TestUser {
    pub fn id(&self) -> String {
        self.profile.id.to_string()
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Test application: server, backing store and owned temp directories.
pub struct TestApp {
    pub server: TestServer,
    pub db: InMemoryDatabase,
    pub state: Arc<AppState>,
    pub media_dir: TempDir,
    pub _upload_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn add_user(&self, username: &str) -> TestUser {
        let profile = self.db.add_user(username, &format!("{} Test", username));
        let token = auth::mint_token(profile.id);
        TestUser { profile, token }
    }

    /// Publish a video through the API and return the created record.
    pub async fn publish_video(&self, user: &TestUser, title: &str) -> serde_json::Value {
        let response = self
            .server
            .post(&api_path("/videos"))
            .add_header("Authorization", user.bearer())
            .multipart(fixtures::publish_form(title, &format!("About {}", title)))
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<serde_json::Value>()["data"].clone()
    }

    /// Number of files the local media store currently holds.
    pub fn stored_file_count(&self) -> usize {
        fn count(dir: &std::path::Path) -> usize {
            std::fs::read_dir(dir)
                .map(|entries| {
                    entries
                        .flatten()
                        .map(|e| {
                            let path = e.path();
                            if path.is_dir() {
                                count(&path)
                            } else {
                                1
                            }
                        })
                        .sum()
                })
                .unwrap_or(0)
        }
        count(self.media_dir.path())
    }
}

pub fn test_config(media_path: &str) -> Config {
    Config(Box::new(VidshareConfig {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 1,
            db_timeout_seconds: 1,
            jwt_secret: auth::TEST_JWT_SECRET.to_string(),
            environment: "test".to_string(),
        },
        database_url: "postgres://localhost/vidshare_test".to_string(),
        pagination_max_limit: PAGINATION_MAX_LIMIT,
        max_upload_size_bytes: MAX_UPLOAD_BYTES,
        upload_temp_dir: None,
        media_backend: MediaBackend::Local,
        cloudinary_cloud_name: None,
        cloudinary_api_key: None,
        cloudinary_api_secret: None,
        local_media_path: Some(media_path.to_string()),
        local_media_base_url: Some(MEDIA_BASE_URL.to_string()),
        asset_cleanup_interval_secs: 0,
    }))
}

/// Setup test app with an empty in-memory store and local media storage.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(Repositories::in_memory).await
}

/// Like [`setup_test_app`], with repositories built over the in-memory store
/// by `repositories`, for tests that need to interpose on a repository.
pub async fn setup_test_app_with(
    repositories: impl FnOnce(InMemoryDatabase) -> Repositories,
) -> TestApp {
    let media_dir = tempfile::tempdir().expect("Failed to create media dir");
    let upload_dir = tempfile::tempdir().expect("Failed to create upload dir");
    let config = test_config(&media_dir.path().to_string_lossy());

    let store = LocalMediaStore::new(media_dir.path(), MEDIA_BASE_URL.to_string())
        .await
        .expect("Failed to create local media store");

    let db = InMemoryDatabase::new();
    let state = Arc::new(AppState::new(
        repositories(db.clone()),
        Arc::new(store),
        UploadConfig {
            temp_dir: upload_dir.path().to_path_buf(),
            max_file_size: MAX_UPLOAD_BYTES,
        },
        PAGINATION_MAX_LIMIT,
    ));

    let app = routes::setup_routes(&config, state.clone()).expect("Failed to build routes");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        db,
        state,
        media_dir,
        _upload_dir: upload_dir,
    }
}
