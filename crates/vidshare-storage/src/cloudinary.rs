//! Cloudinary backend.
//!
//! Uploads go to `{api_base}/{cloud}/auto/upload` so the store detects the
//! resource kind itself; deletes go to `{api_base}/{cloud}/{kind}/destroy`.
//! Both requests are signed with SHA-256 over the sorted parameters.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::Path;
use std::time::Duration;
use tokio_util::io::ReaderStream;

use crate::asset_url::AssetRef;
use crate::traits::{MediaStore, ResourceKind, StorageError, StorageResult, StoredAsset};
use crate::MediaBackend;

const DEFAULT_API_BASE: &str = "https://api.cloudinary.com/v1_1";
const REQUEST_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    resource_type: String,
    url: Option<String>,
    secure_url: Option<String>,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Debug, Deserialize)]
struct ErrorMessage {
    message: String,
}

#[derive(Clone)]
pub struct CloudinaryStore {
    client: reqwest::Client,
    api_base: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryStore {
    pub fn new(cloud_name: String, api_key: String, api_secret: String) -> StorageResult<Self> {
        Self::with_api_base(DEFAULT_API_BASE.to_string(), cloud_name, api_key, api_secret)
    }

    /// Point the client at a different API root (used against test servers).
    pub fn with_api_base(
        api_base: String,
        cloud_name: String,
        api_key: String,
        api_secret: String,
    ) -> StorageResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| StorageError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            cloud_name,
            api_key,
            api_secret,
        })
    }

    /// Sign a parameter set: `k1=v1&k2=v2` sorted by key, followed by the secret.
    fn sign(&self, params: &[(&str, String)]) -> String {
        let mut sorted: Vec<_> = params.iter().filter(|(_, v)| !v.is_empty()).collect();
        sorted.sort_by(|a, b| a.0.cmp(b.0));

        let joined = sorted
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn endpoint(&self, resource: &str, action: &str) -> String {
        format!("{}/{}/{}/{}", self.api_base, self.cloud_name, resource, action)
    }

    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(body) => format!("{}: {}", status, body.error.message),
            Err(_) => status.to_string(),
        }
    }
}

fn timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

#[async_trait]
impl MediaStore for CloudinaryStore {
    async fn upload(&self, local_path: &Path) -> StorageResult<StoredAsset> {
        let start = std::time::Instant::now();
        let file = tokio::fs::File::open(local_path)
            .await
            .map_err(|e| StorageError::NotFound(format!("{}: {}", local_path.display(), e)))?;
        let length = file.metadata().await?.len();

        let file_name = local_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        let timestamp = timestamp();
        let signature = self.sign(&[("timestamp", timestamp.clone())]);

        let body = reqwest::Body::wrap_stream(ReaderStream::new(file));
        let form = Form::new()
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature)
            .part("file", Part::stream_with_length(body, length).file_name(file_name));

        let response = self
            .client
            .post(self.endpoint("auto", "upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::UploadFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::UploadFailed(
                Self::error_message(response).await,
            ));
        }

        let uploaded: UploadResponse = response
            .json()
            .await
            .map_err(|e| StorageError::BackendError(format!("Unexpected upload response: {}", e)))?;

        let url = uploaded
            .secure_url
            .or(uploaded.url)
            .ok_or_else(|| StorageError::BackendError("Upload response has no URL".to_string()))?;

        let kind = if uploaded.resource_type == "video" {
            ResourceKind::Video
        } else {
            ResourceKind::Image
        };

        tracing::debug!(
            public_id = %uploaded.public_id,
            size_bytes = length,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Cloudinary upload successful"
        );

        Ok(StoredAsset {
            url,
            public_id: uploaded.public_id,
            kind,
            duration: uploaded.duration,
        })
    }

    async fn destroy(&self, asset: &AssetRef) -> StorageResult<()> {
        let timestamp = timestamp();
        let signature = self.sign(&[
            ("public_id", asset.public_id.clone()),
            ("timestamp", timestamp.clone()),
        ]);

        let form = Form::new()
            .text("public_id", asset.public_id.clone())
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("signature", signature);

        let response = self
            .client
            .post(self.endpoint(asset.kind.as_str(), "destroy"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StorageError::DeleteFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::DeleteFailed(
                Self::error_message(response).await,
            ));
        }

        let outcome: DestroyResponse = response
            .json()
            .await
            .map_err(|e| StorageError::BackendError(format!("Unexpected destroy response: {}", e)))?;

        match outcome.result.as_str() {
            "ok" | "not found" => {
                tracing::debug!(
                    public_id = %asset.public_id,
                    result = %outcome.result,
                    "Cloudinary destroy completed"
                );
                Ok(())
            }
            other => Err(StorageError::DeleteFailed(format!(
                "{}: {}",
                asset.public_id, other
            ))),
        }
    }

    fn backend(&self) -> MediaBackend {
        MediaBackend::Cloudinary
    }
}
