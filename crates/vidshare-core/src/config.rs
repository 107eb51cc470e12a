//! Configuration module
//!
//! Reads the server, database, authentication and media store settings from
//! the environment (after loading `.env` with dotenvy).

use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

const SERVER_PORT: u16 = 8000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const PAGINATION_MAX_LIMIT: i64 = 100;
const MAX_UPLOAD_SIZE_MB: usize = 500;
const ASSET_CLEANUP_INTERVAL_SECS: u64 = 300;

/// Where uploaded videos and thumbnails are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaBackend {
    Cloudinary,
    Local,
}

impl FromStr for MediaBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "cloudinary" => Ok(MediaBackend::Cloudinary),
            "local" => Ok(MediaBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid media backend: {}", s)),
        }
    }
}

impl Display for MediaBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            MediaBackend::Cloudinary => write!(f, "cloudinary"),
            MediaBackend::Local => write!(f, "local"),
        }
    }
}

/// Server and database settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub environment: String,
}

/// Full application settings
#[derive(Clone, Debug)]
pub struct VidshareConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub pagination_max_limit: i64,
    pub max_upload_size_bytes: usize,
    pub upload_temp_dir: Option<String>,
    // Media store
    pub media_backend: MediaBackend,
    pub cloudinary_cloud_name: Option<String>,
    pub cloudinary_api_key: Option<String>,
    pub cloudinary_api_secret: Option<String>,
    pub local_media_path: Option<String>,
    pub local_media_base_url: Option<String>,
    /// Seconds between orphaned-asset cleanup runs. 0 = disabled.
    pub asset_cleanup_interval_secs: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<VidshareConfig>);

impl Config {
    fn inner(&self) -> &VidshareConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = VidshareConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.inner().validate()
    }

    pub fn is_production(&self) -> bool {
        is_production(&self.inner().base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.inner().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.inner().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.inner().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.inner().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.inner().base.jwt_secret
    }

    pub fn environment(&self) -> &str {
        &self.inner().base.environment
    }

    pub fn database_url(&self) -> &str {
        &self.inner().database_url
    }

    pub fn pagination_max_limit(&self) -> i64 {
        self.inner().pagination_max_limit
    }

    pub fn max_upload_size_bytes(&self) -> usize {
        self.inner().max_upload_size_bytes
    }

    pub fn upload_temp_dir(&self) -> Option<&str> {
        self.inner().upload_temp_dir.as_deref()
    }

    pub fn media_backend(&self) -> MediaBackend {
        self.inner().media_backend
    }

    pub fn cloudinary_cloud_name(&self) -> Option<&str> {
        self.inner().cloudinary_cloud_name.as_deref()
    }

    pub fn cloudinary_api_key(&self) -> Option<&str> {
        self.inner().cloudinary_api_key.as_deref()
    }

    pub fn cloudinary_api_secret(&self) -> Option<&str> {
        self.inner().cloudinary_api_secret.as_deref()
    }

    pub fn local_media_path(&self) -> Option<&str> {
        self.inner().local_media_path.as_deref()
    }

    pub fn local_media_base_url(&self) -> Option<&str> {
        self.inner().local_media_base_url.as_deref()
    }

    pub fn asset_cleanup_interval_secs(&self) -> u64 {
        self.inner().asset_cleanup_interval_secs
    }
}

fn is_production(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl VidshareConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins: Vec<String> = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable is required"))?;

        let media_backend = match env_opt("MEDIA_BACKEND") {
            Some(raw) => raw.parse::<MediaBackend>()?,
            None => MediaBackend::Cloudinary,
        };

        let max_upload_size_mb = env_parse("MAX_UPLOAD_SIZE_MB", MAX_UPLOAD_SIZE_MB);

        Ok(VidshareConfig {
            base: BaseConfig {
                server_port: env_parse("PORT", SERVER_PORT),
                cors_origins,
                db_max_connections: env_parse("DB_MAX_CONNECTIONS", MAX_CONNECTIONS),
                db_timeout_seconds: env_parse("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
                jwt_secret,
                environment,
            },
            database_url,
            pagination_max_limit: env_parse("PAGINATION_MAX_LIMIT", PAGINATION_MAX_LIMIT),
            max_upload_size_bytes: max_upload_size_mb * 1024 * 1024,
            upload_temp_dir: env_opt("UPLOAD_TEMP_DIR"),
            media_backend,
            cloudinary_cloud_name: env_opt("CLOUDINARY_CLOUD_NAME"),
            cloudinary_api_key: env_opt("CLOUDINARY_API_KEY"),
            cloudinary_api_secret: env_opt("CLOUDINARY_API_SECRET"),
            local_media_path: env_opt("LOCAL_MEDIA_PATH"),
            local_media_base_url: env_opt("LOCAL_MEDIA_BASE_URL"),
            asset_cleanup_interval_secs: env_parse(
                "ASSET_CLEANUP_INTERVAL_SECS",
                ASSET_CLEANUP_INTERVAL_SECS,
            ),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if is_production(&self.base.environment)
            && self.base.cors_origins.iter().any(|o| o == "*")
        {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if self.pagination_max_limit < 1 {
            return Err(anyhow::anyhow!("PAGINATION_MAX_LIMIT must be at least 1"));
        }

        if self.max_upload_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_UPLOAD_SIZE_MB must be at least 1"));
        }

        match self.media_backend {
            MediaBackend::Cloudinary => {
                if self.cloudinary_cloud_name.is_none()
                    || self.cloudinary_api_key.is_none()
                    || self.cloudinary_api_secret.is_none()
                {
                    return Err(anyhow::anyhow!(
                        "MEDIA_BACKEND=cloudinary requires CLOUDINARY_CLOUD_NAME, CLOUDINARY_API_KEY and CLOUDINARY_API_SECRET"
                    ));
                }
            }
            MediaBackend::Local => {
                if self.local_media_path.is_none() || self.local_media_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "MEDIA_BACKEND=local requires LOCAL_MEDIA_PATH and LOCAL_MEDIA_BASE_URL"
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> VidshareConfig {
        VidshareConfig {
            base: BaseConfig {
                server_port: 8000,
                cors_origins: vec!["*".to_string()],
                db_max_connections: 5,
                db_timeout_seconds: 5,
                jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
                environment: "development".to_string(),
            },
            database_url: "postgres://localhost/vidshare".to_string(),
            pagination_max_limit: 100,
            max_upload_size_bytes: 1024,
            upload_temp_dir: None,
            media_backend: MediaBackend::Local,
            cloudinary_cloud_name: None,
            cloudinary_api_key: None,
            cloudinary_api_secret: None,
            local_media_path: Some("/tmp/media".to_string()),
            local_media_base_url: Some("http://localhost:8000/media".to_string()),
            asset_cleanup_interval_secs: 0,
        }
    }

    #[test]
    fn test_valid_local_config() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut config = sample();
        config.base.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        let mut config = sample();
        config.base.environment = "production".to_string();
        assert!(config.validate().is_err());

        config.base.cors_origins = vec!["https://app.example.com".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_cloudinary_requires_all_credentials() {
        let mut config = sample();
        config.media_backend = MediaBackend::Cloudinary;
        config.cloudinary_cloud_name = Some("demo".to_string());
        config.cloudinary_api_key = Some("key".to_string());
        assert!(config.validate().is_err());

        config.cloudinary_api_secret = Some("secret".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_media_backend_parsing() {
        assert_eq!(
            "Cloudinary".parse::<MediaBackend>().unwrap(),
            MediaBackend::Cloudinary
        );
        assert_eq!(" local ".parse::<MediaBackend>().unwrap(), MediaBackend::Local);
        assert!("s3".parse::<MediaBackend>().is_err());
        assert_eq!(MediaBackend::Local.to_string(), "local");
    }
}
