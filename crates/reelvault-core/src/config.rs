//! Configuration module
//!
//! Settings are read once from the environment (and an optional `.env` file)
//! at startup. Validation failures abort startup instead of surfacing per request.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{BYTES_PER_MB, DEV_PLATFORM};
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 10;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MAX_VIDEO_SIZE_MB: usize = 1024;
const MAX_THUMBNAIL_SIZE_MB: usize = 10;
const PROCESSING_TIMEOUT_SECS: u64 = 600;

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub environment: String,
    /// `dev` enables destructive helpers such as the reset endpoint
    pub platform: String,
}

/// Ingestion settings: staging, durable store and media tools
#[derive(Clone, Debug)]
pub struct IngestConfig {
    pub base: BaseConfig,
    pub database_url: String,
    pub assets_root: PathBuf,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // S3-compatible providers (MinIO, Spaces, ...)
    pub s3_cf_distribution: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Media tools
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    pub processing_timeout_secs: u64,
    // Limits
    pub max_video_size_bytes: usize,
    pub max_thumbnail_size_bytes: usize,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<IngestConfig>);

impl Config {
    fn as_ingest(&self) -> &IngestConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.as_ingest().base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn is_dev_platform(&self) -> bool {
        self.as_ingest().base.platform.eq_ignore_ascii_case(DEV_PLATFORM)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = IngestConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_ingest().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_ingest().base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_ingest().base.jwt_secret
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_ingest().base.cors_origins
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_ingest().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_ingest().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> &str {
        &self.as_ingest().database_url
    }

    pub fn assets_root(&self) -> &PathBuf {
        &self.as_ingest().assets_root
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_ingest().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_ingest().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_ingest().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_ingest().s3_endpoint.as_deref()
    }

    pub fn s3_cf_distribution(&self) -> Option<&str> {
        self.as_ingest().s3_cf_distribution.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_ingest().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_ingest().local_storage_base_url.as_deref()
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.as_ingest().ffprobe_path
    }

    pub fn ffmpeg_path(&self) -> &str {
        &self.as_ingest().ffmpeg_path
    }

    pub fn processing_timeout(&self) -> Duration {
        Duration::from_secs(self.as_ingest().processing_timeout_secs)
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.as_ingest().max_video_size_bytes
    }

    pub fn max_thumbnail_size_bytes(&self) -> usize {
        self.as_ingest().max_thumbnail_size_bytes
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, anyhow::Error> {
    parse_or(key, env::var(key).ok(), default)
}

/// Parse `raw` if present and non-blank, otherwise return `default`.
fn parse_or<T: std::str::FromStr>(
    key: &str,
    raw: Option<String>,
    default: T,
) -> Result<T, anyhow::Error> {
    match raw.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => value
            .parse()
            .map_err(|_| anyhow::anyhow!("{} must be a valid number, got {:?}", key, value)),
        None => Ok(default),
    }
}

fn megabytes(key: &str, mb: usize) -> Result<usize, anyhow::Error> {
    mb.checked_mul(BYTES_PER_MB)
        .ok_or_else(|| anyhow::anyhow!("{} is too large", key))
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl IngestConfig {
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

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", MAX_CONNECTIONS)?,
            db_timeout_seconds: env_or("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS)?,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable not set"))?,
            environment,
            platform: env::var("PLATFORM").unwrap_or_else(|_| DEV_PLATFORM.to_string()),
        };

        let storage_backend = match env_opt("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };

        Ok(IngestConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable not set"))?,
            assets_root: PathBuf::from(
                env_opt("ASSETS_ROOT").unwrap_or_else(|| "./assets".to_string()),
            ),
            storage_backend,
            s3_bucket: env_opt("S3_BUCKET"),
            s3_region: env_opt("S3_REGION").or_else(|| env_opt("AWS_REGION")),
            s3_endpoint: env_opt("S3_ENDPOINT"),
            s3_cf_distribution: env_opt("S3_CF_DISTRIBUTION"),
            local_storage_path: env_opt("LOCAL_STORAGE_PATH"),
            local_storage_base_url: env_opt("LOCAL_STORAGE_BASE_URL"),
            ffprobe_path: env_opt("FFPROBE_PATH").unwrap_or_else(|| "ffprobe".to_string()),
            ffmpeg_path: env_opt("FFMPEG_PATH").unwrap_or_else(|| "ffmpeg".to_string()),
            processing_timeout_secs: env_or("PROCESSING_TIMEOUT_SECS", PROCESSING_TIMEOUT_SECS)?,
            max_video_size_bytes: megabytes(
                "MAX_VIDEO_SIZE_MB",
                env_or("MAX_VIDEO_SIZE_MB", MAX_VIDEO_SIZE_MB)?,
            )?,
            max_thumbnail_size_bytes: megabytes(
                "MAX_THUMBNAIL_SIZE_MB",
                env_or("MAX_THUMBNAIL_SIZE_MB", MAX_THUMBNAIL_SIZE_MB)?,
            )?,
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !self.database_url.starts_with("postgresql://")
            && !self.database_url.starts_with("postgres://")
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.max_video_size_bytes == 0 || self.max_thumbnail_size_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }

        if self.processing_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "PROCESSING_TIMEOUT_SECS must be greater than zero"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
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

    fn sample() -> IngestConfig {
        IngestConfig {
            base: BaseConfig {
                server_port: 8091,
                cors_origins: vec!["*".to_string()],
                db_max_connections: 5,
                db_timeout_seconds: 5,
                jwt_secret: "a".repeat(32),
                environment: "development".to_string(),
                platform: "dev".to_string(),
            },
            database_url: "postgres://localhost/reelvault".to_string(),
            assets_root: PathBuf::from("./assets"),
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            s3_cf_distribution: None,
            local_storage_path: Some("/tmp/reelvault".to_string()),
            local_storage_base_url: Some("http://localhost:8091/assets".to_string()),
            ffprobe_path: "ffprobe".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            processing_timeout_secs: 600,
            max_video_size_bytes: 1 << 30,
            max_thumbnail_size_bytes: 10 << 20,
        }
    }

    #[test]
    fn default_limits_match_one_gib_and_ten_mib() {
        assert_eq!(MAX_VIDEO_SIZE_MB * BYTES_PER_MB, 1 << 30);
        assert_eq!(MAX_THUMBNAIL_SIZE_MB * BYTES_PER_MB, 10 << 20);
    }

    #[test]
    fn accepts_complete_local_config() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn rejects_short_jwt_secret() {
        let mut config = sample();
        config.base.jwt_secret = "short".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"));
    }

    #[test]
    fn rejects_s3_without_bucket() {
        let mut config = sample();
        config.storage_backend = StorageBackend::S3;
        config.s3_region = Some("us-east-1".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("S3_BUCKET"));
    }

    #[test]
    fn rejects_non_postgres_url() {
        let mut config = sample();
        config.database_url = "mysql://localhost/db".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn numeric_settings_fall_back_only_when_unset() {
        assert_eq!(parse_or("MAX_VIDEO_SIZE_MB", None, 1024usize).unwrap(), 1024);
        assert_eq!(parse_or("MAX_VIDEO_SIZE_MB", Some("  ".to_string()), 1024usize).unwrap(), 1024);
        assert_eq!(parse_or("MAX_VIDEO_SIZE_MB", Some(" 512 ".to_string()), 1024usize).unwrap(), 512);
    }

    #[test]
    fn unparsable_numeric_setting_fails_loudly() {
        for raw in ["1GB", "-5", "ten"] {
            let err = parse_or("MAX_VIDEO_SIZE_MB", Some(raw.to_string()), 1024usize).unwrap_err();
            assert!(err.to_string().contains("MAX_VIDEO_SIZE_MB"), "{err}");
        }
        assert!(parse_or("PROCESSING_TIMEOUT_SECS", Some("1.5".to_string()), 600u64).is_err());
        assert!(parse_or("DB_MAX_CONNECTIONS", Some("lots".to_string()), 10u32).is_err());
    }

    #[test]
    fn overflowing_megabyte_limit_is_rejected() {
        assert_eq!(megabytes("MAX_VIDEO_SIZE_MB", 2).unwrap(), 2 << 20);
        assert!(megabytes("MAX_VIDEO_SIZE_MB", usize::MAX).is_err());
    }

    #[test]
    fn dev_platform_is_case_insensitive() {
        let mut config = sample();
        config.base.platform = "DEV".to_string();
        assert!(Config(Box::new(config.clone())).is_dev_platform());
        config.base.platform = "prod".to_string();
        assert!(!Config(Box::new(config)).is_dev_platform());
    }
}
