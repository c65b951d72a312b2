//! Configuration module
//!
//! Configuration is read once from the environment (optionally seeded from a
//! `.env` file) into an explicit `Config` value that is handed to the
//! components that need it. Nothing here is process-global.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use uuid::Uuid;

use crate::storage_types::StorageBackend;

const MAX_VIDEO_SIZE_MB: usize = 1024;
const TOOL_TIMEOUT_SECS: u64 = 120;
const SIGNED_URL_TTL_SECS: u64 = 900;

/// How the externally visible video location is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VideoUrlMode {
    /// Store and return the object's constructed public URL.
    Direct,
    /// Store bucket + key; issue a time-limited URL whenever a record is read.
    Signed,
}

impl FromStr for VideoUrlMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Ok(VideoUrlMode::Direct),
            "signed" => Ok(VideoUrlMode::Signed),
            _ => Err(anyhow::anyhow!(
                "Invalid VIDEO_URL_MODE '{}': expected 'direct' or 'signed'",
                s
            )),
        }
    }
}

/// A video record to create at startup, as `video_id:user_id` in `SEED_VIDEOS`.
///
/// Records are normally created by another service; seeding lets a standalone
/// server accept uploads.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeedVideo {
    pub id: Uuid,
    pub user_id: Uuid,
}

fn megabytes_to_bytes(mb: usize) -> Result<usize, anyhow::Error> {
    mb.checked_mul(1024 * 1024)
        .ok_or_else(|| anyhow::anyhow!("MAX_VIDEO_SIZE_MB is too large: {}", mb))
}

fn parse_seed_videos(raw: &str) -> Result<Vec<SeedVideo>, anyhow::Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (id, user_id) = entry.split_once(':').ok_or_else(|| {
                anyhow::anyhow!("Invalid SEED_VIDEOS entry '{}': expected video_id:user_id", entry)
            })?;
            Ok(SeedVideo {
                id: Uuid::parse_str(id.trim())
                    .map_err(|e| anyhow::anyhow!("Invalid video id in SEED_VIDEOS: {}", e))?,
                user_id: Uuid::parse_str(user_id.trim())
                    .map_err(|e| anyhow::anyhow!("Invalid user id in SEED_VIDEOS: {}", e))?,
            })
        })
        .collect()
}

/// Settings shared by every entry point.
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub jwt_secret: String,
    pub environment: String,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub base: BaseConfig,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Upload pipeline configuration
    pub staging_dir: PathBuf,
    pub max_video_size_bytes: usize,
    pub video_allowed_content_types: Vec<String>,
    pub ffprobe_path: String,
    pub ffmpeg_path: String,
    pub tool_timeout: Duration,
    pub video_url_mode: VideoUrlMode,
    pub signed_url_ttl: Duration,
    pub seed_videos: Vec<SeedVideo>,
}

impl Config {
    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.base.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.base.jwt_secret
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.base.environment
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| "8091".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            environment,
        };

        let storage_backend = env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "s3".to_string())
            .parse::<StorageBackend>()?;

        let max_video_size_mb = env::var("MAX_VIDEO_SIZE_MB")
            .unwrap_or_else(|_| MAX_VIDEO_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_VIDEO_SIZE_MB);

        let max_video_size_bytes = megabytes_to_bytes(max_video_size_mb)?;

        let video_allowed_content_types = env::var("VIDEO_ALLOWED_CONTENT_TYPES")
            .unwrap_or_else(|_| "video/mp4".to_string())
            .split(',')
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        let tool_timeout_secs = env::var("TOOL_TIMEOUT_SECS")
            .unwrap_or_else(|_| TOOL_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .unwrap_or(TOOL_TIMEOUT_SECS);

        let signed_url_ttl_secs = env::var("SIGNED_URL_TTL_SECS")
            .unwrap_or_else(|_| SIGNED_URL_TTL_SECS.to_string())
            .parse::<u64>()
            .unwrap_or(SIGNED_URL_TTL_SECS);

        let config = Config {
            base,
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION")
                .or_else(|_| env::var("AWS_REGION"))
                .ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            staging_dir: env::var("STAGING_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| env::temp_dir()),
            max_video_size_bytes,
            video_allowed_content_types,
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            ffmpeg_path: env::var("FFMPEG_PATH").unwrap_or_else(|_| "ffmpeg".to_string()),
            tool_timeout: Duration::from_secs(tool_timeout_secs),
            video_url_mode: env::var("VIDEO_URL_MODE")
                .unwrap_or_else(|_| "direct".to_string())
                .parse()?,
            signed_url_ttl: Duration::from_secs(signed_url_ttl_secs),
            seed_videos: parse_seed_videos(&env::var("SEED_VIDEOS").unwrap_or_default())?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if self.video_allowed_content_types.is_empty() {
            return Err(anyhow::anyhow!(
                "VIDEO_ALLOWED_CONTENT_TYPES must list at least one content type"
            ));
        }

        if self.tool_timeout.is_zero() {
            return Err(anyhow::anyhow!("TOOL_TIMEOUT_SECS must be greater than 0"));
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
                if self.video_url_mode == VideoUrlMode::Signed {
                    return Err(anyhow::anyhow!(
                        "VIDEO_URL_MODE=signed requires the S3 storage backend"
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

    fn local_config() -> Config {
        Config {
            base: BaseConfig {
                server_port: 8091,
                cors_origins: vec!["*".to_string()],
                jwt_secret: "a".repeat(32),
                environment: "development".to_string(),
            },
            storage_backend: StorageBackend::Local,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            local_storage_path: Some("/var/lib/tubely/assets".to_string()),
            local_storage_base_url: Some("http://localhost:8091/assets".to_string()),
            staging_dir: env::temp_dir(),
            max_video_size_bytes: MAX_VIDEO_SIZE_MB * 1024 * 1024,
            video_allowed_content_types: vec!["video/mp4".to_string()],
            ffprobe_path: "ffprobe".to_string(),
            ffmpeg_path: "ffmpeg".to_string(),
            tool_timeout: Duration::from_secs(TOOL_TIMEOUT_SECS),
            video_url_mode: VideoUrlMode::Direct,
            signed_url_ttl: Duration::from_secs(SIGNED_URL_TTL_SECS),
            seed_videos: Vec::new(),
        }
    }

    #[test]
    fn test_valid_local_config() {
        assert!(local_config().validate().is_ok());
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        let mut config = local_config();
        config.base.jwt_secret = "short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_signed_mode_requires_s3() {
        let mut config = local_config();
        config.video_url_mode = VideoUrlMode::Signed;
        assert!(config.validate().is_err());

        config.storage_backend = StorageBackend::S3;
        config.s3_bucket = Some("tubely-private".to_string());
        config.s3_region = Some("us-east-1".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_url_mode_parsing() {
        assert_eq!("direct".parse::<VideoUrlMode>().unwrap(), VideoUrlMode::Direct);
        assert_eq!(" Signed ".parse::<VideoUrlMode>().unwrap(), VideoUrlMode::Signed);
        assert!("cdn".parse::<VideoUrlMode>().is_err());
    }

    #[test]
    fn test_seed_videos_parsing() {
        let video = Uuid::new_v4();
        let user = Uuid::new_v4();

        let seeds = parse_seed_videos(&format!(" {}:{} ,", video, user)).unwrap();
        assert_eq!(seeds, vec![SeedVideo { id: video, user_id: user }]);
        assert!(parse_seed_videos("").unwrap().is_empty());
        assert!(parse_seed_videos(&video.to_string()).is_err());
        assert!(parse_seed_videos(&format!("{}:not-a-uuid", video)).is_err());
    }

    #[test]
    fn test_upload_limit_conversion() {
        assert_eq!(megabytes_to_bytes(1024).unwrap(), 1024 * 1024 * 1024);
        let err = megabytes_to_bytes(usize::MAX).unwrap_err();
        assert!(err.to_string().contains("MAX_VIDEO_SIZE_MB"));
    }

    #[test]
    fn test_production_detection() {
        let mut config = local_config();
        assert!(!config.is_production());
        config.base.environment = "Production".to_string();
        assert!(config.is_production());
    }
}
