//! Types for the upload pipeline.

use std::time::Duration;

use tubely_core::models::VideoRecord;
use tubely_core::{Config, VideoUrlMode};
use uuid::Uuid;

/// Allowance for multipart boundaries and part headers on top of the file itself.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Settings the pipeline needs, derived once from `Config`.
#[derive(Clone, Debug)]
pub struct PipelineConfig {
    pub max_upload_bytes: usize,
    pub allowed_content_types: Vec<String>,
    pub url_mode: VideoUrlMode,
    pub signed_url_ttl: Duration,
}

impl PipelineConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_upload_bytes: config.max_video_size_bytes,
            allowed_content_types: config.video_allowed_content_types.clone(),
            url_mode: config.video_url_mode,
            signed_url_ttl: config.signed_url_ttl,
        }
    }

    /// Largest request body that can still carry a file of `max_upload_bytes`.
    pub fn max_request_bytes(&self) -> usize {
        self.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_limit_covers_multipart_overhead() {
        let config = PipelineConfig {
            max_upload_bytes: 1024 * 1024,
            allowed_content_types: vec!["video/mp4".to_string()],
            url_mode: VideoUrlMode::Direct,
            signed_url_ttl: Duration::from_secs(900),
        };
        assert_eq!(config.max_request_bytes(), 1024 * 1024 + MULTIPART_OVERHEAD_BYTES);

        let unbounded = PipelineConfig {
            max_upload_bytes: usize::MAX,
            ..config
        };
        assert_eq!(unbounded.max_request_bytes(), usize::MAX);
    }
}

/// Proof that a caller may upload to a specific video.
///
/// Only `UploadPipeline::authorize` constructs one.
#[derive(Debug, Clone)]
pub struct AuthorizedUpload {
    pub(crate) video: VideoRecord,
    pub(crate) principal: Uuid,
}

impl AuthorizedUpload {
    pub fn video(&self) -> &VideoRecord {
        &self.video
    }

    pub fn video_id(&self) -> Uuid {
        self.video.id
    }

    pub fn principal(&self) -> Uuid {
        self.principal
    }
}
