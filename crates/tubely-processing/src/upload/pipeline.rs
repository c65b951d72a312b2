//! Upload pipeline orchestrator.
//!
//! The pipeline runs in two phases so the HTTP layer can reject a request
//! before reading its body:
//!
//! - [`UploadPipeline::authorize`]: parse the id, resolve the caller, fetch the
//!   record, check ownership and the declared body size.
//! - [`UploadPipeline::ingest`]: check the content type, stage, probe,
//!   classify, remux, store, then commit the location to the record.
//!
//! The record is only updated after the object put succeeded. Staged files are
//! removed on every exit path.

use std::fmt::Display;
use std::sync::Arc;

use bytes::Bytes;
use futures::Stream;
use tubely_core::models::{VideoLocation, VideoRecord, VideoResponse};
use tubely_core::{AppError, TokenVerifier, VideoUrlMode};
use tubely_db::VideoRepository;
use tubely_storage::{Storage, StorageError, StorageKey};
use uuid::Uuid;

use super::content_type;
use super::types::{AuthorizedUpload, PipelineConfig};
use crate::classify::AspectClass;
use crate::staging::StagingArea;
use crate::video::{MediaInspector, StreamingOptimizer};

const PROCESSED_SUFFIX: &str = ".processing.mp4";

/// Collaborators the pipeline drives.
#[derive(Clone)]
pub struct PipelineServices {
    pub verifier: Arc<dyn TokenVerifier>,
    pub videos: Arc<dyn VideoRepository>,
    pub storage: Arc<dyn Storage>,
    pub inspector: Arc<dyn MediaInspector>,
    pub optimizer: Arc<dyn StreamingOptimizer>,
}

#[derive(Clone)]
pub struct UploadPipeline {
    config: PipelineConfig,
    staging: StagingArea,
    services: PipelineServices,
}

impl UploadPipeline {
    pub fn new(config: PipelineConfig, staging: StagingArea, services: PipelineServices) -> Self {
        Self {
            config,
            staging,
            services,
        }
    }

    /// Admission checks that need no request body.
    #[tracing::instrument(skip(self, bearer), fields(video_id = %raw_video_id))]
    pub async fn authorize(
        &self,
        bearer: Option<&str>,
        raw_video_id: &str,
        content_length: Option<u64>,
    ) -> Result<AuthorizedUpload, AppError> {
        let video_id = Uuid::parse_str(raw_video_id)
            .map_err(|_| AppError::InvalidIdentifier(raw_video_id.to_string()))?;

        let principal = self.authenticate(bearer).await?;
        let video = self.fetch_owned(video_id, principal).await?;

        // Content-Length covers the whole multipart body, not just the file.
        if let Some(length) = content_length {
            if length > self.config.max_request_bytes() as u64 {
                tracing::warn!(
                    video_id = %video_id,
                    content_length = length,
                    max_bytes = self.config.max_upload_bytes,
                    "Declared upload size over limit"
                );
                return Err(AppError::PayloadTooLarge(format!(
                    "Video exceeds the maximum upload size of {} bytes",
                    self.config.max_upload_bytes
                )));
            }
        }

        Ok(AuthorizedUpload { video, principal })
    }

    /// Process an authorized upload and return the updated record, presented
    /// for the client.
    #[tracing::instrument(skip(self, authorized, stream), fields(
        video_id = %authorized.video_id(),
        user_id = %authorized.principal(),
    ))]
    pub async fn ingest<S, E>(
        &self,
        authorized: AuthorizedUpload,
        declared_content_type: Option<&str>,
        stream: S,
    ) -> Result<VideoResponse, AppError>
    where
        S: Stream<Item = Result<Bytes, E>> + Send,
        E: Display,
    {
        let start = std::time::Instant::now();
        let AuthorizedUpload { mut video, .. } = authorized;

        let content_type = self.accept_content_type(declared_content_type)?;

        tracing::info!(
            video_id = %video.id,
            user_id = %video.user_id,
            content_type = %content_type,
            "Uploading video"
        );

        let staged = self
            .staging
            .stage(stream, self.config.max_upload_bytes)
            .await?;

        let staged_size = staged.size();
        let dimensions = self.services.inspector.probe(staged.path()).await?;
        let class = AspectClass::classify(dimensions.width, dimensions.height);

        let key = StorageKey::generate(class.prefix(), &content_type::extension_for(&content_type))
            .map_err(|e| match e {
                StorageError::EntropyUnavailable(msg) => AppError::RandomnessUnavailable(msg),
                other => AppError::Internal(other.to_string()),
            })?;

        let processed = self.staging.reserve(PROCESSED_SUFFIX)?;
        self.services
            .optimizer
            .optimize(staged.path(), processed.path())
            .await?;
        drop(staged);

        let data = processed
            .read()
            .await
            .map_err(|e| AppError::StagingFailed(e.to_string()))?;
        let size = data.len();

        let url = self
            .services
            .storage
            .upload_with_key(key.as_str(), data, &content_type)
            .await
            .map_err(|e| AppError::StoreWriteFailed(e.to_string()))?;
        drop(processed);

        let location = match self.config.url_mode {
            VideoUrlMode::Direct => VideoLocation::Direct { url },
            VideoUrlMode::Signed => {
                let bucket = self.services.storage.bucket().ok_or_else(|| {
                    AppError::Internal("Signed URLs require a bucket-backed store".to_string())
                })?;
                VideoLocation::Stored {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            }
        };

        video.video_url = Some(location);
        let video = self
            .services
            .videos
            .update(&video)
            .await
            .map_err(|e| AppError::RecordUpdateFailed(e.to_string()))?;

        tracing::info!(
            video_id = %video.id,
            key = %key,
            classification = %class,
            width = dimensions.width,
            height = dimensions.height,
            staged_bytes = staged_size,
            size_bytes = size,
            duration_ms = start.elapsed().as_millis(),
            "Video upload committed"
        );

        self.present(video).await
    }

    /// Both phases in one call.
    pub async fn upload<S, E>(
        &self,
        bearer: Option<&str>,
        raw_video_id: &str,
        content_length: Option<u64>,
        declared_content_type: Option<&str>,
        stream: S,
    ) -> Result<VideoResponse, AppError>
    where
        S: Stream<Item = Result<Bytes, E>> + Send,
        E: Display,
    {
        let authorized = self
            .authorize(bearer, raw_video_id, content_length)
            .await?;
        self.ingest(authorized, declared_content_type, stream).await
    }

    /// Fetch a record for its owner, with the location resolved.
    pub async fn get(
        &self,
        bearer: Option<&str>,
        raw_video_id: &str,
    ) -> Result<VideoResponse, AppError> {
        let video_id = Uuid::parse_str(raw_video_id)
            .map_err(|_| AppError::InvalidIdentifier(raw_video_id.to_string()))?;
        let principal = self.authenticate(bearer).await?;
        let video = self.fetch_owned(video_id, principal).await?;
        self.present(video).await
    }

    /// Resolve a record's location into the URL handed to clients. Stored
    /// locations are signed on every call.
    pub async fn present(&self, video: VideoRecord) -> Result<VideoResponse, AppError> {
        let video_url = match &video.video_url {
            None => None,
            Some(VideoLocation::Direct { url }) => Some(url.clone()),
            Some(VideoLocation::Stored { key, .. }) => Some(
                self.services
                    .storage
                    .get_presigned_url(key, self.config.signed_url_ttl)
                    .await
                    .map_err(|e| AppError::SigningFailed(e.to_string()))?,
            ),
        };
        Ok(VideoResponse::from_record(video, video_url))
    }

    async fn authenticate(&self, bearer: Option<&str>) -> Result<Uuid, AppError> {
        let token = bearer
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Unauthenticated("Couldn't find JWT".to_string()))?;
        self.services.verifier.verify(token).await
    }

    async fn fetch_owned(&self, video_id: Uuid, principal: Uuid) -> Result<VideoRecord, AppError> {
        let video = self.services.videos.get(video_id).await?;
        if !video.is_owned_by(principal) {
            tracing::warn!(
                video_id = %video_id,
                user_id = %principal,
                "Caller does not own video"
            );
            return Err(AppError::Unauthorized(
                "You are not the owner of this video".to_string(),
            ));
        }
        Ok(video)
    }

    /// A missing or unparseable content type is `InvalidInput`; a well-formed
    /// one outside the allow-list is `UnsupportedMediaType`.
    fn accept_content_type(&self, declared: Option<&str>) -> Result<String, AppError> {
        let content_type = declared
            .and_then(content_type::normalize)
            .ok_or_else(|| AppError::InvalidInput("Invalid Content-Type".to_string()))?;

        if !self
            .config
            .allowed_content_types
            .iter()
            .any(|allowed| allowed == &content_type)
        {
            return Err(AppError::UnsupportedMediaType(format!(
                "Invalid file type {}; allowed: {}",
                content_type,
                self.config.allowed_content_types.join(", ")
            )));
        }

        Ok(content_type)
    }
}
