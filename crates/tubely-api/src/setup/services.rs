//! Construction of the upload pipeline and its collaborators.

use crate::auth::JwtVerifier;
use anyhow::{Context, Result};
use std::sync::Arc;
use tubely_core::models::VideoRecord;
use tubely_core::{Config, SeedVideo};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::{
    FfmpegOptimizer, FfprobeInspector, PipelineConfig, PipelineServices, StagingArea,
    UploadPipeline,
};

/// Insert the records listed in `SEED_VIDEOS`.
///
/// This service never creates records itself; without seeds every upload to a
/// standalone server answers 404.
pub async fn seed_videos(videos: &dyn VideoRepository, seeds: &[SeedVideo]) -> Result<()> {
    for seed in seeds {
        let mut record = VideoRecord::new(seed.user_id, "Seeded video", "");
        record.id = seed.id;
        videos
            .insert(record)
            .await
            .with_context(|| format!("Failed to seed video {}", seed.id))?;
        tracing::info!(video_id = %seed.id, user_id = %seed.user_id, "Seeded video record");
    }
    Ok(())
}

pub async fn build_pipeline(config: &Config) -> Result<UploadPipeline> {
    let storage = tubely_storage::create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        bucket = ?storage.bucket(),
        "Storage backend initialized"
    );

    tokio::fs::create_dir_all(&config.staging_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create staging directory {}",
                config.staging_dir.display()
            )
        })?;

    let inspector = FfprobeInspector::new(config.ffprobe_path.clone(), config.tool_timeout)?;
    let optimizer = FfmpegOptimizer::new(config.ffmpeg_path.clone(), config.tool_timeout)?;

    let videos = InMemoryVideoRepository::new();
    seed_videos(&videos, &config.seed_videos).await?;

    let services = PipelineServices {
        verifier: Arc::new(JwtVerifier::new(config.jwt_secret())),
        videos: Arc::new(videos),
        storage,
        inspector: Arc::new(inspector),
        optimizer: Arc::new(optimizer),
    };

    Ok(UploadPipeline::new(
        PipelineConfig::from_config(config),
        StagingArea::new(config.staging_dir.clone()),
        services,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[tokio::test]
    async fn test_seed_videos_creates_owned_records() {
        let videos = InMemoryVideoRepository::new();
        let seed = SeedVideo {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
        };

        seed_videos(&videos, &[seed]).await.unwrap();

        let record = videos.get(seed.id).await.unwrap();
        assert!(record.is_owned_by(seed.user_id));
        assert_eq!(record.video_url, None);

        assert!(seed_videos(&videos, &[seed]).await.is_err());
    }
}
