//! Fast-start remux backed by ffmpeg

use async_trait::async_trait;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;

use crate::error::ProcessingError;
use crate::tool::{run_tool, validate_tool_path};

/// Rewrites a container so its index precedes the media payload.
#[async_trait]
pub trait StreamingOptimizer: Send + Sync {
    async fn optimize(&self, input: &Path, output: &Path) -> Result<(), ProcessingError>;
}

/// Stream-copy remux with `-movflags faststart`; never re-encodes.
pub struct FfmpegOptimizer {
    ffmpeg_path: String,
    timeout: Duration,
}

impl FfmpegOptimizer {
    pub fn new(ffmpeg_path: String, timeout: Duration) -> Result<Self, ProcessingError> {
        validate_tool_path(&ffmpeg_path)?;
        Ok(Self {
            ffmpeg_path,
            timeout,
        })
    }
}

#[async_trait]
impl StreamingOptimizer for FfmpegOptimizer {
    #[tracing::instrument(skip(self), fields(
        process.executable.name = "ffmpeg",
        process.executable.path = %self.ffmpeg_path,
        ffmpeg.operation = "faststart"
    ))]
    async fn optimize(&self, input: &Path, output: &Path) -> Result<(), ProcessingError> {
        let start = std::time::Instant::now();

        run_tool(
            &self.ffmpeg_path,
            [
                OsStr::new("-y"),
                OsStr::new("-i"),
                input.as_os_str(),
                OsStr::new("-c"),
                OsStr::new("copy"),
                OsStr::new("-movflags"),
                OsStr::new("faststart"),
                OsStr::new("-f"),
                OsStr::new("mp4"),
                output.as_os_str(),
            ],
            self.timeout,
        )
        .await
        .map_err(ProcessingError::transform)?;

        let output_size = tokio::fs::metadata(output)
            .await
            .map(|m| m.len())
            .map_err(|e| {
                ProcessingError::TransformFailed(format!("ffmpeg produced no output: {}", e))
            })?;

        if output_size == 0 {
            return Err(ProcessingError::TransformFailed(
                "ffmpeg produced an empty file".to_string(),
            ));
        }

        tracing::info!(
            duration_ms = start.elapsed().as_millis(),
            output_size_bytes = output_size,
            "Fast-start remux completed"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_ffmpeg_is_transform_failure() {
        let optimizer =
            FfmpegOptimizer::new("tubely-missing-ffmpeg".to_string(), Duration::from_secs(5))
                .unwrap();
        let result = optimizer
            .optimize(Path::new("/tmp/in.mp4"), Path::new("/tmp/out.mp4"))
            .await;
        assert!(matches!(result, Err(ProcessingError::TransformFailed(_))));
    }

    #[test]
    fn test_rejects_unsafe_tool_path() {
        assert!(FfmpegOptimizer::new("ffmpeg|sh".to_string(), Duration::from_secs(1)).is_err());
    }
}
