//! In-process stand-ins for ffprobe and ffmpeg.

use async_trait::async_trait;
use std::path::Path;
use tubely_processing::{Dimensions, MediaInspector, ProcessingError, StreamingOptimizer};

pub struct FixedInspector(pub Dimensions);

#[async_trait]
impl MediaInspector for FixedInspector {
    async fn probe(&self, _path: &Path) -> Result<Dimensions, ProcessingError> {
        Ok(self.0)
    }
}

/// Copies the input unchanged.
pub struct CopyOptimizer;

#[async_trait]
impl StreamingOptimizer for CopyOptimizer {
    async fn optimize(&self, input: &Path, output: &Path) -> Result<(), ProcessingError> {
        tokio::fs::copy(input, output)
            .await
            .map_err(|e| ProcessingError::TransformFailed(e.to_string()))?;
        Ok(())
    }
}
