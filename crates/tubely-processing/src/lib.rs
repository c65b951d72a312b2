//! Tubely media processing
//!
//! Everything between "bytes arrived" and "record updated": staging the
//! upload on local disk, probing its geometry with ffprobe, classifying it,
//! remuxing it for fast start with ffmpeg, and the orchestrator that places
//! the result in object storage and commits its location.

pub mod classify;
pub mod error;
pub mod staging;
pub mod tool;
pub mod upload;
pub mod video;

pub use classify::AspectClass;
pub use error::ProcessingError;
pub use staging::{StagedFile, StagingArea, StagingError};
pub use tool::{run_tool, validate_tool_path, ToolError};
pub use upload::{
    AuthorizedUpload, PipelineConfig, PipelineServices, UploadPipeline, MULTIPART_OVERHEAD_BYTES,
};
pub use video::{Dimensions, FfmpegOptimizer, FfprobeInspector, MediaInspector, StreamingOptimizer};
