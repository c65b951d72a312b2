//! Upload pipeline: authorize → stage → probe → classify → remux → store → commit.

pub mod content_type;
pub mod pipeline;
pub mod types;

pub use pipeline::{PipelineServices, UploadPipeline};
pub use types::{AuthorizedUpload, PipelineConfig, MULTIPART_OVERHEAD_BYTES};
