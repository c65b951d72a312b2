//! Application state shared by all handlers.

use tubely_core::Config;
use tubely_processing::UploadPipeline;

pub struct AppState {
    pub config: Config,
    pub pipeline: UploadPipeline,
}

impl AppState {
    pub fn new(config: Config, pipeline: UploadPipeline) -> Self {
        Self { config, pipeline }
    }
}
