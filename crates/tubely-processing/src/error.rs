use tubely_core::AppError;

use crate::tool::ToolError;

/// Errors raised by the external media tools.
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Invalid tool path: {0}")]
    InvalidToolPath(String),

    #[error("Media probe failed: {0}")]
    ProbeFailed(String),

    #[error("Media transform failed: {0}")]
    TransformFailed(String),
}

impl ProcessingError {
    pub(crate) fn probe(err: ToolError) -> Self {
        ProcessingError::ProbeFailed(err.to_string())
    }

    pub(crate) fn transform(err: ToolError) -> Self {
        ProcessingError::TransformFailed(err.to_string())
    }
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        match err {
            ProcessingError::InvalidToolPath(msg) => AppError::Internal(msg),
            ProcessingError::ProbeFailed(msg) => AppError::InspectionFailed(msg),
            ProcessingError::TransformFailed(msg) => AppError::TransformFailed(msg),
        }
    }
}
