use tubely_core::models::VideoRecord;
use tubely_core::AppError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Video {0} not found")]
    NotFound(Uuid),

    #[error("Metadata store unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to update video: {0}")]
    UpdateFailed(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(id) => {
                AppError::RecordNotFound(format!("Couldn't find video {}", id))
            }
            RepositoryError::Unavailable(msg) => AppError::StoreUnavailable(msg),
            RepositoryError::UpdateFailed(msg) => AppError::RecordUpdateFailed(msg),
        }
    }
}

/// Trait for video metadata operations
/// This abstracts the persistence implementation
#[async_trait::async_trait]
pub trait VideoRepository: Send + Sync {
    /// Fetch a video record by id
    async fn get(&self, id: Uuid) -> Result<VideoRecord, RepositoryError>;

    /// Replace the stored record with `record` (matched by id) and return the
    /// stored version with `updated_at` refreshed.
    async fn update(&self, record: &VideoRecord) -> Result<VideoRecord, RepositoryError>;

    /// Insert a new record. Used to seed records; the create flow lives elsewhere.
    async fn insert(&self, record: VideoRecord) -> Result<VideoRecord, RepositoryError>;
}
