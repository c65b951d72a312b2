use crate::db::video::{RepositoryError, VideoRepository};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tubely_core::models::VideoRecord;
use uuid::Uuid;

/// In-process video repository backed by a `HashMap`.
///
/// Cloning shares the underlying map.
#[derive(Clone, Default)]
pub struct InMemoryVideoRepository {
    videos: Arc<RwLock<HashMap<Uuid, VideoRecord>>>,
}

impl InMemoryVideoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.videos.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.videos.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl VideoRepository for InMemoryVideoRepository {
    #[tracing::instrument(skip(self), fields(db.system = "memory", db.operation = "select"))]
    async fn get(&self, id: Uuid) -> Result<VideoRecord, RepositoryError> {
        self.videos
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound(id))
    }

    #[tracing::instrument(skip(self, record), fields(db.system = "memory", db.operation = "update", video_id = %record.id))]
    async fn update(&self, record: &VideoRecord) -> Result<VideoRecord, RepositoryError> {
        let mut videos = self.videos.write().await;
        let stored = videos
            .get_mut(&record.id)
            .ok_or(RepositoryError::NotFound(record.id))?;

        let mut updated = record.clone();
        updated.created_at = stored.created_at;
        updated.updated_at = Utc::now();
        *stored = updated.clone();

        tracing::debug!(video_id = %record.id, "Video record updated");
        Ok(updated)
    }

    #[tracing::instrument(skip(self, record), fields(db.system = "memory", db.operation = "insert", video_id = %record.id))]
    async fn insert(&self, record: VideoRecord) -> Result<VideoRecord, RepositoryError> {
        let mut videos = self.videos.write().await;
        if videos.contains_key(&record.id) {
            return Err(RepositoryError::UpdateFailed(format!(
                "Video {} already exists",
                record.id
            )));
        }
        videos.insert(record.id, record.clone());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tubely_core::models::VideoLocation;

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = InMemoryVideoRepository::new();
        let record = VideoRecord::new(Uuid::new_v4(), "Boots", "boot.dev mascot");
        let id = record.id;

        repo.insert(record.clone()).await.unwrap();
        assert_eq!(repo.get(id).await.unwrap(), record);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let repo = InMemoryVideoRepository::new();
        let id = Uuid::new_v4();
        assert!(matches!(
            repo.get(id).await,
            Err(RepositoryError::NotFound(missing)) if missing == id
        ));
    }

    #[tokio::test]
    async fn test_update_sets_location_and_timestamp() {
        let repo = InMemoryVideoRepository::new();
        let record = repo
            .insert(VideoRecord::new(Uuid::new_v4(), "Boots", ""))
            .await
            .unwrap();

        let mut changed = record.clone();
        changed.video_url = Some(VideoLocation::Direct {
            url: "http://localhost:8091/assets/landscape/abc.mp4".to_string(),
        });
        let updated = repo.update(&changed).await.unwrap();

        assert_eq!(updated.video_url, changed.video_url);
        assert_eq!(updated.created_at, record.created_at);
        assert!(updated.updated_at >= record.updated_at);
        assert_eq!(repo.get(record.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_unknown_record_fails() {
        let repo = InMemoryVideoRepository::new();
        let record = VideoRecord::new(Uuid::new_v4(), "ghost", "");
        assert!(matches!(
            repo.update(&record).await,
            Err(RepositoryError::NotFound(_))
        ));
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let repo = InMemoryVideoRepository::new();
        let record = VideoRecord::new(Uuid::new_v4(), "Boots", "");
        repo.insert(record.clone()).await.unwrap();
        assert!(repo.insert(record).await.is_err());
    }
}
