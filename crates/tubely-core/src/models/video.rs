use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Where a video's bytes live once the upload pipeline has committed them.
///
/// `Direct` holds a URL clients can fetch as-is. `Stored` holds the raw object
/// coordinates; it is turned into a time-limited signed URL whenever the record
/// is presented.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum VideoLocation {
    Direct { url: String },
    Stored { bucket: String, key: String },
}

impl VideoLocation {
    pub fn storage_key(&self) -> Option<&str> {
        match self {
            VideoLocation::Direct { .. } => None,
            VideoLocation::Stored { key, .. } => Some(key),
        }
    }
}

/// A video's metadata record. Created by the video-creation flow, mutated by
/// the upload pipeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: Option<VideoLocation>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoRecord {
    pub fn new(user_id: Uuid, title: impl Into<String>, description: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title: title.into(),
            description: description.into(),
            video_url: None,
            thumbnail_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, principal: Uuid) -> bool {
        self.user_id == principal
    }
}

/// Client-facing view of a `VideoRecord` with its location resolved to a URL.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VideoResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: String,
    pub video_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl VideoResponse {
    /// Build the response from a record and an already-resolved video URL.
    pub fn from_record(record: VideoRecord, video_url: Option<String>) -> Self {
        Self {
            id: record.id,
            user_id: record.user_id,
            title: record.title,
            description: record.description,
            video_url,
            thumbnail_url: record.thumbnail_url,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_serializes_with_kind_tag() {
        let location = VideoLocation::Stored {
            bucket: "tubely-private".to_string(),
            key: "landscape/abc.mp4".to_string(),
        };
        let json = serde_json::to_value(&location).unwrap();
        assert_eq!(json["kind"], "stored");
        assert_eq!(json["bucket"], "tubely-private");
        assert_eq!(location.storage_key(), Some("landscape/abc.mp4"));

        let direct = VideoLocation::Direct {
            url: "https://cdn.example.com/other/x.mp4".to_string(),
        };
        assert_eq!(direct.storage_key(), None);
    }

    #[test]
    fn ownership_is_by_user_id() {
        let owner = Uuid::new_v4();
        let record = VideoRecord::new(owner, "Boots", "a video");
        assert!(record.is_owned_by(owner));
        assert!(!record.is_owned_by(Uuid::new_v4()));
        assert!(record.video_url.is_none());
    }
}
