//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p tubely-api --test videos_test`.
//! The media tools are replaced by in-process fakes, so neither ffprobe nor
//! ffmpeg needs to be installed.

#![allow(dead_code)]

pub mod tools;

use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tubely_api::auth::JwtVerifier;
use tubely_api::setup::routes;
use tubely_api::state::AppState;
use tubely_core::config::BaseConfig;
use tubely_core::models::VideoRecord;
use tubely_core::{Config, StorageBackend, VideoUrlMode};
use tubely_db::{InMemoryVideoRepository, VideoRepository};
use tubely_processing::{
    Dimensions, PipelineConfig, PipelineServices, StagingArea, UploadPipeline,
};
use tubely_storage::{LocalStorage, Storage};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const ASSETS_BASE_URL: &str = "http://localhost:8091/assets";

/// Test application: server, seeded repository, and owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub videos: InMemoryVideoRepository,
    pub jwt: JwtVerifier,
    pub storage_dir: TempDir,
    pub staging_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        self.jwt
            .issue(user_id, Duration::from_secs(3600))
            .expect("Failed to issue test token")
    }

    /// Insert a video owned by `user_id` and return it.
    pub async fn seed_video(&self, user_id: Uuid) -> VideoRecord {
        self.videos
            .insert(VideoRecord::new(user_id, "Boots", "boot.dev mascot"))
            .await
            .expect("Failed to seed video")
    }

    pub async fn stored_video(&self, id: Uuid) -> VideoRecord {
        self.videos.get(id).await.expect("Video should exist")
    }

    pub fn staged_files(&self) -> usize {
        std::fs::read_dir(self.staging_dir.path())
            .expect("Failed to read staging dir")
            .count()
    }
}

pub fn create_test_config(storage_dir: &TempDir, staging_dir: &TempDir) -> Config {
    Config {
        base: BaseConfig {
            server_port: 8091,
            cors_origins: vec!["*".to_string()],
            jwt_secret: TEST_JWT_SECRET.to_string(),
            environment: "test".to_string(),
        },
        storage_backend: StorageBackend::Local,
        s3_bucket: None,
        s3_region: None,
        s3_endpoint: None,
        local_storage_path: Some(storage_dir.path().display().to_string()),
        local_storage_base_url: Some(ASSETS_BASE_URL.to_string()),
        staging_dir: staging_dir.path().to_path_buf(),
        max_video_size_bytes: 1024 * 1024,
        video_allowed_content_types: vec!["video/mp4".to_string()],
        ffprobe_path: "ffprobe".to_string(),
        ffmpeg_path: "ffmpeg".to_string(),
        tool_timeout: Duration::from_secs(10),
        video_url_mode: VideoUrlMode::Direct,
        signed_url_ttl: Duration::from_secs(900),
        seed_videos: Vec::new(),
    }
}

/// Setup test app with local storage and fake media tools reporting `dimensions`.
pub async fn setup_test_app_with(dimensions: Dimensions) -> TestApp {
    let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");
    let staging_dir = tempfile::tempdir().expect("Failed to create staging dir");
    let config = create_test_config(&storage_dir, &staging_dir);
    config.validate().expect("Test config is invalid");

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(storage_dir.path(), ASSETS_BASE_URL.to_string())
            .await
            .expect("Failed to create local storage"),
    );
    let videos = InMemoryVideoRepository::new();

    let pipeline = UploadPipeline::new(
        PipelineConfig::from_config(&config),
        StagingArea::new(staging_dir.path()),
        PipelineServices {
            verifier: Arc::new(JwtVerifier::new(TEST_JWT_SECRET)),
            videos: Arc::new(videos.clone()),
            storage,
            inspector: Arc::new(tools::FixedInspector(dimensions)),
            optimizer: Arc::new(tools::CopyOptimizer),
        },
    );

    let state = Arc::new(AppState::new(config.clone(), pipeline));
    let app = routes::setup_routes(&config, state).expect("Failed to build routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        videos,
        jwt: JwtVerifier::new(TEST_JWT_SECRET),
        storage_dir,
        staging_dir,
    }
}

/// Setup test app whose fake probe reports a 1920x1080 stream.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(Dimensions {
        width: 1920,
        height: 1080,
    })
    .await
}
