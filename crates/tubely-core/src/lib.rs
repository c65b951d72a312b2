//! Tubely Core Library
//!
//! This crate provides the domain models, error taxonomy, configuration, and
//! collaborator traits shared by every Tubely component.

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use auth::TokenVerifier;
pub use config::{Config, SeedVideo, VideoUrlMode};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use storage_types::StorageBackend;
