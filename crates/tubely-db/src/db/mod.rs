//! Video repositories for the data access layer
//
// Repository trait and error type
pub mod video;
//
// In-process implementation
pub mod memory;

pub use memory::InMemoryVideoRepository;
pub use video::{RepositoryError, VideoRepository};
