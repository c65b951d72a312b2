//! Tubely metadata store
//!
//! The upload pipeline consumes the metadata store only as "fetch record by
//! id" and "update record". This crate defines that seam and ships an
//! in-process implementation used by the server and by tests.

pub mod db;

pub use db::{InMemoryVideoRepository, RepositoryError, VideoRepository};
