//! Tubely Storage Library
//!
//! This crate provides the durable object store used by the upload pipeline:
//! the `Storage` trait and implementations for S3 and the local filesystem.
//!
//! # Storage key format
//!
//! Keys are `{classification}/{random-id}.{extension}`, generated by the `keys`
//! module. Keys must not contain `..` or a leading `/`; the random id is never
//! derived from client-supplied text.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::StorageKey;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
