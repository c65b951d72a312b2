//! Tubely API Library
//!
//! This crate provides the HTTP handlers, the bearer-token adapter, error
//! rendering, and application setup for the video upload service.

// Module declarations
mod api_doc;
mod handlers;
pub mod setup;
pub mod telemetry;

// Public modules
pub mod auth;
pub mod error;
pub mod state;

// Re-exports
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
