//! Authentication collaborator interface.

use async_trait::async_trait;
use uuid::Uuid;

use crate::AppError;

/// Resolves a bearer credential to the id of the principal it was issued for.
///
/// Implementations return `AppError::Unauthenticated` for any credential they
/// cannot validate (malformed, expired, wrong signature).
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Uuid, AppError>;
}
