//! Bearer-token authentication adapter.

pub mod bearer;
pub mod jwt;

pub use bearer::bearer_token;
pub use jwt::{Claims, JwtVerifier};
