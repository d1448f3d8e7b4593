pub mod auth;

pub use ak_shared::errors::ErrorResponse;
pub use ak_shared::types::{ApiResponse, HealthResponse};
pub use auth::*;
