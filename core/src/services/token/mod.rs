//! Token services
//!
//! - `codec` - HS256 access token minting and verification
//! - `store` - refresh token creation and lookup by plaintext token
//! - `lifecycle` - session issuance, rotation, revocation and sweep
//! - `sweep` - background ticker driving the sweep

mod codec;
mod config;
mod generator;
mod lifecycle;
mod store;
mod sweep;

#[cfg(test)]
mod tests;

pub use codec::{TokenCodec, MIN_SECRET_BYTES};
pub use config::TokenServiceConfig;
pub use generator::{hash_token, RandomTokenGenerator, TokenGenerator, REFRESH_TOKEN_BYTES};
pub use lifecycle::TokenLifecycleEngine;
pub use store::{IssuedRefreshToken, RefreshTokenStore};
pub use sweep::{SweepResult, TokenSweepService};
