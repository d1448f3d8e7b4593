//! Business services containing domain logic and use cases.

pub mod auth;
pub mod clock;
pub mod token;

// Re-export commonly used types
pub use auth::{
    AuthService, AuthServiceConfig, BcryptPasswordHasher, CredentialVerifier, PasswordHasher,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use token::{
    hash_token, IssuedRefreshToken, RandomTokenGenerator, RefreshTokenStore, SweepResult,
    TokenCodec, TokenGenerator, TokenLifecycleEngine, TokenServiceConfig, TokenSweepService,
};
