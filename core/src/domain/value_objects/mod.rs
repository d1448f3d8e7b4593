//! Value objects returned by the session services.

pub mod session;

pub use session::{AuthenticatedSession, ClientInfo, SessionTokens, UserInfo, TOKEN_TYPE_BEARER};
