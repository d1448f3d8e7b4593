//! Authentication route handlers
//!
//! - Registration and login
//! - Token refresh and logout
//! - Current user and password change

pub mod change_password;
pub mod login;
pub mod logout;
pub mod me;
pub mod refresh;
pub mod register;

use std::net::IpAddr;
use std::sync::Arc;

use actix_web::{http::header, HttpRequest};

use ak_core::domain::value_objects::ClientInfo;
use ak_core::repositories::{AccountRepository, RefreshTokenRepository, RoleRepository};
use ak_core::services::{AuthService, TokenCodec};

/// Application state shared by the auth handlers
pub struct AppState<U, Ro, R>
where
    U: AccountRepository,
    Ro: RoleRepository,
    R: RefreshTokenRepository,
{
    pub auth_service: Arc<AuthService<U, Ro, R>>,
    /// Parses bearer tokens in `JwtAuth`
    pub codec: Arc<TokenCodec>,
}

impl<U, Ro, R> AppState<U, Ro, R>
where
    U: AccountRepository,
    Ro: RoleRepository,
    R: RefreshTokenRepository,
{
    pub fn new(auth_service: Arc<AuthService<U, Ro, R>>, codec: Arc<TokenCodec>) -> Self {
        Self {
            auth_service,
            codec,
        }
    }
}

/// Longest user agent kept on a refresh token, in characters
pub const MAX_USER_AGENT_LEN: usize = 255;

/// Caller address and agent, recorded on issued refresh tokens
///
/// The address is the first `X-Forwarded-For` entry when it parses as an IP
/// address, else the peer address. The user agent is cut to
/// [`MAX_USER_AGENT_LEN`] characters.
pub fn client_info(req: &HttpRequest) -> ClientInfo {
    let forwarded = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(|v| v.trim().parse::<IpAddr>().ok());

    let ip_address = forwarded
        .or_else(|| req.peer_addr().map(|addr| addr.ip()))
        .map(|ip| ip.to_string());

    let user_agent = req
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.chars().take(MAX_USER_AGENT_LEN).collect());

    ClientInfo::new(ip_address, user_agent)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_client_info_prefers_forwarded_for() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "203.0.113.7, 10.0.0.1"))
            .insert_header((header::USER_AGENT, "curl/8.0"))
            .peer_addr("127.0.0.1:5000".parse().unwrap())
            .to_http_request();

        let info = client_info(&req);
        assert_eq!(info.ip_address.as_deref(), Some("203.0.113.7"));
        assert_eq!(info.user_agent.as_deref(), Some("curl/8.0"));
    }

    #[test]
    fn test_client_info_falls_back_to_peer() {
        let req = TestRequest::default()
            .peer_addr("192.0.2.10:443".parse().unwrap())
            .to_http_request();

        let info = client_info(&req);
        assert_eq!(info.ip_address.as_deref(), Some("192.0.2.10"));
        assert_eq!(info.user_agent, None);
    }

    #[test]
    fn test_client_info_ignores_unparseable_forwarded_for() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", "x".repeat(300)))
            .peer_addr("192.0.2.10:443".parse().unwrap())
            .to_http_request();

        let info = client_info(&req);
        assert_eq!(info.ip_address.as_deref(), Some("192.0.2.10"));
    }

    #[test]
    fn test_client_info_accepts_ipv6_forwarded_for() {
        let req = TestRequest::default()
            .insert_header(("X-Forwarded-For", " 2001:db8::1 "))
            .to_http_request();

        let info = client_info(&req);
        assert_eq!(info.ip_address.as_deref(), Some("2001:db8::1"));
    }

    #[test]
    fn test_client_info_truncates_long_user_agent() {
        let agent = format!("agent/{}", "x".repeat(400));
        let req = TestRequest::default()
            .insert_header((header::USER_AGENT, agent.clone()))
            .to_http_request();

        let info = client_info(&req);
        let kept = info.user_agent.unwrap();
        assert_eq!(kept.chars().count(), MAX_USER_AGENT_LEN);
        assert!(agent.starts_with(&kept));
    }
}
