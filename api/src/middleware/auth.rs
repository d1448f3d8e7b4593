//! Bearer token middleware for protecting API endpoints.
//!
//! Extracts the access token from the Authorization header, parses it with
//! the shared `TokenCodec` and injects an `AuthContext` into the request.
//! Any failure short-circuits with the same `401 Unauthorized` body.

use std::{
    collections::BTreeSet,
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::ErrorUnauthorized,
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest,
};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use ak_core::domain::entities::AccessTokenClaims;
use ak_core::services::TokenCodec;

use crate::handlers::unauthorized;

/// Identity of the bearer, available to handlers as an extractor
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: String,
    /// Role names, `ROLE_` prefixed
    pub roles: BTreeSet<String>,
    pub jti: String,
}

impl From<AccessTokenClaims> for AuthContext {
    fn from(claims: AccessTokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.sub,
            roles: claims.roles,
            jti: claims.jti,
        }
    }
}

/// Bearer authentication middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    codec: Arc<TokenCodec>,
}

impl JwtAuth {
    pub fn new(codec: Arc<TokenCodec>) -> Self {
        Self { codec }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            codec: self.codec.clone(),
        }))
    }
}

pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    codec: Arc<TokenCodec>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        let claims = extract_bearer_token(&req).and_then(|token| {
            self.codec
                .parse(&token)
                .map_err(|e| log::debug!("Bearer token rejected: {}", e))
                .ok()
        });

        Box::pin(async move {
            let Some(claims) = claims else {
                return Ok(req.into_response(unauthorized()).map_into_right_body());
            };

            req.extensions_mut().insert(AuthContext::from(claims));

            service
                .call(req)
                .await
                .map(ServiceResponse::map_into_left_body)
        })
    }
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ErrorUnauthorized("Authentication required"));

        ready(result)
    }
}
