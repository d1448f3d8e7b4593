//! In-memory wiring of the HTTP app for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{http::header, test::TestRequest, web};
use serde_json::{json, Value};

use ak_api::app::build_services;
use ak_api::routes::auth::AppState;
use ak_core::repositories::{
    InMemoryAccountRepository, InMemoryRefreshTokenRepository, InMemoryRoleRepository,
};
use ak_core::services::ManualClock;
use ak_shared::config::AppConfig;

pub type State =
    AppState<InMemoryAccountRepository, InMemoryRoleRepository, InMemoryRefreshTokenRepository>;

pub struct TestContext {
    pub config: AppConfig,
    pub clock: Arc<ManualClock>,
    pub tokens: Arc<InMemoryRefreshTokenRepository>,
    pub state: web::Data<State>,
}

impl TestContext {
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.auth.jwt.secret = "integration-tests-secret-of-32-bytes-or-more".to_string();
        // Minimum bcrypt cost keeps the suite fast
        config.auth.password_hash_cost = 4;

        let clock = Arc::new(ManualClock::starting_now());
        let tokens = Arc::new(InMemoryRefreshTokenRepository::new());

        let services = build_services(
            &config,
            Arc::new(InMemoryAccountRepository::new()),
            Arc::new(InMemoryRoleRepository::with_default_roles()),
            tokens.clone(),
            clock.clone(),
        )
        .unwrap();

        Self {
            config,
            clock,
            tokens,
            state: services.state,
        }
    }
}

pub fn register_request(username: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "username": username, "password": password }))
}

pub fn login_request(username: &str, password: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "username": username, "password": password }))
}

pub fn refresh_request(refresh_token: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/v1/auth/refresh")
        .set_json(json!({ "refresh_token": refresh_token }))
}

pub fn logout_request(access_token: &str, refresh_token: &str) -> TestRequest {
    TestRequest::post()
        .uri("/api/v1/auth/logout")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", access_token)))
        .set_json(json!({ "refresh_token": refresh_token }))
}

pub fn me_request(access_token: &str) -> TestRequest {
    TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", access_token)))
}

pub fn change_password_request(access_token: &str, old: &str, new: &str) -> TestRequest {
    TestRequest::put()
        .uri("/api/v1/auth/change-password")
        .insert_header((header::AUTHORIZATION, format!("Bearer {}", access_token)))
        .set_json(json!({ "old_password": old, "new_password": new }))
}

/// `(access_token, refresh_token)` from a login or refresh response body
pub fn tokens_of(body: &Value) -> (String, String) {
    let data = &body["data"];
    (
        data["access_token"].as_str().unwrap().to_string(),
        data["refresh_token"].as_str().unwrap().to_string(),
    )
}
