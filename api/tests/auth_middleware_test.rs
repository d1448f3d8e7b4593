//! Bearer middleware and error envelope tests

mod common;

use actix_web::{http::header, http::StatusCode, test};
use chrono::Duration;
use serde_json::Value;

use ak_api::app::create_app;
use common::*;

#[actix_web::test]
async fn test_health_check() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request())
            .await;
    assert_eq!(body["status"], "healthy");
}

#[actix_web::test]
async fn test_protected_route_requires_bearer() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header((header::AUTHORIZATION, "Basic YWxpY2U6c2VjcmV0"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_forged_and_malformed_tokens_get_same_response() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    test::call_service(&app, register_request("bob", "Password99").to_request()).await;
    let body: Value =
        test::call_and_read_body_json(&app, login_request("bob", "Password99").to_request()).await;
    let (access, _) = tokens_of(&body);

    // Flip one character in the middle of the signature
    let signature_start = access.rfind('.').unwrap() + 1;
    let mut chars: Vec<char> = access.chars().collect();
    let target = signature_start + 10;
    chars[target] = if chars[target] == 'A' { 'B' } else { 'A' };
    let forged: String = chars.into_iter().collect();

    let forged_resp = test::call_service(&app, me_request(&forged).to_request()).await;
    assert_eq!(forged_resp.status(), StatusCode::UNAUTHORIZED);
    let forged_body: Value = test::read_body_json(forged_resp).await;

    let garbage_resp = test::call_service(&app, me_request("not-a-jwt").to_request()).await;
    assert_eq!(garbage_resp.status(), StatusCode::UNAUTHORIZED);
    let garbage_body: Value = test::read_body_json(garbage_resp).await;

    assert_eq!(forged_body["error"], garbage_body["error"]);
    assert_eq!(forged_body["message"], garbage_body["message"]);
}

#[actix_web::test]
async fn test_access_token_expires() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    test::call_service(&app, register_request("carol", "Password99").to_request()).await;
    let body: Value =
        test::call_and_read_body_json(&app, login_request("carol", "Password99").to_request())
            .await;
    let (access, refresh) = tokens_of(&body);

    ctx.clock.advance(Duration::seconds(899));
    let resp = test::call_service(&app, me_request(&access).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    ctx.clock.advance(Duration::seconds(1));
    let resp = test::call_service(&app, me_request(&access).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // The refresh token outlives the access token
    let resp = test::call_service(&app, refresh_request(&refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_logout_requires_bearer() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/logout")
        .set_json(serde_json::json!({ "refresh_token": "whatever" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_unknown_route_is_not_found() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let req = test::TestRequest::get().uri("/api/v2/nothing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
