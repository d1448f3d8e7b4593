//! End-to-end session flows over the HTTP API

mod common;

use actix_web::{http::StatusCode, test};
use serde_json::Value;

use ak_api::app::create_app;
use common::*;

const ALICE: &str = "alice";
const ALICE_PASSWORD: &str = "Secret123!";

#[actix_web::test]
async fn test_register_login_refresh_scenario() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    let resp = test::call_service(&app, register_request(ALICE, ALICE_PASSWORD).to_request()).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = test::call_service(&app, login_request(ALICE, ALICE_PASSWORD).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["token_type"], "Bearer");
    assert_eq!(body["data"]["expires_in"], 900);
    assert_eq!(body["data"]["user_info"]["username"], ALICE);
    let (access, refresh) = tokens_of(&body);

    let resp = test::call_service(&app, me_request(&access).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, refresh_request(&refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let (new_access, new_refresh) = tokens_of(&body);
    assert_ne!(new_refresh, refresh);

    // The old refresh token was consumed by the rotation
    let resp = test::call_service(&app, refresh_request(&refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "INVALID_REFRESH_TOKEN");

    let resp = test::call_service(&app, me_request(&new_access).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["username"], ALICE);
}

#[actix_web::test]
async fn test_logout_then_refresh_fails() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    test::call_service(&app, register_request(ALICE, ALICE_PASSWORD).to_request()).await;
    let body: Value =
        test::call_and_read_body_json(&app, login_request(ALICE, ALICE_PASSWORD).to_request())
            .await;
    let (access, refresh) = tokens_of(&body);

    let resp = test::call_service(&app, logout_request(&access, &refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Logout successful");

    let resp = test::call_service(&app, refresh_request(&refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Logging out again is harmless
    let resp = test::call_service(&app, logout_request(&access, &refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_change_password_ends_sessions() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    test::call_service(&app, register_request(ALICE, ALICE_PASSWORD).to_request()).await;
    let body: Value =
        test::call_and_read_body_json(&app, login_request(ALICE, ALICE_PASSWORD).to_request())
            .await;
    let (access, refresh) = tokens_of(&body);

    let resp = test::call_service(
        &app,
        change_password_request(&access, "wrong-password", "NewSecret456!").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = test::call_service(
        &app,
        change_password_request(&access, ALICE_PASSWORD, "NewSecret456!").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    // Access tokens live until they expire
    let resp = test::call_service(&app, me_request(&access).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, refresh_request(&refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(&app, login_request(ALICE, ALICE_PASSWORD).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(&app, login_request(ALICE, "NewSecret456!").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_new_login_supersedes_previous_refresh_token() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    test::call_service(&app, register_request(ALICE, ALICE_PASSWORD).to_request()).await;
    let first: Value =
        test::call_and_read_body_json(&app, login_request(ALICE, ALICE_PASSWORD).to_request())
            .await;
    let second: Value =
        test::call_and_read_body_json(&app, login_request(ALICE, ALICE_PASSWORD).to_request())
            .await;

    let (_, first_refresh) = tokens_of(&first);
    let (_, second_refresh) = tokens_of(&second);

    let resp = test::call_service(&app, refresh_request(&first_refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = test::call_service(&app, refresh_request(&second_refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_login_records_client_address() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    test::call_service(&app, register_request(ALICE, ALICE_PASSWORD).to_request()).await;
    let req = login_request(ALICE, ALICE_PASSWORD)
        .insert_header(("X-Forwarded-For", "198.51.100.4, 10.0.0.2"))
        .insert_header(("User-Agent", "authkeep-tests"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let rows = ctx.tokens.all_rows().await;
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].ip_address.as_deref(), Some("198.51.100.4"));
    assert_eq!(rows[0].user_agent.as_deref(), Some("authkeep-tests"));
}

#[actix_web::test]
async fn test_bad_credentials_are_indistinguishable() {
    let ctx = TestContext::new();
    let app = test::init_service(create_app(ctx.state.clone(), &ctx.config)).await;

    test::call_service(&app, register_request(ALICE, ALICE_PASSWORD).to_request()).await;

    let wrong_password =
        test::call_service(&app, login_request(ALICE, "nope-nope").to_request()).await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password: Value = test::read_body_json(wrong_password).await;

    let unknown_user =
        test::call_service(&app, login_request("mallory", "nope-nope").to_request()).await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_user: Value = test::read_body_json(unknown_user).await;

    assert_eq!(wrong_password["error"], "BAD_CREDENTIALS");
    assert_eq!(wrong_password["error"], unknown_user["error"]);
    assert_eq!(wrong_password["message"], unknown_user["message"]);
}
