//! Application state and factory
//!
//! Wires repositories into the core services and builds the actix-web
//! `App` shared by the binary and the integration tests.

use std::sync::Arc;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::Logger,
    web, App, HttpResponse,
};

use ak_core::errors::DomainError;
use ak_core::repositories::{AccountRepository, RefreshTokenRepository, RoleRepository};
use ak_core::services::{
    AuthService, AuthServiceConfig, BcryptPasswordHasher, Clock, RandomTokenGenerator,
    RefreshTokenStore, SystemClock, TokenCodec, TokenLifecycleEngine, TokenServiceConfig,
    TokenSweepService,
};
use ak_shared::config::AppConfig;
use ak_shared::errors::{error_codes, ErrorResponse};

use crate::middleware::{cors::create_cors, JwtAuth};
use crate::routes::auth::{
    change_password::change_password, login::login, logout::logout, me::me, refresh::refresh,
    register::register, AppState,
};
use crate::routes::health::health_check;

/// Services built from configuration around a set of repositories
pub struct Services<U, Ro, R>
where
    U: AccountRepository + 'static,
    Ro: RoleRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    pub state: web::Data<AppState<U, Ro, R>>,
    pub sweeper: Arc<TokenSweepService<R, U>>,
}

/// Build the token codec, lifecycle engine, session façade and sweeper
///
/// # Returns
/// * `Err(TokenError::WeakSecret)` - Signing secret shorter than 32 bytes
pub fn build_services<U, Ro, R>(
    config: &AppConfig,
    accounts: Arc<U>,
    roles: Arc<Ro>,
    tokens: Arc<R>,
    clock: Arc<dyn Clock>,
) -> Result<Services<U, Ro, R>, DomainError>
where
    U: AccountRepository + 'static,
    Ro: RoleRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    let token_config = TokenServiceConfig::from(&config.auth.jwt);
    let codec = Arc::new(TokenCodec::new(token_config.clone(), clock.clone())?);

    let store = RefreshTokenStore::new(
        tokens,
        Arc::new(RandomTokenGenerator),
        clock.clone(),
        token_config.refresh_ttl(),
    );
    let lifecycle = Arc::new(TokenLifecycleEngine::new(
        codec.clone(),
        store,
        accounts.clone(),
        clock,
    ));

    let auth_service = Arc::new(AuthService::new(
        accounts,
        roles,
        lifecycle.clone(),
        Arc::new(BcryptPasswordHasher::new(config.auth.password_hash_cost)),
        AuthServiceConfig::from(&config.auth),
    ));

    let sweeper = Arc::new(TokenSweepService::new(lifecycle, config.auth.sweep.clone()));

    Ok(Services {
        state: web::Data::new(AppState::new(auth_service, codec)),
        sweeper,
    })
}

/// Same as [`build_services`] with the system clock
pub fn build_services_with_system_clock<U, Ro, R>(
    config: &AppConfig,
    accounts: Arc<U>,
    roles: Arc<Ro>,
    tokens: Arc<R>,
) -> Result<Services<U, Ro, R>, DomainError>
where
    U: AccountRepository + 'static,
    Ro: RoleRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    build_services(config, accounts, roles, tokens, Arc::new(SystemClock))
}

/// Create and configure the application with all dependencies
pub fn create_app<U, Ro, R>(
    app_state: web::Data<AppState<U, Ro, R>>,
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
>
where
    U: AccountRepository + 'static,
    Ro: RoleRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    let bearer = JwtAuth::new(app_state.codec.clone());

    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(|err, _req| {
            let body = ErrorResponse::new(error_codes::VALIDATION_ERROR, err.to_string());
            actix_web::error::InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(body),
            )
            .into()
        }))
        .wrap(Logger::default())
        .wrap(create_cors(config.environment))
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api/v1/auth")
                .route("/register", web::post().to(register::<U, Ro, R>))
                .route("/login", web::post().to(login::<U, Ro, R>))
                .route("/refresh", web::post().to(refresh::<U, Ro, R>))
                .service(
                    web::resource("/logout")
                        .wrap(bearer.clone())
                        .route(web::post().to(logout::<U, Ro, R>)),
                )
                .service(
                    web::resource("/me")
                        .wrap(bearer.clone())
                        .route(web::get().to(me::<U, Ro, R>)),
                )
                .service(
                    web::resource("/change-password")
                        .wrap(bearer)
                        .route(web::put().to(change_password::<U, Ro, R>)),
                ),
        )
        .default_service(web::route().to(not_found))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
