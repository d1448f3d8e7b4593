use actix_web::{web, HttpResponse};

use ak_core::repositories::{AccountRepository, RefreshTokenRepository, RoleRepository};

use crate::dto::ApiResponse;
use crate::handlers::handle_domain_error;
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for GET /api/v1/auth/me
pub async fn me<U, Ro, R>(state: web::Data<AppState<U, Ro, R>>, auth: AuthContext) -> HttpResponse
where
    U: AccountRepository + 'static,
    Ro: RoleRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    match state.auth_service.get_user_info(&auth.username).await {
        Ok(info) => HttpResponse::Ok().json(ApiResponse::success("Current user", info)),
        Err(error) => handle_domain_error(&error),
    }
}
