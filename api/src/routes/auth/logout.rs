use actix_web::{web, HttpResponse};
use validator::Validate;

use ak_core::repositories::{AccountRepository, RefreshTokenRepository, RoleRepository};

use crate::dto::{ApiResponse, LogoutRequest};
use crate::handlers::{handle_domain_error, validation_error};
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for POST /api/v1/auth/logout
///
/// Requires a bearer token; the body names the refresh token to revoke.
/// Unknown or already revoked refresh tokens still answer 200.
///
/// # Headers
///
/// ```text
/// Authorization: Bearer {access_token}
/// ```
pub async fn logout<U, Ro, R>(
    state: web::Data<AppState<U, Ro, R>>,
    auth: AuthContext,
    request: web::Json<LogoutRequest>,
) -> HttpResponse
where
    U: AccountRepository + 'static,
    Ro: RoleRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error(&errors);
    }

    match state.auth_service.logout(&request.refresh_token).await {
        Ok(()) => {
            log::info!("Logout requested by user {}", auth.user_id);
            HttpResponse::Ok().json(ApiResponse::message("Logout successful"))
        }
        Err(error) => handle_domain_error(&error),
    }
}
