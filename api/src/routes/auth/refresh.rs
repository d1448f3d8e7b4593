use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use ak_core::repositories::{AccountRepository, RefreshTokenRepository, RoleRepository};

use crate::dto::{ApiResponse, AuthResponse, RefreshTokenRequest};
use crate::handlers::{handle_domain_error, validation_error};

use super::{client_info, AppState};

/// Handler for POST /api/v1/auth/refresh
///
/// Exchanges a refresh token for a new access/refresh pair. The presented
/// token is revoked whether or not the exchange completes.
///
/// ## Errors
/// - 401 Unauthorized: Unknown, revoked or expired refresh token
pub async fn refresh<U, Ro, R>(
    req: HttpRequest,
    state: web::Data<AppState<U, Ro, R>>,
    request: web::Json<RefreshTokenRequest>,
) -> HttpResponse
where
    U: AccountRepository + 'static,
    Ro: RoleRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error(&errors);
    }

    let client = client_info(&req);

    match state
        .auth_service
        .refresh(&request.refresh_token, &client)
        .await
    {
        Ok(session) => HttpResponse::Ok().json(ApiResponse::success(
            "Token refreshed",
            AuthResponse::from(session),
        )),
        Err(error) => handle_domain_error(&error),
    }
}
