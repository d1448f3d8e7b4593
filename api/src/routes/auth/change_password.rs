use actix_web::{web, HttpResponse};
use validator::Validate;

use ak_core::repositories::{AccountRepository, RefreshTokenRepository, RoleRepository};

use crate::dto::{ApiResponse, ChangePasswordRequest};
use crate::handlers::{handle_domain_error, validation_error};
use crate::middleware::auth::AuthContext;

use super::AppState;

/// Handler for PUT /api/v1/auth/change-password
///
/// Ends every session of the bearer. Access tokens already handed out keep
/// working until they expire.
///
/// ## Errors
/// - 400 Bad Request: Validation failed or current password is wrong
/// - 401 Unauthorized: Missing or invalid access token
pub async fn change_password<U, Ro, R>(
    state: web::Data<AppState<U, Ro, R>>,
    auth: AuthContext,
    request: web::Json<ChangePasswordRequest>,
) -> HttpResponse
where
    U: AccountRepository + 'static,
    Ro: RoleRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error(&errors);
    }

    match state
        .auth_service
        .change_password(&auth.username, &request.old_password, &request.new_password)
        .await
    {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::message("Password changed successfully")),
        Err(error) => handle_domain_error(&error),
    }
}
