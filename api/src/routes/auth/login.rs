use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use ak_core::repositories::{AccountRepository, RefreshTokenRepository, RoleRepository};

use crate::dto::{ApiResponse, AuthResponse, LoginRequest};
use crate::handlers::{handle_domain_error, validation_error};

use super::{client_info, AppState};

/// Handler for POST /api/v1/auth/login
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "success": true,
///     "message": "Login successful",
///     "data": {
///         "access_token": "eyJ...",
///         "refresh_token": "opaque",
///         "token_type": "Bearer",
///         "expires_in": 900,
///         "user_info": { "id": "...", "username": "alice", "roles": ["USER"] }
///     }
/// }
/// ```
///
/// ## Errors
/// - 401 Unauthorized: Unknown user, disabled account or wrong password
pub async fn login<U, Ro, R>(
    req: HttpRequest,
    state: web::Data<AppState<U, Ro, R>>,
    request: web::Json<LoginRequest>,
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
        .login(&request.username, &request.password, &client)
        .await
    {
        Ok(session) => HttpResponse::Ok().json(ApiResponse::success(
            "Login successful",
            AuthResponse::from(session),
        )),
        Err(error) => handle_domain_error(&error),
    }
}
