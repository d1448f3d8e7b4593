use actix_web::{web, HttpResponse};
use validator::Validate;

use ak_core::domain::value_objects::UserInfo;
use ak_core::repositories::{AccountRepository, RefreshTokenRepository, RoleRepository};

use crate::dto::{ApiResponse, RegisterRequest};
use crate::handlers::{handle_domain_error, validation_error};

use super::AppState;

/// Handler for POST /api/v1/auth/register
///
/// Creates an account holding the default role. Does not log in.
///
/// # Request Body
///
/// ```json
/// {
///     "username": "alice",
///     "password": "Secret123!",
///     "full_name": "Alice Liddell"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Validation failed
/// - 409 Conflict: Username already taken
pub async fn register<U, Ro, R>(
    state: web::Data<AppState<U, Ro, R>>,
    request: web::Json<RegisterRequest>,
) -> HttpResponse
where
    U: AccountRepository + 'static,
    Ro: RoleRepository + 'static,
    R: RefreshTokenRepository + 'static,
{
    if let Err(errors) = request.validate() {
        return validation_error(&errors);
    }

    let RegisterRequest {
        username,
        password,
        full_name,
    } = request.into_inner();

    match state
        .auth_service
        .register(&username, &password, full_name)
        .await
    {
        Ok(account) => HttpResponse::Created().json(ApiResponse::success(
            "Registration successful",
            UserInfo::from(&account),
        )),
        Err(error) => handle_domain_error(&error),
    }
}
