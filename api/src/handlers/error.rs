//! Domain error to HTTP response mapping
//!
//! Token failures collapse to one `401 Unauthorized` so callers cannot tell
//! a forged token from an expired one. Internal details are logged and
//! never returned.

use actix_web::{http::StatusCode, HttpResponse};
use validator::ValidationErrors;

use ak_core::errors::{AuthError, DomainError, TokenError};
use ak_shared::errors::{error_codes, ErrorResponse};

fn respond(status: StatusCode, error: &str, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse::new(error, message))
}

/// The generic response for a missing or unusable bearer token
pub fn unauthorized() -> HttpResponse {
    respond(StatusCode::UNAUTHORIZED, error_codes::UNAUTHORIZED, "Unauthorized")
}

/// 400 listing every failing field
pub fn validation_error(errors: &ValidationErrors) -> HttpResponse {
    let mut response = ErrorResponse::new(error_codes::VALIDATION_ERROR, "Invalid request");

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors
            .iter()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .collect();
        response = response.add_detail(field, messages);
    }

    HttpResponse::BadRequest().json(response)
}

/// Handle domain errors and convert them to appropriate HTTP responses
pub fn handle_domain_error(error: &DomainError) -> HttpResponse {
    match error {
        DomainError::Auth(auth_error) => match auth_error {
            AuthError::BadCredentials => respond(
                StatusCode::UNAUTHORIZED,
                error_codes::BAD_CREDENTIALS,
                "Invalid username or password",
            ),
            AuthError::AccountDisabled => {
                log::debug!("Refresh rejected for disabled account");
                invalid_refresh_token()
            }
            AuthError::AccountNotFound => unauthorized(),
            AuthError::InvalidPassword => respond(
                StatusCode::BAD_REQUEST,
                error_codes::INVALID_PASSWORD,
                "Current password is incorrect",
            ),
            AuthError::AlreadyExists { username } => respond(
                StatusCode::CONFLICT,
                error_codes::ALREADY_EXISTS,
                &format!("Username '{}' is already taken", username),
            ),
            AuthError::RoleNotFound { .. } => internal(error),
        },
        DomainError::Token(token_error) => match token_error {
            TokenError::InvalidRefreshToken { reason } => {
                log::debug!("Refresh token rejected: {}", reason);
                invalid_refresh_token()
            }
            TokenError::InvalidSignature | TokenError::Malformed | TokenError::Expired => {
                unauthorized()
            }
            TokenError::GenerationFailed | TokenError::WeakSecret { .. } => internal(error),
        },
        DomainError::Validation { message } => {
            respond(StatusCode::BAD_REQUEST, error_codes::VALIDATION_ERROR, message)
        }
        DomainError::NotFound { resource } => respond(
            StatusCode::NOT_FOUND,
            error_codes::NOT_FOUND,
            &format!("{} not found", resource),
        ),
        DomainError::Internal { .. } => internal(error),
    }
}

fn invalid_refresh_token() -> HttpResponse {
    respond(
        StatusCode::UNAUTHORIZED,
        error_codes::INVALID_REFRESH_TOKEN,
        "Invalid refresh token",
    )
}

fn internal(error: &DomainError) -> HttpResponse {
    log::error!("Internal error: {:?}", error);
    respond(
        StatusCode::INTERNAL_SERVER_ERROR,
        error_codes::INTERNAL_ERROR,
        "An internal error occurred",
    )
}
