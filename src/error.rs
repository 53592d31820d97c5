//! Failure taxonomy for auth flows.
//!
//! Every upstream failure is folded into one of these kinds before it
//! reaches the wire, so clients see a stable set of status codes and
//! messages instead of provider-specific error text.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Closed set of failures surfaced by auth operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Too many attempts in a row, the caller must back off.
    #[error("too many requests during {operation}, wait {wait_minutes} minutes")]
    RateLimited { operation: String, wait_minutes: u64 },

    #[error("email already registered")]
    DuplicateUser,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("email not confirmed")]
    UnconfirmedEmail,

    #[error("registration disabled")]
    RegistrationDisabled,

    /// Upstream detail is logged at the call site and dropped here.
    #[error("internal error")]
    Internal,
}

/// Result alias for auth operations.
pub type AuthResult<T> = Result<T, AuthError>;

/// Wire shape for error responses.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human readable explanation of the failure.
    pub detail: String,
}

impl AuthError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::DuplicateUser => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::UnconfirmedEmail => StatusCode::UNAUTHORIZED,
            Self::RegistrationDisabled => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to hand to clients.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::RateLimited {
                operation,
                wait_minutes,
            } => match operation.as_str() {
                "register" => {
                    format!("Too many registration attempts. Wait {wait_minutes} minutes.")
                }
                "login" => format!("Too many login attempts. Wait {wait_minutes} minutes."),
                _ => format!("Too many requests. Wait {wait_minutes} minutes."),
            },
            Self::DuplicateUser => "Email is already registered".to_string(),
            Self::InvalidCredentials => "Invalid credentials".to_string(),
            Self::UnconfirmedEmail => "Email not confirmed".to_string(),
            Self::RegistrationDisabled => "Registration is temporarily disabled".to_string(),
            Self::Internal => "Internal server error".to_string(),
        }
    }

    /// `Retry-After` value in seconds, only meaningful for `RateLimited`.
    #[must_use]
    pub const fn retry_after_seconds(&self) -> Option<u64> {
        match self {
            Self::RateLimited { wait_minutes, .. } => Some(*wait_minutes * 60),
            _ => None,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let retry_after = self.retry_after_seconds();
        let body = Json(ErrorResponse {
            detail: self.public_message(),
        });

        let mut response = (status, body).into_response();
        if let Some(seconds) = retry_after {
            if let Ok(value) = HeaderValue::from_str(&seconds.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        response
    }
}
