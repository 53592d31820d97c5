//! API handlers and shared utilities.
//!
//! Routes delegate identity checks and persistence to the hosted provider;
//! the helpers here cover what every protected route repeats: pulling the
//! bearer token, resolving it to a profile row, and shaping error bodies.

pub mod employee;
pub mod health;
pub mod login;
pub mod logout;
pub mod me;
pub mod password_reset;
pub mod register;
pub mod roles;
pub mod root;
pub mod throttle_status;
pub mod types;

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use regex::Regex;
use tracing::error;

use crate::error::ErrorResponse;
use crate::provider::{types::UserRecord, Provider};

/// Lightweight email sanity check used before anything is sent upstream.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// JSON error body with a detail message.
pub(crate) fn detail(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            detail: message.to_string(),
        }),
    )
        .into_response()
}

/// 401 with a bearer challenge, for token extraction and verification
/// failures.
pub(crate) fn unauthorized(message: &str) -> Response {
    let mut response = detail(StatusCode::UNAUTHORIZED, message);
    response.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Bearer"),
    );
    response
}

pub(crate) fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Resolves the request's bearer token to the profile row it belongs to.
///
/// The provider decides whether the token is valid; the profile row must
/// also exist, otherwise the identity is unusable.
///
/// # Errors
/// Returns a ready response: 401 for a missing or rejected token, 404 for
/// a missing profile row, 500 when the lookup itself fails.
pub(crate) async fn authenticate(
    provider: &Provider,
    headers: &HeaderMap,
) -> Result<UserRecord, Response> {
    let Some(token) = extract_bearer_token(headers) else {
        return Err(unauthorized("Authorization token required"));
    };

    let provider_user = match provider.user_from_token(&token).await {
        Ok(user) => user,
        Err(err) => {
            error!("Token verification failed: {err}");
            return Err(unauthorized("Invalid token"));
        }
    };

    match provider.fetch_user(provider_user.id).await {
        Ok(Some(record)) => Ok(record),
        Ok(None) => Err(detail(StatusCode::NOT_FOUND, "User not found")),
        Err(err) => {
            error!("Failed to load user profile: {err}");
            Err(detail(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error",
            ))
        }
    }
}
