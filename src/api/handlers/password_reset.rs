use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::{error, instrument};

use crate::api::handlers::{
    detail,
    types::{MessageResponse, PasswordResetRequest},
    valid_email,
};
use crate::error::ErrorResponse;
use crate::provider::Provider;

/// Ask the provider to send a recovery email. The reply never reveals
/// whether the address is registered.
#[utoipa::path(
    post,
    path = "/api/auth/password-reset",
    request_body = PasswordResetRequest,
    responses(
        (status = 200, description = "Recovery email requested", body = MessageResponse, content_type = "application/json"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Provider failure", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, payload))]
pub async fn password_reset(
    provider: Extension<Arc<Provider>>,
    payload: Option<Json<PasswordResetRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return detail(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let email = request.email.trim().to_lowercase();

    if !valid_email(&email) {
        return detail(StatusCode::BAD_REQUEST, "Invalid email");
    }

    if let Err(err) = provider.send_recovery_email(&email).await {
        error!("Failed to request recovery email: {err}");
        return detail(StatusCode::INTERNAL_SERVER_ERROR, "Error sending recovery email");
    }

    let response = MessageResponse {
        message: "Password reset email sent".to_string(),
    };

    (StatusCode::OK, Json(response)).into_response()
}
