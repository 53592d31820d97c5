use axum::{
    extract::Extension, http::HeaderMap, http::StatusCode, response::IntoResponse, Json,
};
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::api::handlers::{extract_bearer_token, types::MessageResponse};
use crate::provider::Provider;

/// Revoke the caller's session upstream. Always answers 200, the client
/// drops its token either way.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse, content_type = "application/json"),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, headers))]
pub async fn logout(provider: Extension<Arc<Provider>>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = extract_bearer_token(&headers) {
        if let Err(err) = provider.sign_out(&token).await {
            warn!("Failed to revoke session upstream: {err}");
        }
    }

    let response = MessageResponse {
        message: "Logged out successfully".to_string(),
    };

    (StatusCode::OK, Json(response))
}
