use axum::{
    extract::Extension, http::HeaderMap, http::StatusCode, response::IntoResponse, Json,
};
use std::sync::Arc;
use tracing::instrument;

use crate::api::handlers::authenticate;
use crate::error::ErrorResponse;
use crate::provider::{types::UserRecord, Provider};

/// Return the profile row of the caller identified by the bearer token.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserRecord, content_type = "application/json"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No profile row for this identity", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, headers))]
pub async fn me(provider: Extension<Arc<Provider>>, headers: HeaderMap) -> impl IntoResponse {
    match authenticate(&provider, &headers).await {
        Ok(user) => (StatusCode::OK, Json(user)).into_response(),
        Err(response) => response,
    }
}
