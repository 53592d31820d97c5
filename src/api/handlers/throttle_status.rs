use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::instrument;

use crate::api::handlers::types::ThrottleStatusResponse;
use crate::throttle::Throttle;

/// Expose the backoff tracker so operators can see where the cooldown
/// stands without tripping it.
#[utoipa::path(
    get,
    path = "/api/auth/rate-limit-status",
    responses(
        (status = 200, description = "Current throttle snapshot", body = ThrottleStatusResponse, content_type = "application/json"),
    ),
    tag = "auth"
)]
#[instrument(skip(throttle))]
pub async fn throttle_status(throttle: Extension<Arc<Throttle>>) -> impl IntoResponse {
    let response = ThrottleStatusResponse {
        status: "ok".to_string(),
        rate_limiting: throttle.status(),
    };

    (StatusCode::OK, Json(response))
}
