use axum::{http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ServiceInfo {
    message: String,
    version: String,
    docs: String,
}

/// Service banner pointing at the interactive docs.
#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = 200, description = "Service banner", body = ServiceInfo, content_type = "application/json"),
    ),
    tag = "health"
)]
pub async fn root() -> impl IntoResponse {
    let info = ServiceInfo {
        message: "Welcome to the Gardisto API".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        docs: "/swagger-ui".to_string(),
    };

    (StatusCode::OK, Json(info))
}
