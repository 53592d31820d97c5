//! Role gate probes. Each endpoint answers 200 only when the caller
//! holds the named role.

use axum::{
    extract::Extension,
    http::HeaderMap,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use crate::api::handlers::{authenticate, detail, types::RoleCheckResponse};
use crate::error::ErrorResponse;
use crate::provider::{types::Role, Provider};

async fn require_role(provider: &Provider, headers: &HeaderMap, required: Role) -> Response {
    let caller = match authenticate(provider, headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    if caller.role != required {
        return detail(
            StatusCode::FORBIDDEN,
            &format!("Access denied: {required} role required"),
        );
    }

    let response = RoleCheckResponse {
        message: "Access authorized".to_string(),
        role: caller.role,
        user_id: caller.id,
    };

    (StatusCode::OK, Json(response)).into_response()
}

#[utoipa::path(
    get,
    path = "/api/auth/validate-manager",
    responses(
        (status = 200, description = "Caller is a manager", body = RoleCheckResponse, content_type = "application/json"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller holds another role", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, headers))]
pub async fn validate_manager(
    provider: Extension<Arc<Provider>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    require_role(&provider, &headers, Role::Manager).await
}

#[utoipa::path(
    get,
    path = "/api/auth/validate-employee",
    responses(
        (status = 200, description = "Caller is an employee", body = RoleCheckResponse, content_type = "application/json"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller holds another role", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, headers))]
pub async fn validate_employee(
    provider: Extension<Arc<Provider>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    require_role(&provider, &headers, Role::Employee).await
}

#[utoipa::path(
    get,
    path = "/api/auth/validate-sponsor",
    responses(
        (status = 200, description = "Caller is a sponsor", body = RoleCheckResponse, content_type = "application/json"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller holds another role", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, headers))]
pub async fn validate_sponsor(
    provider: Extension<Arc<Provider>>,
    headers: HeaderMap,
) -> impl IntoResponse {
    require_role(&provider, &headers, Role::Sponsor).await
}
