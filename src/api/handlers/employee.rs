//! Employee profile creation, gated on the caller's role.

use axum::{
    extract::Extension, http::HeaderMap, http::StatusCode, response::IntoResponse, Json,
};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::api::handlers::{authenticate, detail, types::EmployeeCreateRequest};
use crate::error::ErrorResponse;
use crate::provider::{
    is_unique_violation,
    types::{EmployeeRecord, NewEmployeeRecord, Role},
    Provider,
};

#[utoipa::path(
    post,
    path = "/api/auth/employee-profile",
    request_body = EmployeeCreateRequest,
    responses(
        (status = 201, description = "Employee profile created", body = EmployeeRecord, content_type = "application/json"),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 403, description = "Caller may not create this profile", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, headers, payload))]
pub async fn create_employee_profile(
    provider: Extension<Arc<Provider>>,
    headers: HeaderMap,
    payload: Option<Json<EmployeeCreateRequest>>,
) -> impl IntoResponse {
    let caller = match authenticate(&provider, &headers).await {
        Ok(user) => user,
        Err(response) => return response,
    };

    let Some(Json(request)) = payload else {
        return detail(StatusCode::BAD_REQUEST, "Missing payload");
    };

    if let Err(message) = request.validate() {
        return detail(StatusCode::BAD_REQUEST, message);
    }

    // Managers may create any profile, everyone else only their own.
    if caller.role != Role::Manager && caller.id != request.user_id {
        return detail(
            StatusCode::FORBIDDEN,
            "You do not have permission to create this profile",
        );
    }

    let target = match provider.fetch_user(request.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return detail(StatusCode::BAD_REQUEST, "User does not exist");
        }
        Err(err) => {
            error!("Failed to load target user: {err}");
            return detail(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
        }
    };

    if target.role != Role::Employee {
        return detail(StatusCode::BAD_REQUEST, "User must have the employee role");
    }

    let now = Utc::now();
    let record = NewEmployeeRecord {
        user_id: request.user_id,
        name: request.name.trim().to_string(),
        identification: request.identification.trim().to_string(),
        position: request.position,
        phone: request.phone,
        address: request.address,
        salary_type: request.salary_type,
        salary_hourly: request.salary_hourly,
        salary_biweekly: request.salary_biweekly,
        salary_monthly: request.salary_monthly,
        resume_url: request.resume_url,
        status: request.status,
        created_at: now,
        updated_at: now,
    };

    match provider.insert_employee(&record).await {
        Ok(created) => {
            debug!("created employee profile {} for {}", created.id, created.user_id);
            (StatusCode::CREATED, Json(created)).into_response()
        }
        Err(err) if is_unique_violation(&err) => {
            detail(StatusCode::BAD_REQUEST, "Identification is already registered")
        }
        Err(err) => {
            error!("Failed to insert employee profile: {err}");
            detail(StatusCode::INTERNAL_SERVER_ERROR, "Error creating employee profile")
        }
    }
}
