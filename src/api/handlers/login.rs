//! Login: verify credentials upstream, load the profile row, audit.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, instrument, warn};

use crate::api::handlers::{
    detail,
    types::{AuthResponse, LoginRequest},
    valid_email,
};
use crate::error::{AuthError, ErrorResponse};
use crate::provider::{types::NewAuditLog, Provider, ProviderError};
use crate::throttle::Throttle;

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse, content_type = "application/json"),
        (status = 401, description = "Invalid credentials or unconfirmed email", body = ErrorResponse),
        (status = 404, description = "No profile row for this identity", body = ErrorResponse),
        (status = 429, description = "Too many login attempts", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, throttle, payload))]
pub async fn login(
    provider: Extension<Arc<Provider>>,
    throttle: Extension<Arc<Throttle>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return detail(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let email = request.email.trim().to_lowercase();

    if !valid_email(&email) {
        return detail(StatusCode::BAD_REQUEST, "Invalid email");
    }

    let session = match provider.sign_in(&email, &request.password).await {
        Ok(session) => session,
        Err(ProviderError::Decode(err)) => {
            // Provider answered success but issued no usable session.
            error!("Sign-in response carried no session: {err}");
            return AuthError::InvalidCredentials.into_response();
        }
        Err(err) => {
            error!("Login rejected upstream: {err}");
            return throttle.classify(&err.to_string(), "login").into_response();
        }
    };

    let user = match provider.fetch_user(session.user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            return detail(StatusCode::NOT_FOUND, "User not found in database");
        }
        Err(err) => {
            error!("Failed to load user profile: {err}");
            return throttle.classify(&err.to_string(), "login").into_response();
        }
    };

    let now = Utc::now();
    let entry = NewAuditLog {
        user_id: session.user_id,
        action: "LOGIN".to_string(),
        table_name: "users".to_string(),
        record_id: None,
        old_data: None,
        new_data: Some(json!({ "login_time": now.to_rfc3339() })),
        created_at: now,
    };

    // Auditing is best effort; a failed insert must not block the login.
    if let Err(err) = provider.insert_audit_log(&entry).await {
        warn!("Failed to record login audit entry: {err}");
    }

    let response = AuthResponse {
        access_token: session.access_token,
        token_type: "bearer".to_string(),
        expires_in: session.expires_in,
        user,
    };

    (StatusCode::OK, Json(response)).into_response()
}
