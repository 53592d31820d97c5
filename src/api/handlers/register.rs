//! Registration: create the identity upstream, then its profile row.

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::api::handlers::{
    detail,
    types::{valid_password, AuthResponse, RegisterRequest},
    valid_email,
};
use crate::error::ErrorResponse;
use crate::provider::{is_unique_violation, types::NewUserRecord, Provider, ProviderError};
use crate::throttle::Throttle;

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = AuthResponse, content_type = "application/json"),
        (status = 400, description = "Invalid payload or email already registered", body = ErrorResponse),
        (status = 429, description = "Too many registration attempts", body = ErrorResponse),
        (status = 503, description = "Registration disabled upstream", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, throttle, payload))]
pub async fn register(
    provider: Extension<Arc<Provider>>,
    throttle: Extension<Arc<Throttle>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return detail(StatusCode::BAD_REQUEST, "Missing payload");
    };

    let email = request.email.trim().to_lowercase();

    if !valid_email(&email) {
        return detail(StatusCode::BAD_REQUEST, "Invalid email");
    }

    if !valid_password(&request.password) {
        return detail(
            StatusCode::BAD_REQUEST,
            "Password must be between 6 and 100 characters",
        );
    }

    let sign_up = match provider.sign_up(&email, &request.password).await {
        Ok(sign_up) => sign_up,
        Err(ProviderError::Decode(err)) => {
            error!("Signup response carried no user: {err}");
            return detail(StatusCode::BAD_REQUEST, "Error creating user account");
        }
        Err(err) => {
            error!("Registration rejected upstream: {err}");
            return throttle
                .classify(&err.to_string(), "register")
                .into_response();
        }
    };

    debug!("created auth user {}", sign_up.user_id);

    let now = Utc::now();
    let record = NewUserRecord {
        id: sign_up.user_id,
        email: email.clone(),
        role: request.role,
        created_at: now,
        updated_at: now,
    };

    let user = match provider.insert_user(&record).await {
        Ok(user) => user,
        Err(err) => {
            error!("Failed to create user profile: {err}");
            // The identity exists upstream without a profile row. Remove it
            // so the email can be registered again.
            if let Err(cleanup) = provider.admin_delete_user(sign_up.user_id).await {
                error!(
                    "Failed to roll back auth user {}: {cleanup}",
                    sign_up.user_id
                );
            }
            if is_unique_violation(&err) {
                return detail(StatusCode::BAD_REQUEST, "Email is already registered");
            }
            return detail(StatusCode::INTERNAL_SERVER_ERROR, "Error creating user");
        }
    };

    let response = AuthResponse {
        access_token: sign_up.access_token.unwrap_or_default(),
        token_type: "bearer".to_string(),
        expires_in: sign_up.expires_in.unwrap_or(3600),
        user,
    };

    (StatusCode::CREATED, Json(response)).into_response()
}
