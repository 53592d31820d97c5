//! Calls against the provider auth API.

use secrecy::ExposeSecret;
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use super::types::{ProviderUser, Session, SignUp};
use super::{api_error, get_required_str, Provider, ProviderError};

impl Provider {
    /// Creates an identity on the auth API.
    ///
    /// # Errors
    /// Returns an error if the request fails, the provider rejects the
    /// signup, or the response carries no user id.
    #[instrument(skip(self, password))]
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp, ProviderError> {
        let url = self.endpoint("/auth/v1/signup");
        let payload = json!({ "email": email, "password": password });

        let response = self
            .client
            .post(&url)
            .header("apikey", self.anon_key.expose_secret())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: Value = response.json().await?;
        parse_sign_up(&body)
    }

    /// Verifies credentials and returns the session the provider issued.
    ///
    /// # Errors
    /// Returns an error if the request fails or the credentials are
    /// rejected.
    #[instrument(skip(self, password))]
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, ProviderError> {
        let url = self.endpoint("/auth/v1/token?grant_type=password");
        let payload = json!({ "email": email, "password": password });

        let response = self
            .client
            .post(&url)
            .header("apikey", self.anon_key.expose_secret())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: Value = response.json().await?;
        parse_session(&body)
    }

    /// Resolves a bearer token to the identity it belongs to.
    ///
    /// # Errors
    /// Returns an error if the token is rejected or the response carries no
    /// user id.
    #[instrument(skip(self, token))]
    pub async fn user_from_token(&self, token: &str) -> Result<ProviderUser, ProviderError> {
        let url = self.endpoint("/auth/v1/user");

        let response = self
            .client
            .get(&url)
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let body: Value = response.json().await?;
        let id = parse_uuid(&body, &["id"])
            .ok_or_else(|| ProviderError::Decode("user response has no id".to_string()))?;

        Ok(ProviderUser {
            id,
            email: get_required_str(&body, &["email"]).map(ToString::to_string),
        })
    }

    /// Revokes the session behind a bearer token.
    ///
    /// # Errors
    /// Returns an error if the request fails or the provider rejects it.
    #[instrument(skip(self, token))]
    pub async fn sign_out(&self, token: &str) -> Result<(), ProviderError> {
        let url = self.endpoint("/auth/v1/logout");

        let response = self
            .client
            .post(&url)
            .header("apikey", self.anon_key.expose_secret())
            .bearer_auth(token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }

    /// Asks the provider to send a password recovery email.
    ///
    /// # Errors
    /// Returns an error if the request fails or the provider rejects it.
    #[instrument(skip(self))]
    pub async fn send_recovery_email(&self, email: &str) -> Result<(), ProviderError> {
        let url = self.endpoint("/auth/v1/recover");
        let payload = json!({ "email": email });

        let response = self
            .client
            .post(&url)
            .header("apikey", self.anon_key.expose_secret())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }

    /// Removes an identity with the service key. Used to roll back a
    /// registration whose profile row could not be created.
    ///
    /// # Errors
    /// Returns an error if the request fails or the provider rejects it.
    #[instrument(skip(self))]
    pub async fn admin_delete_user(&self, user_id: Uuid) -> Result<(), ProviderError> {
        let url = self.endpoint(&format!("/auth/v1/admin/users/{user_id}"));

        let response = self
            .client
            .delete(&url)
            .header("apikey", self.service_key.expose_secret())
            .bearer_auth(self.service_key.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }
}

/// Signup bodies come in two shapes: a full session when confirmation is
/// disabled, a bare user otherwise.
fn parse_sign_up(body: &Value) -> Result<SignUp, ProviderError> {
    let access_token = get_required_str(body, &["access_token"]);

    let user_id = match access_token {
        Some(_) => parse_uuid(body, &["user", "id"]),
        None => parse_uuid(body, &["id"]),
    }
    .ok_or_else(|| ProviderError::Decode("signup response has no user id".to_string()))?;

    Ok(SignUp {
        user_id,
        access_token: access_token.map(ToString::to_string),
        expires_in: body.get("expires_in").and_then(Value::as_u64),
    })
}

fn parse_session(body: &Value) -> Result<Session, ProviderError> {
    let access_token = get_required_str(body, &["access_token"])
        .ok_or_else(|| ProviderError::Decode("session has no access_token".to_string()))?;

    let user_id = parse_uuid(body, &["user", "id"])
        .ok_or_else(|| ProviderError::Decode("session has no user id".to_string()))?;

    Ok(Session {
        access_token: access_token.to_string(),
        expires_in: body.get("expires_in").and_then(Value::as_u64).unwrap_or(3600),
        user_id,
    })
}

fn parse_uuid(body: &Value, path: &[&str]) -> Option<Uuid> {
    get_required_str(body, path).and_then(|raw| Uuid::parse_str(raw).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const USER_ID: &str = "b9e6ad6f-9b4e-44d9-9171-6e0056b1a7c4";

    #[test]
    fn sign_up_parses_session_shaped_bodies() {
        let body = json!({
            "access_token": "token-123",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": { "id": USER_ID, "email": "ana@example.com" }
        });

        let sign_up = parse_sign_up(&body).unwrap();
        assert_eq!(sign_up.user_id.to_string(), USER_ID);
        assert_eq!(sign_up.access_token.as_deref(), Some("token-123"));
        assert_eq!(sign_up.expires_in, Some(3600));
    }

    #[test]
    fn sign_up_parses_user_shaped_bodies() {
        let body = json!({
            "id": USER_ID,
            "email": "ana@example.com",
            "confirmation_sent_at": "2025-06-01T12:00:00Z"
        });

        let sign_up = parse_sign_up(&body).unwrap();
        assert_eq!(sign_up.user_id.to_string(), USER_ID);
        assert!(sign_up.access_token.is_none());
        assert!(sign_up.expires_in.is_none());
    }

    #[test]
    fn sign_up_rejects_bodies_without_a_user_id() {
        let body = json!({ "email": "ana@example.com" });
        assert!(matches!(
            parse_sign_up(&body),
            Err(ProviderError::Decode(_))
        ));
    }

    #[test]
    fn session_requires_token_and_user_id() {
        let body = json!({
            "access_token": "token-123",
            "expires_in": 900,
            "user": { "id": USER_ID }
        });

        let session = parse_session(&body).unwrap();
        assert_eq!(session.access_token, "token-123");
        assert_eq!(session.expires_in, 900);
        assert_eq!(session.user_id.to_string(), USER_ID);

        assert!(parse_session(&json!({ "user": { "id": USER_ID } })).is_err());
        assert!(parse_session(&json!({ "access_token": "token-123" })).is_err());
    }

    #[test]
    fn session_defaults_expiry_when_missing() {
        let body = json!({
            "access_token": "token-123",
            "user": { "id": USER_ID }
        });

        assert_eq!(parse_session(&body).unwrap().expires_in, 3600);
    }
}
