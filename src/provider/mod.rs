//! HTTP client for the hosted backend.
//!
//! One base URL fronts two surfaces: the auth API under `/auth/v1` and the
//! table REST API under `/rest/v1`. Every call carries an `apikey` header
//! plus a bearer key. Table and admin calls use the service key, the rest
//! use the anon key.

pub mod auth;
pub mod records;
pub mod types;

use anyhow::{anyhow, Result};
use reqwest::{Client, StatusCode};
use secrecy::SecretString;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::APP_USER_AGENT;

#[derive(Debug, Error)]
pub enum ProviderError {
    /// Provider answered with a non-success status.
    #[error("{status}, {message}")]
    Api { status: StatusCode, message: String },

    /// Request failed before producing a response body.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// Provider answered 2xx but the body misses expected fields.
    #[error("unexpected provider response: {0}")]
    Decode(String),
}

/// Table inserts surface uniqueness conflicts with the Postgres duplicate
/// key wording or the 23505 SQLSTATE; everything else stays a generic API
/// failure.
#[must_use]
pub fn is_unique_violation(error: &ProviderError) -> bool {
    match error {
        ProviderError::Api { message, .. } => {
            let message = message.to_lowercase();
            message.contains("duplicate key value") || message.contains("23505")
        }
        _ => false,
    }
}

/// Client for the hosted auth and table APIs.
#[derive(Debug, Clone)]
pub struct Provider {
    client: Client,
    origin: String,
    anon_key: SecretString,
    service_key: SecretString,
}

impl Provider {
    /// # Errors
    /// Returns an error if the base URL cannot be parsed or the HTTP client
    /// cannot be built.
    pub fn new(
        base_url: &str,
        anon_key: SecretString,
        service_key: SecretString,
    ) -> Result<Self> {
        let origin = origin_url(base_url)?;

        let client = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self {
            client,
            origin,
            anon_key,
            service_key,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.origin, path)
    }

    /// Probes the auth API health endpoint.
    ///
    /// # Errors
    /// Returns an error if the provider is unreachable or unhealthy.
    #[instrument(skip(self))]
    pub async fn health(&self) -> Result<(), ProviderError> {
        use secrecy::ExposeSecret;

        let url = self.endpoint("/auth/v1/health");

        let response = self
            .client
            .get(&url)
            .header("apikey", self.anon_key.expose_secret())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        Ok(())
    }
}

/// Normalizes the provider base URL to `scheme://host:port`.
#[instrument]
fn origin_url(base_url: &str) -> Result<String> {
    let url = Url::parse(base_url)?;

    let scheme = url.scheme();

    let host = url
        .host()
        .ok_or_else(|| anyhow!("Error parsing URL: no host specified"))?
        .to_owned();

    let port = match url.port() {
        Some(p) => p,
        None => match scheme {
            "http" => 80,
            "https" => 443,
            _ => return Err(anyhow!("Error parsing URL: unsupported scheme {scheme}")),
        },
    };

    let origin = format!("{scheme}://{host}:{port}");

    debug!("provider origin: {}", origin);

    Ok(origin)
}

fn provider_error_message(json_response: &Value) -> &str {
    for key in ["msg", "message", "error_description", "error"] {
        if let Some(message) = json_response.get(key).and_then(Value::as_str) {
            return message;
        }
    }
    ""
}

fn get_required_str<'a>(json_response: &'a Value, path: &[&str]) -> Option<&'a str> {
    let mut current = json_response;
    for key in path {
        current = current.get(*key)?;
    }
    current.as_str()
}

async fn api_error(response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let message = response
        .json::<Value>()
        .await
        .map(|body| provider_error_message(&body).to_string())
        .unwrap_or_default();

    ProviderError::Api { status, message }
}
