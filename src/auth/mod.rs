//! Email/password authentication against the backend's identity service.
//!
//! Failures carry the service's own error message verbatim so the sign-in
//! and sign-up forms can show it as-is.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

pub mod commands;

const IDENTITY_API: &str = "https://identitytoolkit.googleapis.com/v1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub local_id: String,
    pub email: String,
    pub id_token: String,
    #[serde(default)]
    pub refresh_token: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// The identity service refused the request; holds its message.
    #[error("{0}")]
    Rejected(String),
    #[error("auth request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("auth is not configured: {0}")]
    NotConfigured(&'static str),
}

#[async_trait]
pub trait AuthClient: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError>;
}

pub struct IdentityToolkit {
    http: Client,
    api_key: String,
}

impl IdentityToolkit {
    pub fn new(http: Client, api_key: impl Into<String>) -> Self {
        Self {
            http,
            api_key: api_key.into(),
        }
    }

    async fn call(&self, action: &str, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        if self.api_key.is_empty() {
            return Err(AuthError::NotConfigured("missing API key"));
        }

        let response = self
            .http
            .post(format!("{IDENTITY_API}/accounts:{action}"))
            .query(&[("key", self.api_key.as_str())])
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true
            }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(AuthError::Rejected(rejection_message(&body)));
        }

        serde_json::from_str(&body)
            .map_err(|err| AuthError::Rejected(format!("unexpected auth response: {err}")))
    }
}

#[async_trait]
impl AuthClient for IdentityToolkit {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.call("signInWithPassword", email, password).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        self.call("signUp", email, password).await
    }
}

/// Pulls `error.message` out of an identity-service error body, falling back
/// to the raw body.
pub fn rejection_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().to_string())
}
