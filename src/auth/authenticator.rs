//! Authenticator implementation
//!
//! Applies auth to outgoing requests and caches the session token.

use super::types::AuthConfig;
use crate::error::{Error, Result};
use crate::types::JsonValue;
use reqwest::{Client, RequestBuilder};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Authenticator handles applying authentication to HTTP requests
pub struct Authenticator {
    config: AuthConfig,
    /// Token obtained from a session login
    cached_token: Arc<RwLock<Option<String>>>,
    /// Client for login requests
    http_client: Client,
    /// Prefix for relative login URLs
    base_url: Option<String>,
}

impl Authenticator {
    /// Create a new authenticator with the given config
    pub fn new(config: AuthConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// Create an authenticator with a custom HTTP client
    pub fn with_client(config: AuthConfig, http_client: Client) -> Self {
        Self {
            config,
            cached_token: Arc::new(RwLock::new(None)),
            http_client,
            base_url: None,
        }
    }

    /// Resolve relative login URLs against `base_url`
    #[must_use]
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        self.base_url = base_url;
        self
    }

    /// Auth kind, for logs
    pub fn kind(&self) -> &'static str {
        self.config.kind()
    }

    /// Apply authentication to a request builder
    pub async fn apply(&self, req: RequestBuilder) -> Result<RequestBuilder> {
        match &self.config {
            AuthConfig::None => Ok(req),
            AuthConfig::Bearer { token } => Ok(req.bearer_auth(token)),
            AuthConfig::Session { .. } => {
                let token = self.session_token().await?;
                Ok(req.bearer_auth(token))
            }
        }
    }

    /// Forget the session token so the next request logs in again
    pub async fn invalidate(&self) {
        self.cached_token.write().await.take();
    }

    /// Get the session token, logging in if there is none yet
    async fn session_token(&self) -> Result<String> {
        {
            let cached = self.cached_token.read().await;
            if let Some(token) = cached.as_ref() {
                return Ok(token.clone());
            }
        }

        let mut cached = self.cached_token.write().await;

        // Another task may have logged in while we waited
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        let token = self.login().await?;
        *cached = Some(token.clone());
        Ok(token)
    }

    async fn login(&self) -> Result<String> {
        let AuthConfig::Session {
            login_url,
            email,
            password,
            token_field,
        } = &self.config
        else {
            return Err(Error::auth("Login is only supported for session auth"));
        };

        if email.is_empty() || password.is_empty() {
            return Err(Error::auth("Email and password are required"));
        }

        let url = self.login_url(login_url);
        debug!("Logging in at {}", url);

        let response = self
            .http_client
            .post(&url)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await
            .map_err(Error::Http)?;

        let status = response.status();
        let body: JsonValue = response.json().await.unwrap_or(JsonValue::Null);

        if !status.is_success() {
            let message = body
                .get("message")
                .and_then(JsonValue::as_str)
                .unwrap_or("Login failed");
            return Err(Error::auth(message));
        }

        match body.get(token_field).and_then(JsonValue::as_str) {
            Some(token) if !token.is_empty() => {
                info!("Logged in as {}", email);
                Ok(token.to_string())
            }
            _ => Err(Error::auth(format!(
                "Login response has no '{token_field}' field"
            ))),
        }
    }

    fn login_url(&self, login_url: &str) -> String {
        if login_url.starts_with("http://") || login_url.starts_with("https://") {
            return login_url.to_string();
        }
        match &self.base_url {
            Some(base) => format!(
                "{}/{}",
                base.trim_end_matches('/'),
                login_url.trim_start_matches('/')
            ),
            None => login_url.to_string(),
        }
    }
}
