//! Auth configuration types

use serde::Deserialize;

/// How requests to the backend are authenticated
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication required
    #[default]
    None,

    /// Fixed bearer token
    Bearer {
        /// The bearer token
        token: String,
    },

    /// Admin login: POST credentials once, then send the returned token
    /// as a bearer token
    Session {
        /// Login endpoint, absolute or relative to the base URL
        #[serde(default = "default_login_path")]
        login_url: String,
        email: String,
        password: String,
        /// Field holding the token in the login response
        #[serde(default = "default_token_field")]
        token_field: String,
    },
}

fn default_login_path() -> String {
    "/auth/login".to_string()
}

fn default_token_field() -> String {
    "token".to_string()
}

impl AuthConfig {
    /// Bearer auth for a token, or none when it is missing or blank
    pub fn from_token(token: Option<&str>) -> Self {
        match token.map(str::trim) {
            Some(token) if !token.is_empty() => Self::Bearer {
                token: token.to_string(),
            },
            _ => Self::None,
        }
    }

    /// Session login against the default `/auth/login` endpoint
    pub fn session(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Session {
            login_url: default_login_path(),
            email: email.into(),
            password: password.into(),
            token_field: default_token_field(),
        }
    }

    /// Short name for logs
    pub fn kind(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Bearer { .. } => "bearer",
            Self::Session { .. } => "session",
        }
    }
}
