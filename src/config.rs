//! Dashboard configuration
//!
//! The backend location, credentials, HTTP tuning and the list screens,
//! loaded from YAML. Screens default to the built-in set.

use crate::auth::AuthConfig;
use crate::error::{Error, Result};
use crate::fetch::{EndpointConfig, DEFAULT_MAX_PAGES};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::DEFAULT_PAGE_SIZE;
use crate::screens;
use crate::types::{BackoffType, ParamMap};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete dashboard configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Backend API root, e.g. `https://api.example.com`
    #[serde(default)]
    pub base_url: String,

    /// Public site root used for `/uploads/...` images
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Bearer token; ignored when `auth` is set
    #[serde(default)]
    pub token: Option<String>,

    /// Explicit auth settings
    #[serde(default)]
    pub auth: Option<AuthConfig>,

    #[serde(default)]
    pub http: HttpConfig,

    /// Default rows per page on every screen
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Page requests per refresh before giving up
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// List screens; empty means the built-in set
    #[serde(default)]
    pub screens: Vec<ScreenDefinition>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            public_base_url: None,
            token: None,
            auth: None,
            http: HttpConfig::default(),
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            screens: Vec::new(),
        }
    }
}

impl DashboardConfig {
    /// Parse a config from YAML, filling in the built-in screens if none are given
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let mut config: DashboardConfig = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse dashboard YAML: {e}")))?;
        config.ensure_screens()?;
        Ok(config)
    }

    /// Load a config file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Defaults plus the built-in screens
    pub fn builtin() -> Result<Self> {
        let mut config = Self::default();
        config.ensure_screens()?;
        Ok(config)
    }

    fn ensure_screens(&mut self) -> Result<()> {
        if self.screens.is_empty() {
            self.screens = screens::load_builtin_screens()?;
        }
        Ok(())
    }

    /// Check the config is usable
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }
        let url = url::Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }
        if let Some(public) = &self.public_base_url {
            url::Url::parse(public)?;
        }

        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be at least 1"));
        }
        if self.max_pages == 0 {
            return Err(Error::invalid_value("max_pages", "must be at least 1"));
        }
        if self.http.timeout_seconds == 0 {
            return Err(Error::invalid_value(
                "http.timeout_seconds",
                "must be at least 1",
            ));
        }

        if self.screens.is_empty() {
            return Err(Error::config("At least one screen must be configured"));
        }
        let mut names = HashSet::new();
        for screen in &self.screens {
            screen.validate()?;
            if !names.insert(screen.name.as_str()) {
                return Err(Error::config(format!(
                    "Duplicate screen name '{}'",
                    screen.name
                )));
            }
        }

        Ok(())
    }

    /// Look up a screen by name
    pub fn screen(&self, name: &str) -> Result<&ScreenDefinition> {
        self.screens
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| Error::screen_not_found(name))
    }

    /// Effective auth settings
    pub fn auth_config(&self) -> AuthConfig {
        match &self.auth {
            Some(auth) => auth.clone(),
            None => AuthConfig::from_token(self.token.as_deref()),
        }
    }

    /// HTTP client settings for the backend
    pub fn http_client_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url.clone())
            .timeout(Duration::from_secs(self.http.timeout_seconds))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_millis(self.http.max_backoff_ms),
            );
        builder = match self.http.requests_per_second {
            Some(0) => builder.no_rate_limit(),
            Some(rps) => builder.rate_limit(RateLimiterConfig::per_second(rps)),
            None => builder,
        };
        builder.build()
    }
}

// ============================================================================
// HTTP Config
// ============================================================================

/// HTTP client tuning
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// `0` disables rate limiting; unset keeps the client default
    #[serde(default)]
    pub requests_per_second: Option<u32>,

    #[serde(default)]
    pub backoff: BackoffType,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            max_retries: default_max_retries(),
            requests_per_second: None,
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    30_000
}

// ============================================================================
// Screens
// ============================================================================

/// One list screen: where its data lives and how it can be filtered
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScreenDefinition {
    /// Unique name, e.g. "donors"
    pub name: String,

    #[serde(default)]
    pub title: Option<String>,

    /// Backend path, e.g. "/donors/donor-registrations"
    pub path: String,

    /// Plural noun for footers ("Showing 1 to 10 of 25 donors")
    #[serde(default)]
    pub item_label: Option<String>,

    /// Query parameters sent with every page request
    #[serde(default)]
    pub static_params: ParamMap,

    /// Fields searched by the free-text box
    #[serde(default)]
    pub search_fields: Vec<String>,

    /// When set, search text is sent to the backend under this name
    /// instead of being applied locally
    #[serde(default)]
    pub server_search_param: Option<String>,

    #[serde(default)]
    pub filters: Vec<FilterDefinition>,

    /// Backend page-size parameter, e.g. "pageSize"
    #[serde(default)]
    pub page_size_param: Option<String>,

    /// Rows per page; falls back to the dashboard default
    #[serde(default)]
    pub page_size: Option<usize>,

    /// Field holding the record's image path
    #[serde(default)]
    pub image_field: Option<String>,
}

/// An exact-match filter offered on a screen
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FilterDefinition {
    pub field: String,

    #[serde(default)]
    pub label: Option<String>,

    /// Allowed values; empty means free text
    #[serde(default)]
    pub options: Vec<String>,

    /// Sent to the backend as a query parameter; changing it refetches
    #[serde(default)]
    pub server: bool,
}

impl ScreenDefinition {
    /// Minimal definition for a path
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: None,
            path: path.into(),
            item_label: None,
            static_params: ParamMap::new(),
            search_fields: Vec::new(),
            server_search_param: None,
            filters: Vec::new(),
            page_size_param: None,
            page_size: None,
            image_field: None,
        }
    }

    /// Display title, defaulting to the name
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Footer noun, defaulting to "items"
    pub fn item_label(&self) -> &str {
        self.item_label.as_deref().unwrap_or("items")
    }

    pub fn filter(&self, field: &str) -> Option<&FilterDefinition> {
        self.filters.iter().find(|f| f.field == field)
    }

    /// Whether changing this key requires a refetch
    pub fn is_server_param(&self, key: &str) -> bool {
        self.server_search_param.as_deref() == Some(key)
            || self.filter(key).is_some_and(|f| f.server)
    }

    /// Endpoint for a refresh, before any server-side filter values
    pub fn endpoint(&self, page_size: usize, max_pages: u32) -> EndpointConfig {
        let mut endpoint = EndpointConfig::new(self.path.clone()).with_max_pages(max_pages);
        for (key, value) in &self.static_params {
            endpoint = endpoint.param(key.clone(), value.clone());
        }
        if let Some(param) = &self.page_size_param {
            let size = u32::try_from(page_size).unwrap_or(u32::MAX);
            endpoint = endpoint.with_page_size(param.clone(), size);
        }
        endpoint
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::config("Screen name cannot be empty"));
        }
        if self.path.trim().is_empty() {
            return Err(Error::config(format!(
                "Screen '{}' path cannot be empty",
                self.name
            )));
        }
        if self.page_size == Some(0) {
            return Err(Error::invalid_value(
                format!("screens.{}.page_size", self.name),
                "must be at least 1",
            ));
        }
        let mut fields = HashSet::new();
        for filter in &self.filters {
            if filter.field.trim().is_empty() {
                return Err(Error::config(format!(
                    "Screen '{}' has a filter without a field",
                    self.name
                )));
            }
            if !fields.insert(filter.field.as_str()) {
                return Err(Error::config(format!(
                    "Screen '{}' defines filter '{}' twice",
                    self.name, filter.field
                )));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
