//! Process-wide configuration.
//!
//! Built once at startup and handed to [`TodoistClient::new`](crate::client::TodoistClient::new).
//! Nothing else in the crate reads the environment.

use std::env;
use std::time::Duration;

use miette::Diagnostic;
use reqwest::Url;
use thiserror::Error;

/// Environment variable holding the Todoist API token.
pub const TOKEN_ENV: &str = "TODOIST_API_TOKEN";
/// Environment variable overriding the REST base URL.
pub const BASE_URL_ENV: &str = "TODOIST_API_URL";
/// Environment variable overriding the request timeout, in seconds.
pub const TIMEOUT_ENV: &str = "TODOIST_TIMEOUT_SECS";

pub const DEFAULT_BASE_URL: &str = "https://api.todoist.com/rest/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{TOKEN_ENV} environment variable not set")]
    #[diagnostic(
        code(todoist_mcp::config::missing_token),
        help("Get your token from: Todoist Settings → Integrations → Developer → API token")
    )]
    MissingToken,

    #[error("Invalid API base URL '{url}': {message}")]
    #[diagnostic(code(todoist_mcp::config::invalid_base_url))]
    InvalidBaseUrl { url: String, message: String },

    #[error("Invalid timeout '{value}': expected a positive number of seconds")]
    #[diagnostic(code(todoist_mcp::config::invalid_timeout))]
    InvalidTimeout { value: String },
}

/// Immutable client configuration.
#[derive(Clone)]
pub struct Config {
    api_token: String,
    base_url: Url,
    timeout: Duration,
}

impl Config {
    /// Create a configuration with an explicit token and the default URL and timeout.
    pub fn new(api_token: impl Into<String>) -> Result<Self, ConfigError> {
        let api_token = api_token.into().trim().to_string();
        if api_token.is_empty() {
            return Err(ConfigError::MissingToken);
        }

        Ok(Self {
            api_token,
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Build configuration from the environment.
    ///
    /// `TODOIST_API_TOKEN` is required. `TODOIST_API_URL` and
    /// `TODOIST_TIMEOUT_SECS` are optional.
    pub fn from_env() -> Result<Self, ConfigError> {
        let token = env::var(TOKEN_ENV).map_err(|_| ConfigError::MissingToken)?;
        let mut config = Self::new(token)?;

        if let Ok(url) = env::var(BASE_URL_ENV) {
            config = config.with_base_url(&url)?;
        }
        if let Ok(secs) = env::var(TIMEOUT_ENV) {
            config = config.with_timeout(parse_timeout(&secs)?);
        }

        Ok(config)
    }

    /// Override the REST base URL. Takes precedence over the environment.
    pub fn with_base_url(mut self, url: &str) -> Result<Self, ConfigError> {
        self.base_url = parse_base_url(url)?;
        Ok(self)
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn api_token(&self) -> &str {
        &self.api_token
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

// Token stays out of logs and panic messages.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_token", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
    // A trailing slash keeps Url::join from dropping the last path segment.
    let normalized = format!("{}/", raw.trim().trim_end_matches('/'));
    let url = Url::parse(&normalized).map_err(|e| ConfigError::InvalidBaseUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::InvalidBaseUrl {
            url: raw.to_string(),
            message: format!("unsupported scheme '{}'", other),
        }),
    }
}

/// Parse a timeout given in whole seconds.
pub fn parse_timeout(raw: &str) -> Result<Duration, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(ConfigError::InvalidTimeout {
            value: raw.to_string(),
        }),
    }
}
