use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ApiError {
    #[error("Resource not found: {message}")]
    #[diagnostic(code(todoist_mcp::client::not_found))]
    NotFound { message: String },

    #[error("Authentication failed ({status}): {message}")]
    #[diagnostic(
        code(todoist_mcp::client::auth),
        help("Check that TODOIST_API_TOKEN is correct and has not been revoked.")
    )]
    Auth { status: u16, message: String },

    #[error("API error ({status}): {message}")]
    #[diagnostic(code(todoist_mcp::client::remote))]
    Remote { status: u16, message: String },

    #[error("Request to the Todoist API timed out")]
    #[diagnostic(code(todoist_mcp::client::timeout))]
    Timeout,

    #[error("Failed to reach the Todoist API")]
    #[diagnostic(
        code(todoist_mcp::client::network),
        help("Check your network connection, or TODOIST_API_URL if it is overridden.")
    )]
    Network {
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to set up the HTTP client: {message}")]
    #[diagnostic(code(todoist_mcp::client::setup))]
    Setup { message: String },

    #[error("Invalid response from the Todoist API: {message}")]
    #[diagnostic(code(todoist_mcp::client::invalid_response))]
    InvalidResponse { message: String },
}

impl ApiError {
    /// Classify a non-success status.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            404 => ApiError::NotFound { message },
            401 | 403 => ApiError::Auth { status, message },
            _ => ApiError::Remote { status, message },
        }
    }

    /// HTTP status carried by the error, if the remote answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Auth { status, .. } | ApiError::Remote { status, .. } => Some(*status),
            ApiError::Timeout
            | ApiError::Network { .. }
            | ApiError::Setup { .. }
            | ApiError::InvalidResponse { .. } => None,
        }
    }

    /// True when the remote could not be reached, as opposed to rejecting the request.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, ApiError::Timeout | ApiError::Network { .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::InvalidResponse {
                message: e.to_string(),
            }
        } else {
            ApiError::Network { source: e }
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::InvalidResponse {
            message: e.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
