//! Client error types

use serde::Deserialize;

/// Failure talking to the hopeboard API
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// 401: missing, expired or rejected credentials
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },

    /// Could not reach the server or the connection broke
    #[error("network error: {0}")]
    Network(String),

    /// Any other non-success status
    #[error("request failed ({status}): {message}")]
    Http { status: u16, message: String },

    /// Success status with a body that did not parse
    #[error("invalid response: {0}")]
    Decode(String),

    /// Client construction or usage error
    #[error("client error: {0}")]
    Config(String),
}

pub type ClientResult<T> = Result<T, ClientError>;

impl ClientError {
    pub(crate) fn network(e: reqwest::Error) -> Self {
        Self::Network(e.to_string())
    }

    pub(crate) fn decode(e: impl std::fmt::Display) -> Self {
        Self::Decode(e.to_string())
    }

    /// Build from a failed response's status and raw body
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    "no response body".to_string()
                } else {
                    body.trim().to_string()
                }
            });

        if status == 401 {
            Self::Unauthorized { message }
        } else {
            Self::Http { status, message }
        }
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { .. } => Some(401),
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Server error body: `{error, message}`
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}
