//! Error kinds surfaced by list loads and device commands.

use thiserror::Error;

/// Every variant is recoverable: the caller keeps showing the last good page
/// and the next user action retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    /// The server answered with a non-success status.
    #[error("HTTP {status}: {status_text}")]
    Fetch {
        status: u16,
        status_text: String,
        detail: Option<String>,
    },
    /// The request never produced a response (refused, DNS, timeout).
    #[error("network error: {message}")]
    Network { message: String, timed_out: bool },
    #[error("malformed response: {0}")]
    Parse(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl ListError {
    pub fn fetch(status: reqwest::StatusCode, detail: Option<String>) -> Self {
        Self::Fetch {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or("Unknown").to_string(),
            detail,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// One line suitable for an error banner or an empty table body.
    pub fn user_message(&self) -> String {
        match self {
            Self::Fetch {
                status,
                status_text,
                detail: Some(detail),
            } => format!("Server rejected the request (HTTP {status} {status_text}): {detail}"),
            Self::Fetch {
                status,
                status_text,
                detail: None,
            } => format!("Server rejected the request (HTTP {status} {status_text})"),
            Self::Network {
                timed_out: true, ..
            } => "Request timed out; check the connection and retry.".to_string(),
            Self::Network { .. } => {
                "Server unreachable; check the URL/network and retry.".to_string()
            }
            Self::Parse(_) => "Received an unreadable response from the server.".to_string(),
            Self::InvalidArgument(message) => message.clone(),
        }
    }
}

impl From<reqwest::Error> for ListError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Parse(err.to_string());
        }
        if let Some(status) = err.status() {
            return Self::fetch(status, None);
        }
        Self::Network {
            timed_out: err.is_timeout(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for ListError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

pub type ListResult<T> = std::result::Result<T, ListError>;
