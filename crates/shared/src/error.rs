use serde::{Deserialize, Serialize};

/// Error body the backend attaches to 4xx/5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            success: None,
        }
    }

    /// Returns `None` for empty or non-JSON bodies.
    pub fn from_body(body: &[u8]) -> Option<Self> {
        serde_json::from_slice::<Self>(body)
            .ok()
            .filter(|err| !err.error.trim().is_empty())
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
