use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Envelope returned by every `<base>/paginated` endpoint.
///
/// The backend echoes the filters it applied next to these fields; they are
/// ignored here since the client already owns its query.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T> {
    pub content: Vec<T>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_elements: u64,
    pub size: u32,
    pub first: bool,
    pub last: bool,
}

/// Body of `POST /api/leds/{n}/control`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControlResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    pub led_number: i32,
    pub state: bool,
    #[serde(default)]
    pub timestamp: Option<NaiveDateTime>,
}
