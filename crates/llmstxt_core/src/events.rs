use serde::Deserialize;

/// Fallback shown for transport drops and malformed payloads.
pub const CONNECTION_LOST_MESSAGE: &str = "Connection lost. Please try again.";
/// Shown when the server sends an `error` event with an empty message.
pub const GENERIC_SERVER_ERROR_MESSAGE: &str = "Something went wrong";

/// The three named event kinds the generation stream delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Progress,
    Complete,
    Error,
}

impl EventKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "progress" => Some(EventKind::Progress),
            "complete" => Some(EventKind::Complete),
            "error" => Some(EventKind::Error),
            _ => None,
        }
    }
}

/// One inbound event with its raw payload, not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamEvent {
    pub kind: EventKind,
    pub data: Option<String>,
}

impl StreamEvent {
    pub fn new(kind: EventKind, data: impl Into<String>) -> Self {
        Self {
            kind,
            data: Some(data.into()),
        }
    }

    /// A bare `error` with no payload, as produced by a dropped connection.
    pub fn transport_failure() -> Self {
        Self {
            kind: EventKind::Error,
            data: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProgressPayload {
    pub pages_found: u64,
    pub current_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletePayload {
    pub result: String,
    pub pages_crawled: u64,
    #[serde(default)]
    pub cached: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
}

impl ErrorPayload {
    /// Message to surface for an `error` event, given its optional payload.
    pub fn surface(data: Option<&str>) -> String {
        let Some(raw) = data else {
            return CONNECTION_LOST_MESSAGE.to_string();
        };
        match serde_json::from_str::<ErrorPayload>(raw) {
            Ok(payload) if payload.message.is_empty() => {
                GENERIC_SERVER_ERROR_MESSAGE.to_string()
            }
            Ok(payload) => payload.message,
            Err(_) => CONNECTION_LOST_MESSAGE.to_string(),
        }
    }
}
