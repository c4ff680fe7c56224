use std::fmt;

use crate::sse::SseFrame;

pub type SessionId = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// A complete server-sent event read from the session's stream.
    Frame { session_id: SessionId, frame: SseFrame },
    /// The stream could not be opened or broke before it was closed.
    TransportFailed {
        session_id: SessionId,
        error: StreamError,
    },
    /// The stream was closed on request and will deliver nothing more.
    Closed { session_id: SessionId },
}

impl EngineEvent {
    pub fn session_id(&self) -> SessionId {
        match self {
            EngineEvent::Frame { session_id, .. }
            | EngineEvent::TransportFailed { session_id, .. }
            | EngineEvent::Closed { session_id } => *session_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct StreamError {
    pub kind: FailureKind,
    pub message: String,
}

impl StreamError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    HttpStatus(u16),
    Timeout,
    UnsupportedContentType { content_type: String },
    StreamEnded,
    Unhealthy,
    EngineUnavailable,
    Network,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::StreamEnded => write!(f, "stream ended"),
            FailureKind::Unhealthy => write!(f, "service unhealthy"),
            FailureKind::EngineUnavailable => write!(f, "engine unavailable"),
            FailureKind::Network => write!(f, "network error"),
        }
    }
}
