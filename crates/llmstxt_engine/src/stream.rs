use std::time::Duration;

use bytes::Bytes;
use futures_util::{Stream, StreamExt};
use llmstxt_logging::{llms_debug, llms_info, llms_trace};
use reqwest::header::{ACCEPT, CACHE_CONTROL, CONTENT_TYPE};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::sse::SseDecoder;
use crate::{EngineEvent, FailureKind, SessionId, StreamError};

#[derive(Debug, Clone)]
pub struct StreamSettings {
    /// Base address of the generation service, e.g. `http://localhost:8080`.
    pub base_url: String,
    pub stream_path: String,
    pub health_path: String,
    pub connect_timeout: Duration,
    /// Longest silence tolerated between two chunks; `None` waits forever.
    pub idle_timeout: Option<Duration>,
    pub health_timeout: Duration,
    pub accepted_content_type: String,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            stream_path: "/api/generate/stream".to_string(),
            health_path: "/api/health".to_string(),
            connect_timeout: Duration::from_secs(10),
            idle_timeout: None,
            health_timeout: Duration::from_secs(5),
            accepted_content_type: "text/event-stream".to_string(),
        }
    }
}

impl StreamSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Full stream address with `query` percent-encoded onto it.
    pub fn stream_url(&self, query: &[(&str, String)]) -> Result<Url, StreamError> {
        let mut url = self.endpoint(&self.stream_path)?;
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(key, value)| (*key, value.as_str())));
        Ok(url)
    }

    pub fn health_url(&self) -> Result<Url, StreamError> {
        self.endpoint(&self.health_path)
    }

    fn endpoint(&self, path: &str) -> Result<Url, StreamError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|err| StreamError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if url.cannot_be_a_base() {
            return Err(StreamError::new(
                FailureKind::InvalidUrl,
                format!("{} cannot be used as a base url", self.base_url),
            ));
        }
        // Keep any path prefix the service is mounted under.
        let joined = format!("{}{}", url.path().trim_end_matches('/'), path);
        url.set_path(&joined);
        url.set_query(None);
        url.set_fragment(None);
        Ok(url)
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: std::sync::mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: std::sync::mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

#[async_trait::async_trait]
pub trait StreamClient: Send + Sync {
    /// Read the event stream at `url` until `cancel` fires or the stream breaks.
    ///
    /// Returns `Ok(())` only when cancelled. A stream that ends by itself is
    /// reported as [`FailureKind::StreamEnded`].
    async fn stream(
        &self,
        session_id: SessionId,
        url: Url,
        sink: &dyn EventSink,
        cancel: CancellationToken,
    ) -> Result<(), StreamError>;

    async fn check_health(&self) -> Result<(), StreamError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestStreamClient {
    settings: StreamSettings,
    client: reqwest::Client,
}

impl ReqwestStreamClient {
    pub fn new(settings: StreamSettings) -> Result<Self, StreamError> {
        // No overall request timeout: a generation stream is long-lived.
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(|err| StreamError::new(FailureKind::Network, err.to_string()))?;
        Ok(Self { settings, client })
    }

    pub fn settings(&self) -> &StreamSettings {
        &self.settings
    }

    fn is_content_type_allowed(&self, content_type: &str) -> bool {
        let ct = content_type.split(';').next().unwrap_or(content_type).trim();
        ct.eq_ignore_ascii_case(&self.settings.accepted_content_type)
    }
}

#[async_trait::async_trait]
impl StreamClient for ReqwestStreamClient {
    async fn stream(
        &self,
        session_id: SessionId,
        url: Url,
        sink: &dyn EventSink,
        cancel: CancellationToken,
    ) -> Result<(), StreamError> {
        let request = self
            .client
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .header(CACHE_CONTROL, "no-cache")
            .send();

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            response = request => response.map_err(map_reqwest_error)?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();
        if !self.is_content_type_allowed(&content_type) {
            return Err(StreamError::new(
                FailureKind::UnsupportedContentType { content_type },
                "not an event stream",
            ));
        }
        llms_info!("Session {} stream connected", session_id);

        let mut decoder = SseDecoder::new();
        let mut body = std::pin::pin!(response.bytes_stream());
        loop {
            let chunk = tokio::select! {
                biased;
                _ = cancel.cancelled() => return Ok(()),
                chunk = next_chunk(&mut body, self.settings.idle_timeout) => chunk?,
            };
            let Some(chunk) = chunk else {
                if decoder.has_pending() {
                    llms_debug!("Session {} dropped an unterminated event", session_id);
                }
                return Err(StreamError::new(
                    FailureKind::StreamEnded,
                    "stream ended before the session was closed",
                ));
            };

            for frame in decoder.feed(&chunk) {
                // Anything decoded after a close request belongs to a dead session.
                if cancel.is_cancelled() {
                    return Ok(());
                }
                llms_trace!(
                    "Session {} frame event={} data_len={}",
                    session_id,
                    frame.event,
                    frame.data.len()
                );
                sink.emit(EngineEvent::Frame { session_id, frame });
            }
        }
    }

    async fn check_health(&self) -> Result<(), StreamError> {
        let url = self.settings.health_url()?;
        let response = self
            .client
            .get(url)
            .timeout(self.settings.health_timeout)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        let body = response.text().await.map_err(map_reqwest_error)?;
        let value: serde_json::Value = serde_json::from_str(&body)
            .map_err(|err| StreamError::new(FailureKind::Unhealthy, err.to_string()))?;
        match value.get("status").and_then(|status| status.as_str()) {
            Some("ok") => Ok(()),
            other => Err(StreamError::new(
                FailureKind::Unhealthy,
                format!("unexpected health status {other:?}"),
            )),
        }
    }
}

async fn next_chunk<S>(body: &mut S, idle: Option<Duration>) -> Result<Option<Bytes>, StreamError>
where
    S: Stream<Item = Result<Bytes, reqwest::Error>> + Unpin,
{
    let next = match idle {
        Some(limit) => tokio::time::timeout(limit, body.next())
            .await
            .map_err(|_| StreamError::new(FailureKind::Timeout, "no data within idle timeout"))?,
        None => body.next().await,
    };
    next.transpose().map_err(map_reqwest_error)
}

fn map_reqwest_error(err: reqwest::Error) -> StreamError {
    if err.is_timeout() {
        return StreamError::new(FailureKind::Timeout, err.to_string());
    }
    StreamError::new(FailureKind::Network, err.to_string())
}
