use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use llmstxt_engine::{
    ChannelEventSink, EngineEvent, EngineHandle, EventSink, FailureKind, SessionId, SseFrame,
    StreamClient, StreamError, StreamSettings,
};
use tokio_util::sync::CancellationToken;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

/// Emits one progress frame, then waits until the session is closed.
struct HangingClient;

#[async_trait::async_trait]
impl StreamClient for HangingClient {
    async fn stream(
        &self,
        session_id: SessionId,
        _url: Url,
        sink: &dyn EventSink,
        cancel: CancellationToken,
    ) -> Result<(), StreamError> {
        sink.emit(EngineEvent::Frame {
            session_id,
            frame: SseFrame {
                event: "progress".to_string(),
                data: r#"{"pages_found":1,"current_url":""}"#.to_string(),
                last_event_id: None,
            },
        });
        cancel.cancelled().await;
        Ok(())
    }

    async fn check_health(&self) -> Result<(), StreamError> {
        Ok(())
    }
}

fn engine_with(client: Arc<dyn StreamClient>) -> (EngineHandle, mpsc::Receiver<EngineEvent>) {
    let (tx, rx) = mpsc::channel();
    let engine = EngineHandle::with_client(client, Arc::new(ChannelEventSink::new(tx)));
    (engine, rx)
}

fn url() -> Url {
    Url::parse("http://localhost/api/generate/stream").unwrap()
}

#[test]
fn close_cancels_the_stream_and_reports_closed() {
    let (engine, events) = engine_with(Arc::new(HangingClient));
    engine.open(1, url());

    let first = events.recv_timeout(WAIT).expect("frame");
    assert!(matches!(first, EngineEvent::Frame { session_id: 1, .. }));

    engine.close(1);
    let closed = events.recv_timeout(WAIT).expect("closed");
    assert_eq!(closed, EngineEvent::Closed { session_id: 1 });
}

#[test]
fn closing_twice_or_closing_unknown_sessions_is_harmless() {
    let (engine, events) = engine_with(Arc::new(HangingClient));
    engine.close(42);
    engine.open(2, url());
    events.recv_timeout(WAIT).expect("frame");

    engine.close(2);
    engine.close(2);
    assert_eq!(
        events.recv_timeout(WAIT).expect("closed"),
        EngineEvent::Closed { session_id: 2 }
    );
    assert!(events.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn sessions_are_independent() {
    let (engine, events) = engine_with(Arc::new(HangingClient));
    engine.open(1, url());
    engine.open(2, url());

    let mut opened: Vec<SessionId> = (0..2)
        .map(|_| events.recv_timeout(WAIT).expect("frame").session_id())
        .collect();
    opened.sort_unstable();
    assert_eq!(opened, vec![1, 2]);

    engine.close(1);
    assert_eq!(
        events.recv_timeout(WAIT).expect("closed"),
        EngineEvent::Closed { session_id: 1 }
    );
    assert!(events.recv_timeout(Duration::from_millis(200)).is_err());
}

#[test]
fn health_check_is_answered_through_the_engine() {
    let (engine, _events) = engine_with(Arc::new(HangingClient));
    assert_eq!(engine.check_health(), Ok(()));
}

#[test]
fn unreachable_service_is_reported_as_transport_failure() {
    let settings = StreamSettings {
        connect_timeout: Duration::from_millis(500),
        ..StreamSettings::with_base_url("http://127.0.0.1:1")
    };
    let (tx, events) = mpsc::channel();
    let engine = EngineHandle::new(settings.clone(), Arc::new(ChannelEventSink::new(tx)));
    engine.open(9, settings.stream_url(&[]).unwrap());

    match events.recv_timeout(WAIT).expect("failure") {
        EngineEvent::TransportFailed { session_id, error } => {
            assert_eq!(session_id, 9);
            assert!(matches!(error.kind, FailureKind::Network | FailureKind::Timeout));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn real_stream_delivers_frames_in_order() {
    let server = MockServer::start().await;
    let body = concat!(
        "event: progress\ndata: {\"pages_found\":1,\"current_url\":\"https://a\"}\n\n",
        "event: progress\ndata: {\"pages_found\":2,\"current_url\":\"https://b\"}\n\n",
        "event: error\ndata: {\"message\":\"failed to crawl site\"}\n\n",
    );
    Mock::given(method("GET"))
        .and(path("/api/generate/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/event-stream"))
        .mount(&server)
        .await;

    let settings = StreamSettings::with_base_url(server.uri());
    let url = settings.stream_url(&[]).unwrap();

    let received = tokio::task::spawn_blocking(move || {
        let (tx, events) = mpsc::channel();
        let engine = EngineHandle::new(settings, Arc::new(ChannelEventSink::new(tx)));
        engine.open(3, url);
        let mut received = Vec::new();
        while let Ok(event) = events.recv_timeout(WAIT) {
            let done = !matches!(event, EngineEvent::Frame { .. });
            received.push(event);
            if done {
                break;
            }
        }
        received
    })
    .await
    .unwrap();

    let names: Vec<String> = received
        .iter()
        .filter_map(|event| match event {
            EngineEvent::Frame { frame, .. } => Some(frame.event.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["progress", "progress", "error"]);
    assert!(matches!(
        received.last(),
        Some(EngineEvent::TransportFailed { session_id: 3, error }) if error.kind == FailureKind::StreamEnded
    ));
}
