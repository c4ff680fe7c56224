use std::collections::HashMap;
use std::sync::{mpsc, Arc};
use std::thread;

use llmstxt_logging::{llms_debug, llms_error, llms_info, llms_warn};
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::stream::{EventSink, ReqwestStreamClient, StreamClient, StreamSettings};
use crate::{EngineEvent, FailureKind, SessionId, StreamError};

enum EngineCommand {
    Open { session_id: SessionId, url: Url },
    Close { session_id: SessionId },
    CheckHealth { reply: mpsc::Sender<Result<(), StreamError>> },
}

/// Owns every open stream, one tokio task per session.
///
/// Commands are applied in the order they are sent. A stream is only ever
/// closed by [`EngineHandle::close`]; closing an unknown or already closed
/// session is a no-op.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(settings: StreamSettings, sink: Arc<dyn EventSink>) -> Self {
        match ReqwestStreamClient::new(settings) {
            Ok(client) => Self::with_client(Arc::new(client), sink),
            Err(err) => {
                llms_error!("Failed to build stream client: {}", err);
                Self::unavailable(err, sink)
            }
        }
    }

    pub fn with_client(client: Arc<dyn StreamClient>, sink: Arc<dyn EventSink>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    llms_error!("Failed to start tokio runtime: {}", err);
                    let error = StreamError::new(FailureKind::EngineUnavailable, err.to_string());
                    reject_all(cmd_rx, error, sink.as_ref());
                    return;
                }
            };

            let mut sessions: HashMap<SessionId, CancellationToken> = HashMap::new();
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Open { session_id, url } => {
                        let cancel = CancellationToken::new();
                        if let Some(previous) = sessions.insert(session_id, cancel.clone()) {
                            llms_warn!("Session {} opened twice; closing the older stream", session_id);
                            previous.cancel();
                        }
                        let client = client.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            run_session(client.as_ref(), session_id, url, sink.as_ref(), cancel)
                                .await;
                        });
                    }
                    EngineCommand::Close { session_id } => match sessions.remove(&session_id) {
                        Some(cancel) => {
                            llms_info!("Session {} closing stream", session_id);
                            cancel.cancel();
                        }
                        None => llms_debug!("Session {} already closed", session_id),
                    },
                    EngineCommand::CheckHealth { reply } => {
                        let client = client.clone();
                        runtime.spawn(async move {
                            let _ = reply.send(client.check_health().await);
                        });
                    }
                }
            }

            for (_, cancel) in sessions.drain() {
                cancel.cancel();
            }
        });

        Self { cmd_tx }
    }

    /// Start streaming `url` for `session_id`. Results arrive through the sink.
    pub fn open(&self, session_id: SessionId, url: Url) {
        let _ = self.cmd_tx.send(EngineCommand::Open { session_id, url });
    }

    pub fn close(&self, session_id: SessionId) {
        let _ = self.cmd_tx.send(EngineCommand::Close { session_id });
    }

    /// Ask the service whether it is up. Blocks the caller until it answers.
    pub fn check_health(&self) -> Result<(), StreamError> {
        let (reply, answer) = mpsc::channel();
        self.cmd_tx
            .send(EngineCommand::CheckHealth { reply })
            .map_err(|_| engine_gone())?;
        answer.recv().map_err(|_| engine_gone())?
    }

    fn unavailable(error: StreamError, sink: Arc<dyn EventSink>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        thread::spawn(move || reject_all(cmd_rx, error, sink.as_ref()));
        Self { cmd_tx }
    }
}

async fn run_session(
    client: &dyn StreamClient,
    session_id: SessionId,
    url: Url,
    sink: &dyn EventSink,
    cancel: CancellationToken,
) {
    llms_info!("Session {} opening stream {}", session_id, url.path());
    match client.stream(session_id, url, sink, cancel.clone()).await {
        Ok(()) => sink.emit(EngineEvent::Closed { session_id }),
        // A failure racing a close request is not worth reporting.
        Err(_) if cancel.is_cancelled() => sink.emit(EngineEvent::Closed { session_id }),
        Err(error) => {
            llms_warn!("Session {} transport failure: {}", session_id, error);
            sink.emit(EngineEvent::TransportFailed { session_id, error });
        }
    }
}

/// Answer every command with a failure; used when no runtime is available.
fn reject_all(cmd_rx: mpsc::Receiver<EngineCommand>, error: StreamError, sink: &dyn EventSink) {
    while let Ok(command) = cmd_rx.recv() {
        match command {
            EngineCommand::Open { session_id, .. } => sink.emit(EngineEvent::TransportFailed {
                session_id,
                error: error.clone(),
            }),
            EngineCommand::Close { .. } => {}
            EngineCommand::CheckHealth { reply } => {
                let _ = reply.send(Err(error.clone()));
            }
        }
    }
}

fn engine_gone() -> StreamError {
    StreamError::new(FailureKind::EngineUnavailable, "engine thread stopped")
}
