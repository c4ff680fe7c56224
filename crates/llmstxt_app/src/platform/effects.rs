use std::path::PathBuf;
use std::sync::{mpsc, Arc};

use llmstxt_core::{Effect, EventKind, Msg, StreamEvent};
use llmstxt_engine::{
    AtomicFileWriter, EngineEvent, EngineHandle, EventSink, PersistError, StreamError,
    StreamSettings,
};
use llmstxt_logging::{llms_debug, llms_error, llms_info, llms_warn};

use super::app::AppEvent;
use super::config::AppConfig;

/// Something the surface should tell the user after running effects.
#[derive(Debug)]
pub enum Notice {
    Saved(PathBuf),
    SaveFailed(PersistError),
    Copied(String),
}

/// Executes core effects against the engine and the filesystem.
pub struct EffectRunner {
    engine: EngineHandle,
    settings: StreamSettings,
    writer: AtomicFileWriter,
    inbox: mpsc::Sender<AppEvent>,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, inbox: mpsc::Sender<AppEvent>) -> Self {
        let bridge = Arc::new(MsgBridge {
            inbox: inbox.clone(),
        });
        Self {
            engine: EngineHandle::new(config.stream.clone(), bridge),
            settings: config.stream.clone(),
            writer: AtomicFileWriter::new(config.output_dir.clone()),
            inbox,
        }
    }

    pub fn check_health(&self) -> Result<(), StreamError> {
        self.engine.check_health()
    }

    pub fn run(&self, effects: Vec<Effect>) -> Vec<Notice> {
        let mut notices = Vec::new();
        for effect in effects {
            match effect {
                Effect::OpenStream {
                    session_id,
                    request,
                } => match self.settings.stream_url(&request.query_pairs()) {
                    Ok(url) => {
                        llms_info!("OpenStream session_id={} url_len={}", session_id, url.as_str().len());
                        self.engine.open(session_id, url);
                    }
                    Err(err) => {
                        llms_error!("Cannot address stream for session {}: {}", session_id, err);
                        let _ = self.inbox.send(AppEvent::Core(Msg::StreamEvent {
                            session_id,
                            event: StreamEvent::transport_failure(),
                        }));
                    }
                },
                Effect::CloseStream { session_id } => {
                    self.engine.close(session_id);
                }
                Effect::SaveDocument { filename, content } => {
                    match self.writer.write(&filename, &content) {
                        Ok(path) => {
                            llms_info!("Saved {} bytes to {:?}", content.len(), path);
                            notices.push(Notice::Saved(path));
                        }
                        Err(err) => {
                            llms_error!("Failed to save {}: {}", filename, err);
                            notices.push(Notice::SaveFailed(err));
                        }
                    }
                }
                Effect::CopyToClipboard { content } => notices.push(Notice::Copied(content)),
            }
        }
        notices
    }
}

/// Feeds engine events back into the app inbox as core messages.
struct MsgBridge {
    inbox: mpsc::Sender<AppEvent>,
}

impl EventSink for MsgBridge {
    fn emit(&self, event: EngineEvent) {
        if let Some(msg) = map_engine_event(event) {
            let _ = self.inbox.send(AppEvent::Core(msg));
        }
    }
}

fn map_engine_event(event: EngineEvent) -> Option<Msg> {
    match event {
        EngineEvent::Frame { session_id, frame } => match EventKind::from_name(&frame.event) {
            Some(kind) => Some(Msg::StreamEvent {
                session_id,
                event: StreamEvent::new(kind, frame.data),
            }),
            None => {
                llms_debug!(
                    "Session {} dropping unknown event {:?}",
                    session_id,
                    frame.event
                );
                None
            }
        },
        EngineEvent::TransportFailed { session_id, error } => {
            llms_warn!("Session {} lost its stream: {}", session_id, error);
            Some(Msg::StreamEvent {
                session_id,
                event: StreamEvent::transport_failure(),
            })
        }
        EngineEvent::Closed { session_id } => {
            llms_debug!("Session {} stream closed", session_id);
            None
        }
    }
}
