//! llms.txt client engine: event-stream transport and file output.
mod engine;
mod persist;
mod sse;
mod stream;
mod types;

pub use engine::EngineHandle;
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use sse::{SseDecoder, SseFrame};
pub use stream::{ChannelEventSink, EventSink, ReqwestStreamClient, StreamClient, StreamSettings};
pub use types::{EngineEvent, FailureKind, SessionId, StreamError};
