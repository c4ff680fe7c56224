//! llms.txt client core: pure session state machine, input validation and
//! view-model projections.
mod effect;
mod events;
mod msg;
mod params;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use events::{
    CompletePayload, ErrorPayload, EventKind, ProgressPayload, StreamEvent, CONNECTION_LOST_MESSAGE,
    GENERIC_SERVER_ERROR_MESSAGE,
};
pub use msg::Msg;
pub use params::{
    clamp_depth, clamp_pages, parse_exclude_paths, FormState, GenerationRequest, Limits,
    OutputFormat, OutputNames,
};
pub use state::{AppState, ProgressSnapshot, ResultSnapshot, SessionId, SessionState};
pub use update::update;
pub use validate::{validate_url, ValidationError, INVALID_URL_MESSAGE};
pub use view_model::{
    project_progress, project_result, AppViewModel, FormView, ProgressView, ResultView,
    SessionKind,
};
