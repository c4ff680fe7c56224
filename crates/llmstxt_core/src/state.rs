use crate::params::{FormState, GenerationRequest, Limits, OutputFormat, OutputNames};
use crate::view_model::{
    project_progress, project_result, AppViewModel, FormView, SessionKind,
};

pub type SessionId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProgressSnapshot {
    pub pages_found: u64,
    pub current_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSnapshot {
    pub content: String,
    pub pages_crawled: u64,
    pub cached: bool,
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Active(ProgressSnapshot),
    Completed(ResultSnapshot),
    Failed(String),
}

impl SessionState {
    pub fn kind(&self) -> SessionKind {
        match self {
            SessionState::Idle => SessionKind::Idle,
            SessionState::Active(_) => SessionKind::Active,
            SessionState::Completed(_) => SessionKind::Completed,
            SessionState::Failed(_) => SessionKind::Failed,
        }
    }
}

/// The connection the controller currently considers open.
#[derive(Debug, Clone, PartialEq, Eq)]
struct OpenConnection {
    session_id: SessionId,
    request: GenerationRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    limits: Limits,
    names: OutputNames,
    form: FormState,
    url_error: Option<String>,
    session: SessionState,
    connection: Option<OpenConnection>,
    last_session_id: SessionId,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_config(Limits::default(), OutputNames::default())
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(limits: Limits, names: OutputNames) -> Self {
        Self {
            form: FormState::new(&limits),
            limits,
            names,
            url_error: None,
            session: SessionState::Idle,
            connection: None,
            last_session_id: 0,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        let kind = self.session.kind();
        let (progress, result, error) = match &self.session {
            SessionState::Idle => (None, None, None),
            SessionState::Active(snapshot) => (Some(project_progress(snapshot)), None, None),
            SessionState::Completed(snapshot) => {
                (None, Some(project_result(snapshot, &self.names)), None)
            }
            SessionState::Failed(message) => (None, None, Some(message.clone())),
        };

        AppViewModel {
            session: kind,
            form: FormView {
                url: self.form.url_input.clone(),
                pages: self.form.pages_input.clone(),
                depth: self.form.depth_input.clone(),
                format: self.form.format,
                exclude: self.form.exclude_input.clone(),
                editable: kind != SessionKind::Active,
            },
            url_error: self.url_error.clone(),
            progress,
            result,
            error,
            can_submit: kind != SessionKind::Active,
            can_reset: matches!(kind, SessionKind::Completed | SessionKind::Failed),
        }
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    pub fn output_names(&self) -> &OutputNames {
        &self.names
    }

    /// Session id of the connection currently open, if any.
    pub fn active_session(&self) -> Option<SessionId> {
        self.connection.as_ref().map(|c| c.session_id)
    }

    pub fn active_request(&self) -> Option<&GenerationRequest> {
        self.connection.as_ref().map(|c| &c.request)
    }

    /// Returns whether state changed since the last call and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn form_mut(&mut self) -> &mut FormState {
        self.dirty = true;
        &mut self.form
    }

    pub(crate) fn set_url_error(&mut self, message: Option<String>) {
        if self.url_error != message {
            self.url_error = message;
            self.dirty = true;
        }
    }

    pub(crate) fn is_current(&self, session_id: SessionId) -> bool {
        self.active_session() == Some(session_id)
            && matches!(self.session, SessionState::Active(_))
    }

    /// Enter `Active` with fresh progress and return the new session id.
    ///
    /// Any result or error from a previous session is dropped.
    pub(crate) fn begin_session(&mut self, request: GenerationRequest) -> SessionId {
        self.last_session_id += 1;
        let session_id = self.last_session_id;
        self.connection = Some(OpenConnection {
            session_id,
            request,
        });
        self.url_error = None;
        self.session = SessionState::Active(ProgressSnapshot::default());
        self.dirty = true;
        session_id
    }

    pub(crate) fn set_progress(&mut self, snapshot: ProgressSnapshot) {
        if let SessionState::Active(current) = &mut self.session {
            *current = snapshot;
            self.dirty = true;
        }
    }

    /// Leave `Active` for `next`, releasing the connection.
    ///
    /// Returns the id of the connection that must now be closed, or `None`
    /// when no connection was open.
    pub(crate) fn finish_session(&mut self, next: SessionState) -> Option<SessionId> {
        let connection = self.connection.take()?;
        self.session = next;
        self.dirty = true;
        Some(connection.session_id)
    }

    pub(crate) fn reset(&mut self) {
        self.session = SessionState::Idle;
        self.url_error = None;
        self.dirty = true;
    }
}
