use llmstxt_logging::{llms_debug, llms_info, llms_warn};

use crate::events::{CompletePayload, ErrorPayload, ProgressPayload, CONNECTION_LOST_MESSAGE};
use crate::{
    validate_url, AppState, Effect, EventKind, GenerationRequest, Msg, ProgressSnapshot,
    ResultSnapshot, SessionId, SessionState, StreamEvent,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlInputChanged(text) => {
            if form_is_editable(&state) {
                state.form_mut().url_input = text;
            }
            Vec::new()
        }
        Msg::Submit(raw) => submit(&mut state, raw),
        Msg::Reset => {
            match state.session() {
                SessionState::Completed(_) | SessionState::Failed(_) => {
                    llms_info!("Reset to idle");
                    state.reset();
                }
                SessionState::Idle | SessionState::Active(_) => {}
            }
            Vec::new()
        }
        Msg::PagesEdited(text) => {
            if form_is_editable(&state) {
                state.form_mut().pages_input = text;
            }
            Vec::new()
        }
        Msg::PagesCommitted => {
            if form_is_editable(&state) {
                let limits = *state.limits();
                state.form_mut().commit_pages(&limits);
            }
            Vec::new()
        }
        Msg::DepthEdited(text) => {
            if form_is_editable(&state) {
                state.form_mut().depth_input = text;
            }
            Vec::new()
        }
        Msg::DepthCommitted => {
            if form_is_editable(&state) {
                let limits = *state.limits();
                state.form_mut().commit_depth(&limits);
            }
            Vec::new()
        }
        Msg::FormatSelected(format) => {
            if form_is_editable(&state) {
                state.form_mut().format = format;
            }
            Vec::new()
        }
        Msg::ExcludeEdited(text) => {
            if form_is_editable(&state) {
                state.form_mut().exclude_input = text;
            }
            Vec::new()
        }
        Msg::StreamEvent { session_id, event } => handle_event(&mut state, session_id, event),
        Msg::DownloadRequested => match state.session() {
            SessionState::Completed(result) => {
                let filename = state.output_names().filename_for(result.format).to_string();
                vec![Effect::SaveDocument {
                    filename,
                    content: result.content.clone(),
                }]
            }
            _ => Vec::new(),
        },
        Msg::CopyRequested => match state.session() {
            SessionState::Completed(result) => vec![Effect::CopyToClipboard {
                content: result.content.clone(),
            }],
            _ => Vec::new(),
        },
    };

    (state, effects)
}

fn form_is_editable(state: &AppState) -> bool {
    !matches!(state.session(), SessionState::Active(_))
}

fn submit(state: &mut AppState, raw: String) -> Vec<Effect> {
    // A finished session is replaced by the new one; a running one is not.
    if matches!(state.session(), SessionState::Active(_)) {
        llms_debug!("Submit ignored while a session is active");
        return Vec::new();
    }

    let target_url = match validate_url(&raw) {
        Ok(url) => url,
        Err(err) => {
            state.form_mut().url_input = raw;
            state.set_url_error(Some(err.user_message().to_string()));
            return Vec::new();
        }
    };

    let limits = *state.limits();
    {
        let form = state.form_mut();
        form.url_input = raw;
        form.commit_pages(&limits);
        form.commit_depth(&limits);
    }
    let request = GenerationRequest::from_form(target_url, state.form(), &limits);
    let session_id = state.begin_session(request.clone());
    llms_info!(
        "Session {} started url={} max_pages={} max_depth={} format={}",
        session_id,
        request.target_url,
        request.max_pages,
        request.max_depth,
        request.format
    );
    vec![Effect::OpenStream {
        session_id,
        request,
    }]
}

/// Single entry point for inbound stream events.
fn handle_event(state: &mut AppState, session_id: SessionId, event: StreamEvent) -> Vec<Effect> {
    if !state.is_current(session_id) {
        llms_debug!(
            "Discarding {:?} event for closed session {}",
            event.kind,
            session_id
        );
        return Vec::new();
    }

    let next = match event.kind {
        EventKind::Progress => match decode::<ProgressPayload>(event.data.as_deref()) {
            Some(payload) => {
                state.set_progress(ProgressSnapshot {
                    pages_found: payload.pages_found,
                    current_url: payload.current_url,
                });
                return Vec::new();
            }
            None => SessionState::Failed(CONNECTION_LOST_MESSAGE.to_string()),
        },
        EventKind::Complete => match decode::<CompletePayload>(event.data.as_deref()) {
            Some(payload) => {
                let format = state
                    .active_request()
                    .map(|request| request.format)
                    .unwrap_or_default();
                SessionState::Completed(ResultSnapshot {
                    content: payload.result,
                    pages_crawled: payload.pages_crawled,
                    cached: payload.cached,
                    format,
                })
            }
            None => SessionState::Failed(CONNECTION_LOST_MESSAGE.to_string()),
        },
        EventKind::Error => SessionState::Failed(ErrorPayload::surface(event.data.as_deref())),
    };

    match &next {
        SessionState::Completed(result) => llms_info!(
            "Session {} completed pages_crawled={} cached={} bytes={}",
            session_id,
            result.pages_crawled,
            result.cached,
            result.content.len()
        ),
        SessionState::Failed(message) => {
            llms_info!("Session {} failed: {}", session_id, message)
        }
        SessionState::Idle | SessionState::Active(_) => {}
    }

    match state.finish_session(next) {
        Some(closed) => vec![Effect::CloseStream { session_id: closed }],
        None => Vec::new(),
    }
}

/// Decode a payload, logging (but not surfacing) anything malformed.
fn decode<T: serde::de::DeserializeOwned>(data: Option<&str>) -> Option<T> {
    let Some(raw) = data else {
        llms_warn!("Event arrived without payload");
        return None;
    };
    match serde_json::from_str(raw) {
        Ok(payload) => Some(payload),
        Err(err) => {
            llms_warn!(
                "Malformed {} payload ({} bytes): {}",
                std::any::type_name::<T>(),
                raw.len(),
                err
            );
            None
        }
    }
}
