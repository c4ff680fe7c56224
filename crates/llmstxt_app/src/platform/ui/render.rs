use llmstxt_core::{AppViewModel, SessionKind};

use super::constants::{HELP, PROGRESS_MARKER, RULE, TITLE};
use crate::platform::effects::Notice;

pub fn banner(base_url: &str) -> Vec<String> {
    let mut lines = vec![
        TITLE.to_string(),
        format!("service: {base_url}"),
        String::new(),
    ];
    lines.extend(help());
    lines
}

pub fn help() -> Vec<String> {
    HELP.iter().map(|line| line.to_string()).collect()
}

/// Turn a view model into terminal lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(error) = &view.url_error {
        lines.push(format!("! {error}"));
    }
    match view.session {
        SessionKind::Idle => {
            lines.push(format!(
                "pages={} depth={} format={} exclude={}",
                view.form.pages,
                view.form.depth,
                view.form.format,
                if view.form.exclude.is_empty() {
                    "-"
                } else {
                    view.form.exclude.as_str()
                }
            ));
        }
        SessionKind::Active => {
            if let Some(progress) = &view.progress {
                lines.push(format!("{PROGRESS_MARKER} Mapping... {}", progress.label));
                if let Some(detail) = &progress.detail {
                    lines.push(format!("    {detail}"));
                }
            }
        }
        SessionKind::Completed => {
            if let Some(result) = &view.result {
                lines.push(format!("{}  {}", result.filename, result.summary_line));
                lines.push(RULE.to_string());
                lines.extend(result.content.lines().map(ToOwned::to_owned));
                lines.push(RULE.to_string());
                lines.push(format!("save | copy{}", actions(view)));
            }
        }
        SessionKind::Failed => {
            if let Some(error) = &view.error {
                lines.push(format!("error: {error}"));
            }
            lines.push(format!("try again{}", actions(view)));
        }
    }
    lines
}

fn actions(view: &AppViewModel) -> String {
    let mut hint = String::new();
    if view.can_reset {
        hint.push_str(" | reset");
    }
    if view.can_submit {
        hint.push_str(" | <url>");
    }
    hint
}

pub fn render_notice(notice: &Notice) -> Vec<String> {
    match notice {
        Notice::Saved(path) => vec![format!("saved {}", path.display())],
        Notice::SaveFailed(err) => vec![format!("! could not save: {err}")],
        Notice::Copied(content) => content.lines().map(ToOwned::to_owned).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use llmstxt_core::{update, AppState, EventKind, Msg, StreamEvent};

    fn active_with_progress() -> AppState {
        let (state, _) = update(AppState::new(), Msg::Submit("https://example.com".into()));
        let (state, _) = update(
            state,
            Msg::StreamEvent {
                session_id: 1,
                event: StreamEvent::new(
                    EventKind::Progress,
                    r#"{"pages_found":3,"current_url":"https://example.com/about"}"#,
                ),
            },
        );
        state
    }

    #[test]
    fn idle_shows_parameters_and_field_error() {
        let (state, _) = update(AppState::new(), Msg::Submit("example.com".into()));
        let lines = render(&state.view());
        assert_eq!(
            lines,
            vec![
                "! Please enter a valid URL (e.g. https://example.com)".to_string(),
                "pages=50 depth=3 format=standard exclude=-".to_string(),
            ]
        );
    }

    #[test]
    fn active_shows_progress() {
        let lines = render(&active_with_progress().view());
        assert_eq!(
            lines,
            vec![
                ">>> Mapping... 3 pages found".to_string(),
                "    https://example.com/about".to_string(),
            ]
        );
    }

    #[test]
    fn completed_shows_document_with_filename() {
        let (state, _) = update(
            active_with_progress(),
            Msg::StreamEvent {
                session_id: 1,
                event: StreamEvent::new(
                    EventKind::Complete,
                    r##"{"result":"# Example\n> Summary","pages_crawled":12,"cached":true}"##,
                ),
            },
        );
        let lines = render(&state.view());
        assert_eq!(lines[0], "llms.txt  12 pages · cached");
        assert!(lines.contains(&"# Example".to_string()));
        assert!(lines.contains(&"> Summary".to_string()));
        assert_eq!(lines.last().map(String::as_str), Some("save | copy | reset | <url>"));
    }

    #[test]
    fn failed_shows_message() {
        let (state, _) = update(
            active_with_progress(),
            Msg::StreamEvent {
                session_id: 1,
                event: StreamEvent::transport_failure(),
            },
        );
        let lines = render(&state.view());
        assert_eq!(
            lines,
            vec![
                "error: Connection lost. Please try again.".to_string(),
                "try again | reset | <url>".to_string(),
            ]
        );
    }

    #[test]
    fn field_error_is_shown_over_a_failed_session() {
        let (state, _) = update(
            active_with_progress(),
            Msg::StreamEvent {
                session_id: 1,
                event: StreamEvent::transport_failure(),
            },
        );
        let (state, _) = update(state, Msg::Submit("example.org".into()));
        let lines = render(&state.view());
        assert_eq!(
            &lines[..2],
            &[
                "! Please enter a valid URL (e.g. https://example.com)".to_string(),
                "error: Connection lost. Please try again.".to_string(),
            ]
        );
    }
}
