use crate::{OutputFormat, OutputNames, ProgressSnapshot, ResultSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionKind {
    #[default]
    Idle,
    Active,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormView {
    pub url: String,
    pub pages: String,
    pub depth: String,
    pub format: OutputFormat,
    pub exclude: String,
    pub editable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub label: String,
    pub detail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub filename: String,
    pub summary_line: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub session: SessionKind,
    pub form: FormView,
    pub url_error: Option<String>,
    pub progress: Option<ProgressView>,
    pub result: Option<ResultView>,
    pub error: Option<String>,
    pub can_submit: bool,
    pub can_reset: bool,
}

pub fn project_progress(snapshot: &ProgressSnapshot) -> ProgressView {
    let detail = if snapshot.current_url.is_empty() {
        None
    } else {
        Some(snapshot.current_url.clone())
    };
    ProgressView {
        label: format!("{} found", page_count(snapshot.pages_found)),
        detail,
    }
}

pub fn project_result(result: &ResultSnapshot, names: &OutputNames) -> ResultView {
    let mut summary_line = page_count(result.pages_crawled);
    if result.cached {
        summary_line.push_str(" · cached");
    }
    ResultView {
        filename: names.filename_for(result.format).to_string(),
        summary_line,
        content: result.content.clone(),
    }
}

fn page_count(n: u64) -> String {
    if n == 1 {
        "1 page".to_string()
    } else {
        format!("{n} pages")
    }
}
