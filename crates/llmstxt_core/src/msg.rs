#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the URL input box.
    UrlInputChanged(String),
    /// User submitted a URL for generation.
    Submit(String),
    /// User clicked "Generate another" / "Try again".
    Reset,
    /// Keystroke in the max-pages field; not clamped yet.
    PagesEdited(String),
    /// Max-pages field lost focus.
    PagesCommitted,
    /// Keystroke in the max-depth field; not clamped yet.
    DepthEdited(String),
    /// Max-depth field lost focus.
    DepthCommitted,
    FormatSelected(crate::OutputFormat),
    ExcludeEdited(String),
    /// Event delivered by the stream of `session_id`.
    StreamEvent {
        session_id: crate::SessionId,
        event: crate::StreamEvent,
    },
    /// User asked to save the finished document.
    DownloadRequested,
    /// User asked to copy the finished document.
    CopyRequested,
}
