#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Open the event stream for a freshly submitted request.
    OpenStream {
        session_id: crate::SessionId,
        request: crate::GenerationRequest,
    },
    /// Close the stream of a session that reached a terminal state.
    CloseStream { session_id: crate::SessionId },
    /// Write the finished document under `filename`.
    SaveDocument { filename: String, content: String },
    CopyToClipboard { content: String },
}
