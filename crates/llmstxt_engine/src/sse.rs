//! Incremental `text/event-stream` decoder.
//!
//! Bytes are fed in whatever chunks the transport delivers. Lines may end in
//! LF, CRLF or a lone CR, and a chunk boundary may fall anywhere, including
//! inside a UTF-8 sequence or between the CR and LF of one line ending.

const BOM: &[u8] = b"\xEF\xBB\xBF";

/// One dispatched event: its name (`message` when none was given) and data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SseFrame {
    pub event: String,
    pub data: String,
    pub last_event_id: Option<String>,
}

#[derive(Debug, Default)]
pub struct SseDecoder {
    line: Vec<u8>,
    skip_lf: bool,
    seen_first_line: bool,
    event: Option<String>,
    data: String,
    last_event_id: Option<String>,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next chunk and return every event it completed.
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<SseFrame> {
        let mut frames = Vec::new();
        for &byte in chunk {
            if std::mem::take(&mut self.skip_lf) && byte == b'\n' {
                continue;
            }
            match byte {
                b'\n' => self.end_line(&mut frames),
                b'\r' => {
                    self.end_line(&mut frames);
                    self.skip_lf = true;
                }
                _ => self.line.push(byte),
            }
        }
        frames
    }

    /// True when a partially received event is still waiting for its blank line.
    pub fn has_pending(&self) -> bool {
        !self.line.is_empty() || !self.data.is_empty() || self.event.is_some()
    }

    fn end_line(&mut self, frames: &mut Vec<SseFrame>) {
        let mut raw = std::mem::take(&mut self.line);
        if !std::mem::replace(&mut self.seen_first_line, true) && raw.starts_with(BOM) {
            raw.drain(..BOM.len());
        }
        let line = String::from_utf8_lossy(&raw);

        if line.is_empty() {
            if let Some(frame) = self.dispatch() {
                frames.push(frame);
            }
            return;
        }
        if line.starts_with(':') {
            // Comment / keep-alive.
            return;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (&*line, ""),
        };
        match field {
            "event" => self.event = Some(value.to_string()),
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "id" if !value.contains('\0') => self.last_event_id = Some(value.to_string()),
            // Reconnection is never attempted, so `retry` has no use.
            _ => {}
        }
    }

    fn dispatch(&mut self) -> Option<SseFrame> {
        let event = self.event.take();
        if self.data.is_empty() {
            return None;
        }
        let mut data = std::mem::take(&mut self.data);
        data.pop();
        Some(SseFrame {
            event: event
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| "message".to_string()),
            data,
            last_event_id: self.last_event_id.clone(),
        })
    }
}
