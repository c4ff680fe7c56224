use llmstxt_engine::{SseDecoder, SseFrame};
use pretty_assertions::assert_eq;

fn frame(event: &str, data: &str) -> SseFrame {
    SseFrame {
        event: event.to_string(),
        data: data.to_string(),
        last_event_id: None,
    }
}

#[test]
fn decodes_named_events_as_sent_by_the_generator() {
    let mut decoder = SseDecoder::new();
    let body = concat!(
        "event: progress\n",
        "data: {\"status\":\"crawling\",\"pages_found\":1,\"current_url\":\"https://example.com\"}\n",
        "\n",
        "event: complete\n",
        "data: {\"result\":\"# Example\",\"cached\":false,\"pages_crawled\":1}\n",
        "\n",
    );

    let frames = decoder.feed(body.as_bytes());
    assert_eq!(
        frames,
        vec![
            frame(
                "progress",
                r#"{"status":"crawling","pages_found":1,"current_url":"https://example.com"}"#
            ),
            frame(
                "complete",
                r##"{"result":"# Example","cached":false,"pages_crawled":1}"##
            ),
        ]
    );
    assert!(!decoder.has_pending());
}

#[test]
fn events_split_across_chunks_are_reassembled() {
    let mut decoder = SseDecoder::new();
    assert!(decoder.feed(b"event: prog").is_empty());
    assert!(decoder.feed(b"ress\r").is_empty());
    assert!(decoder.feed(b"\ndata: {\"pages_found\":2,").is_empty());
    assert!(decoder.has_pending());
    let frames = decoder.feed(b"\"current_url\":\"\"}\r\n\r\n");

    assert_eq!(
        frames,
        vec![frame("progress", r#"{"pages_found":2,"current_url":""}"#)]
    );
}

#[test]
fn utf8_split_inside_a_character_survives() {
    let mut decoder = SseDecoder::new();
    let text = "data: no pages found — site unreachable\n\n".as_bytes();
    let split = text.iter().position(|&b| b == 0xE2).unwrap() + 1;

    assert!(decoder.feed(&text[..split]).is_empty());
    let frames = decoder.feed(&text[split..]);
    assert_eq!(frames, vec![frame("message", "no pages found — site unreachable")]);
}

#[test]
fn comments_and_unknown_fields_are_ignored() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b": keep-alive\n\nretry: 1000\nfoo: bar\nevent: error\ndata: {}\n\n");
    assert_eq!(frames, vec![frame("error", "{}")]);
}

#[test]
fn multi_line_data_is_joined_with_newlines() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"event: complete\ndata: line one\ndata:line two\ndata\n\n");
    assert_eq!(frames, vec![frame("complete", "line one\nline two\n")]);
}

#[test]
fn event_without_data_is_not_dispatched() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"event: error\n\ndata: after\n\n");
    // The name does not leak into the next event.
    assert_eq!(frames, vec![frame("message", "after")]);
}

#[test]
fn lone_carriage_returns_end_lines() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"event: progress\rdata: x\r\r");
    assert_eq!(frames, vec![frame("progress", "x")]);
}

#[test]
fn leading_bom_and_ids_are_handled() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"\xEF\xBB\xBFid: 7\nevent: progress\ndata: x\n\n");
    assert_eq!(
        frames,
        vec![SseFrame {
            event: "progress".to_string(),
            data: "x".to_string(),
            last_event_id: Some("7".to_string()),
        }]
    );
}

#[test]
fn unterminated_event_is_held_back() {
    let mut decoder = SseDecoder::new();
    let frames = decoder.feed(b"event: complete\ndata: {\"result\":\"x\"}\n");
    assert!(frames.is_empty());
    assert!(decoder.has_pending());
}
