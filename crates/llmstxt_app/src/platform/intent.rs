use llmstxt_core::{Msg, OutputFormat};

/// What one line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Dispatch(Vec<Msg>),
    Help,
    Quit,
    Invalid(String),
}

pub fn parse_line(line: &str) -> Intent {
    let line = line.trim();
    if line.is_empty() {
        return Intent::Dispatch(Vec::new());
    }

    let (command, rest) = match line.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command.to_ascii_lowercase().as_str() {
        "help" | "?" => Intent::Help,
        "quit" | "exit" => Intent::Quit,
        "reset" | "again" => Intent::Dispatch(vec![Msg::Reset]),
        "save" | "download" => Intent::Dispatch(vec![Msg::DownloadRequested]),
        "copy" => Intent::Dispatch(vec![Msg::CopyRequested]),
        "pages" => Intent::Dispatch(vec![Msg::PagesEdited(rest.to_string()), Msg::PagesCommitted]),
        "depth" => Intent::Dispatch(vec![Msg::DepthEdited(rest.to_string()), Msg::DepthCommitted]),
        "format" => match rest.parse::<OutputFormat>() {
            Ok(format) => Intent::Dispatch(vec![Msg::FormatSelected(format)]),
            Err(err) => Intent::Invalid(err),
        },
        // Fragments may be separated by commas or spaces at the prompt.
        "exclude" => Intent::Dispatch(vec![Msg::ExcludeEdited(
            rest.split_whitespace().collect::<Vec<_>>().join(","),
        )]),
        _ => Intent::Dispatch(vec![
            Msg::UrlInputChanged(line.to_string()),
            Msg::Submit(line.to_string()),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anything_unrecognised_is_submitted_as_a_url() {
        assert_eq!(
            parse_line("  https://example.com "),
            Intent::Dispatch(vec![
                Msg::UrlInputChanged("https://example.com".into()),
                Msg::Submit("https://example.com".into()),
            ])
        );
        assert_eq!(
            parse_line("example.com"),
            Intent::Dispatch(vec![
                Msg::UrlInputChanged("example.com".into()),
                Msg::Submit("example.com".into()),
            ])
        );
    }

    #[test]
    fn numeric_fields_are_edited_then_committed() {
        assert_eq!(
            parse_line("pages 999"),
            Intent::Dispatch(vec![Msg::PagesEdited("999".into()), Msg::PagesCommitted])
        );
        assert_eq!(
            parse_line("DEPTH"),
            Intent::Dispatch(vec![Msg::DepthEdited(String::new()), Msg::DepthCommitted])
        );
    }

    #[test]
    fn format_must_be_known() {
        assert_eq!(
            parse_line("format full"),
            Intent::Dispatch(vec![Msg::FormatSelected(OutputFormat::Full)])
        );
        assert!(matches!(parse_line("format pdf"), Intent::Invalid(_)));
    }

    #[test]
    fn exclude_accepts_space_separated_fragments() {
        assert_eq!(
            parse_line("exclude /blog  /news,/legal"),
            Intent::Dispatch(vec![Msg::ExcludeEdited("/blog,/news,/legal".into())])
        );
        assert_eq!(
            parse_line("exclude"),
            Intent::Dispatch(vec![Msg::ExcludeEdited(String::new())])
        );
    }

    #[test]
    fn control_words() {
        assert_eq!(parse_line("quit"), Intent::Quit);
        assert_eq!(parse_line("?"), Intent::Help);
        assert_eq!(parse_line("reset"), Intent::Dispatch(vec![Msg::Reset]));
        assert_eq!(parse_line("save"), Intent::Dispatch(vec![Msg::DownloadRequested]));
        assert_eq!(parse_line("   "), Intent::Dispatch(Vec::new()));
    }
}
