use url::Url;

/// Shown inline next to the URL field whenever validation fails.
pub const INVALID_URL_MESSAGE: &str = "Please enter a valid URL (e.g. https://example.com)";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter a valid URL (e.g. https://example.com)")]
    InvalidUrl,
}

impl ValidationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ValidationError::InvalidUrl => INVALID_URL_MESSAGE,
        }
    }
}

/// Parse user input into an absolute `http`/`https` URL.
///
/// Surrounding whitespace is ignored. Anything else that does not parse, uses
/// another scheme, or has no host is rejected.
pub fn validate_url(raw: &str) -> Result<Url, ValidationError> {
    let parsed = Url::parse(raw.trim()).map_err(|_| ValidationError::InvalidUrl)?;
    match parsed.scheme() {
        "http" | "https" => {}
        _ => return Err(ValidationError::InvalidUrl),
    }
    if parsed.host_str().map_or(true, str::is_empty) {
        return Err(ValidationError::InvalidUrl);
    }
    Ok(parsed)
}
