use std::fmt;
use std::num::IntErrorKind;
use std::str::FromStr;

use url::Url;

/// Bounds and defaults for the numeric crawl parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min_pages: u32,
    pub max_pages: u32,
    pub default_pages: u32,
    pub min_depth: u32,
    pub max_depth: u32,
    pub default_depth: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_pages: 1,
            max_pages: 75,
            default_pages: 50,
            min_depth: 1,
            max_depth: 5,
            default_depth: 3,
        }
    }
}

impl Limits {
    pub fn clamp_pages(&self, raw: &str) -> u32 {
        clamp_raw(raw, self.min_pages, self.max_pages)
    }

    pub fn clamp_depth(&self, raw: &str) -> u32 {
        clamp_raw(raw, self.min_depth, self.max_depth)
    }

    /// Default page count, pulled into range.
    pub fn initial_pages(&self) -> u32 {
        self.default_pages.max(self.min_pages).min(self.max_pages)
    }

    pub fn initial_depth(&self) -> u32 {
        self.default_depth.max(self.min_depth).min(self.max_depth)
    }
}

/// Clamp raw max-pages text into the default `[1, 75]` range.
pub fn clamp_pages(raw: &str) -> u32 {
    Limits::default().clamp_pages(raw)
}

/// Clamp raw max-depth text into the default `[1, 5]` range.
pub fn clamp_depth(raw: &str) -> u32 {
    Limits::default().clamp_depth(raw)
}

/// Unparseable input falls back to `min`; overflowing input saturates.
fn clamp_raw(raw: &str, min: u32, max: u32) -> u32 {
    match raw.trim().parse::<i64>() {
        Ok(value) if value < i64::from(min) => min,
        Ok(value) if value > i64::from(max) => max,
        Ok(value) => value as u32,
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow => max,
            _ => min,
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Standard,
    Full,
}

impl OutputFormat {
    pub fn as_query_value(self) -> &'static str {
        match self {
            OutputFormat::Standard => "standard",
            OutputFormat::Full => "full",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(OutputFormat::Standard),
            "full" => Ok(OutputFormat::Full),
            other => Err(format!("unknown output format {other:?}")),
        }
    }
}

/// Download filenames per output format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputNames {
    pub standard: String,
    pub full: String,
}

impl Default for OutputNames {
    fn default() -> Self {
        Self {
            standard: "llms.txt".to_string(),
            full: "llms-full.txt".to_string(),
        }
    }
}

impl OutputNames {
    pub fn filename_for(&self, format: OutputFormat) -> &str {
        match format {
            OutputFormat::Standard => &self.standard,
            OutputFormat::Full => &self.full,
        }
    }
}

/// Raw form fields as the user last left them.
///
/// Numeric fields keep the typed text until the field is committed, at which
/// point they are replaced by the clamped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub url_input: String,
    pub pages_input: String,
    pub depth_input: String,
    pub format: OutputFormat,
    pub exclude_input: String,
}

impl FormState {
    pub fn new(limits: &Limits) -> Self {
        Self {
            url_input: String::new(),
            pages_input: limits.initial_pages().to_string(),
            depth_input: limits.initial_depth().to_string(),
            format: OutputFormat::default(),
            exclude_input: String::new(),
        }
    }

    pub(crate) fn commit_pages(&mut self, limits: &Limits) -> u32 {
        let pages = limits.clamp_pages(&self.pages_input);
        self.pages_input = pages.to_string();
        pages
    }

    pub(crate) fn commit_depth(&mut self, limits: &Limits) -> u32 {
        let depth = limits.clamp_depth(&self.depth_input);
        self.depth_input = depth.to_string();
        depth
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new(&Limits::default())
    }
}

/// Split exclude text on commas and newlines, dropping blank fragments.
pub fn parse_exclude_paths(raw: &str) -> Vec<String> {
    raw.trim()
        .split([',', '\n', '\r'])
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(ToOwned::to_owned)
        .collect()
}

/// Immutable description of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub target_url: Url,
    pub max_pages: u32,
    pub max_depth: u32,
    pub format: OutputFormat,
    pub exclude_paths: Vec<String>,
}

impl GenerationRequest {
    /// Build a request from form text, clamping the numeric fields again.
    pub fn from_form(target_url: Url, form: &FormState, limits: &Limits) -> Self {
        Self {
            target_url,
            max_pages: limits.clamp_pages(&form.pages_input),
            max_depth: limits.clamp_depth(&form.depth_input),
            format: form.format,
            exclude_paths: parse_exclude_paths(&form.exclude_input),
        }
    }

    /// Query parameters for the stream endpoint, unencoded.
    ///
    /// `exclude` is omitted entirely when there are no fragments.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("url", self.target_url.to_string()),
            ("max_pages", self.max_pages.to_string()),
            ("max_depth", self.max_depth.to_string()),
            ("format", self.format.as_query_value().to_string()),
        ];
        if !self.exclude_paths.is_empty() {
            pairs.push(("exclude", self.exclude_paths.join(",")));
        }
        pairs
    }
}
