use std::path::PathBuf;

use llmstxt_core::validate_url;
use llmstxt_engine::StreamSettings;
use thiserror::Error;

/// The single environment variable the client reads.
pub const API_URL_VAR: &str = "LLMS_API_URL";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("LLMS_API_URL={value:?} is not an absolute http(s) url")]
    InvalidBaseUrl { value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub stream: StreamSettings,
    /// Where downloaded documents are written.
    pub output_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut stream = StreamSettings::default();
        if let Some(value) = lookup(API_URL_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            validate_url(&value).map_err(|_| ConfigError::InvalidBaseUrl {
                value: value.clone(),
            })?;
            stream.base_url = value;
        }

        let output_dir = std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("output");

        Ok(Self { stream, output_dir })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_local_service() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.stream.base_url, "http://localhost:8080");
        assert!(config.output_dir.ends_with("output"));
    }

    #[test]
    fn reads_base_url_from_environment() {
        let config = AppConfig::from_lookup(|key| {
            (key == API_URL_VAR).then(|| " https://llms.example.net ".to_string())
        })
        .unwrap();
        assert_eq!(config.stream.base_url, "https://llms.example.net");
    }

    #[test]
    fn blank_value_falls_back_to_default() {
        let config = AppConfig::from_lookup(|_| Some("   ".to_string())).unwrap();
        assert_eq!(config.stream.base_url, "http://localhost:8080");
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = AppConfig::from_lookup(|_| Some("localhost:8080".to_string())).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidBaseUrl {
                value: "localhost:8080".to_string()
            }
        );
    }
}
