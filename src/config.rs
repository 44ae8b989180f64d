//! Process configuration, read from the environment at startup.

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TEXT_MODEL: &str = "gemini-1.5-flash";
const DEFAULT_IMAGE_MODEL: &str = "imagen-3.0-generate-002";
const DEFAULT_INQUIRY_TIMEOUT_SECS: u64 = 120;
const DEFAULT_LLM_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Required environment variable {0} is not set")]
    Missing(&'static str),

    #[error("Environment variable {key} is invalid: {detail}")]
    Invalid { key: &'static str, detail: String },
}

/// Everything the process needs from its environment. Missing optional keys
/// fall back to defaults; a missing API key is fatal.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind_addr: SocketAddr,
    pub gemini_api_key: String,
    pub text_model: String,
    pub image_model: String,
    /// How long `/client_inquiry` waits for the workflow before replying 504.
    pub inquiry_timeout: Duration,
    /// Per-request timeout on outbound generative API calls.
    pub llm_timeout: Duration,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bind_addr = get("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse::<SocketAddr>()
            .map_err(|err| ConfigError::Invalid {
                key: "BIND_ADDR",
                detail: err.to_string(),
            })?;

        let gemini_api_key = get("GEMINI_API_KEY")
            .filter(|key| !key.is_empty())
            .ok_or(ConfigError::Missing("GEMINI_API_KEY"))?;

        Ok(Self {
            bind_addr,
            gemini_api_key,
            text_model: get("GEMINI_TEXT_MODEL").unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image_model: get("GEMINI_IMAGE_MODEL")
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            inquiry_timeout: seconds(
                get("INQUIRY_TIMEOUT_SECS"),
                "INQUIRY_TIMEOUT_SECS",
                DEFAULT_INQUIRY_TIMEOUT_SECS,
            )?,
            llm_timeout: seconds(
                get("LLM_REQUEST_TIMEOUT_SECS"),
                "LLM_REQUEST_TIMEOUT_SECS",
                DEFAULT_LLM_TIMEOUT_SECS,
            )?,
        })
    }
}

fn seconds(
    value: Option<String>,
    key: &'static str,
    default_secs: u64,
) -> Result<Duration, ConfigError> {
    match value {
        None => Ok(Duration::from_secs(default_secs)),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_secs)
            .map_err(|err| ConfigError::Invalid {
                key,
                detail: err.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let settings = Settings::from_lookup(lookup(&[("GEMINI_API_KEY", "k")])).unwrap();

        assert_eq!(settings.bind_addr.port(), 3000);
        assert_eq!(settings.text_model, "gemini-1.5-flash");
        assert_eq!(settings.image_model, "imagen-3.0-generate-002");
        assert_eq!(settings.inquiry_timeout, Duration::from_secs(120));
        assert_eq!(settings.llm_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_missing_api_key_is_fatal() {
        let err = Settings::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("GEMINI_API_KEY")));
    }

    #[test]
    fn test_empty_api_key_counts_as_missing() {
        let err = Settings::from_lookup(lookup(&[("GEMINI_API_KEY", "")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing("GEMINI_API_KEY")));
    }

    #[test]
    fn test_overrides_win() {
        let settings = Settings::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("INQUIRY_TIMEOUT_SECS", "15"),
        ]))
        .unwrap();

        assert_eq!(settings.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(settings.inquiry_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_bad_timeout_rejected() {
        let err = Settings::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "k"),
            ("INQUIRY_TIMEOUT_SECS", "soon"),
        ]))
        .unwrap_err();

        assert!(matches!(
            err,
            ConfigError::Invalid {
                key: "INQUIRY_TIMEOUT_SECS",
                ..
            }
        ));
    }
}
