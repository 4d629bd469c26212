//! AI service configuration
//!
//! Loaded from environment variables. Either endpoint may be left unset, in
//! which case that call always serves its fallback payload.

use std::time::Duration;

use crate::retry::RetryConfig;

/// Configuration for the external AI service.
#[derive(Clone, Default)]
pub struct AiConfig {
    /// Resume parser endpoint, called with `{ "text": ... }`
    pub resume_parser_url: Option<String>,

    /// Learning path endpoint, called with `{ "currentSkills": [...], "goalRole": ... }`
    pub learning_path_url: Option<String>,

    /// Optional bearer key sent to both endpoints
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Retries after the first attempt. Zero keeps each call to one round trip.
    pub max_retries: u32,
}

impl std::fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AiConfig")
            .field("resume_parser_url", &self.resume_parser_url)
            .field("learning_path_url", &self.learning_path_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl AiConfig {
    pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
    pub const DEFAULT_MAX_RETRIES: u32 = 0;

    /// No endpoints: every call falls back.
    pub fn offline() -> Self {
        Self {
            timeout_secs: Self::DEFAULT_TIMEOUT_SECS,
            max_retries: Self::DEFAULT_MAX_RETRIES,
            ..Self::default()
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `AI_RESUME_PARSER_URL`: resume parser endpoint
    /// - `AI_LEARNING_PATH_URL`: learning path endpoint
    /// - `AI_API_KEY`: bearer key for both endpoints
    /// - `AI_TIMEOUT_SECS`: request timeout in seconds (default: 10)
    /// - `AI_MAX_RETRIES`: retries after the first attempt (default: 0)
    pub fn from_env() -> Self {
        let non_empty = |key: &str| {
            std::env::var(key)
                .ok()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            resume_parser_url: non_empty("AI_RESUME_PARSER_URL"),
            learning_path_url: non_empty("AI_LEARNING_PATH_URL"),
            api_key: non_empty("AI_API_KEY"),
            timeout_secs: std::env::var("AI_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Self::DEFAULT_TIMEOUT_SECS),
            max_retries: std::env::var("AI_MAX_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Self::DEFAULT_MAX_RETRIES),
        }
    }

    pub fn with_resume_parser_url(mut self, url: impl Into<String>) -> Self {
        self.resume_parser_url = Some(url.into());
        self
    }

    pub fn with_learning_path_url(mut self, url: impl Into<String>) -> Self {
        self.learning_path_url = Some(url.into());
        self
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_max_retries(mut self, retries: u32) -> Self {
        self.max_retries = retries;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::with_retries(self.max_retries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offline_defaults() {
        let config = AiConfig::offline();
        assert!(config.resume_parser_url.is_none());
        assert!(config.learning_path_url.is_none());
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert_eq!(config.retry_config().max_attempts, 1);
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = AiConfig::offline().with_api_key("sk-very-secret");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("sk-very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
