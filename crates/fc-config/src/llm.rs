//! Chat-completion API configuration.
//!
//! An empty `api_key` is the normal "no remote model" state: the assistant
//! then answers from its local templates.

use serde::{Deserialize, Serialize};

use crate::ConfigError;

fn default_endpoint() -> String {
    String::from("https://api.openai.com/v1/chat/completions")
}

fn default_model() -> String {
    String::from("gpt-4o-mini")
}

const fn default_temperature() -> f32 {
    0.3
}

const fn default_max_tokens() -> u32 {
    500
}

const fn default_timeout_secs() -> u64 {
    20
}

const fn default_retry_backoff_ms() -> u64 {
    250
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// Bearer credential for the completion API. Empty = local templates only.
    #[serde(default)]
    pub api_key: String,

    /// Full URL of the chat-completion endpoint.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on completion length.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Per-request timeout. A timed-out call falls back to templates.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Delay before the single retry after a connection error.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            endpoint: default_endpoint(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl LlmConfig {
    /// Whether a credential is present, i.e. remote mode is enabled.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "llm.temperature".into(),
                reason: format!("must be between 0 and 2, got {}", self.temperature),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.max_tokens".into(),
                reason: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}
