//! LLM configuration

use super::provider::Provider;
use serde::{Deserialize, Serialize};

/// Answer-generation model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub backend: Provider,

    /// Model name
    ///
    /// Examples: "gemini-1.5-flash", "gpt-4o-mini", "llama3.1"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Maximum tokens for LLM responses
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Optional API base URL override
    ///
    /// Use this to point to alternative OpenAI-compatible endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Environment variable that holds the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

impl LlmConfig {
    pub fn model(&self) -> &str {
        self.model
            .as_deref()
            .unwrap_or_else(|| self.backend.default_chat_model())
    }

    pub fn api_base(&self) -> &str {
        self.api_base
            .as_deref()
            .unwrap_or_else(|| self.backend.default_api_base())
    }

    pub fn api_key_env(&self) -> Option<&str> {
        self.api_key_env
            .as_deref()
            .or_else(|| self.backend.default_api_key_env())
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            backend: Provider::default(),
            model: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            api_base: None,
            api_key_env: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl crate::validation::Validate for LlmConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::{validate_api_base, validate_non_empty, validate_range};

        if let Some(model) = &self.model {
            validate_non_empty("llm.model", model)?;
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::ValidationError {
                field: "llm.max_tokens".to_string(),
                message: "max_tokens must be > 0".to_string(),
            });
        }

        validate_range("llm.temperature", f64::from(self.temperature), 0.0, 2.0)?;
        validate_api_base("llm.api_base", self.api_base.as_deref())?;
        Ok(())
    }
}

fn default_max_tokens() -> u32 {
    800
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_max_retries() -> usize {
    3
}
