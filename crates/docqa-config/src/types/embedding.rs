//! Embedding provider configuration

use super::provider::Provider;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding backend to use
    #[serde(default)]
    pub backend: Provider,

    /// Model name for the selected backend
    ///
    /// Falls back to the backend default when unset:
    /// - OpenAI: "text-embedding-3-small"
    /// - Ollama: "nomic-embed-text"
    /// - Gemini: "models/embedding-001"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_name: Option<String>,

    /// Optional API base URL override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Environment variable that holds the API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key_env: Option<String>,

    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for rate limits and transient network failures
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
}

impl EmbeddingConfig {
    pub fn model(&self) -> &str {
        self.model_name
            .as_deref()
            .unwrap_or_else(|| self.backend.default_embedding_model())
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

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: Provider::default(),
            model_name: None,
            api_base: None,
            api_key_env: None,
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl crate::validation::Validate for EmbeddingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::validation::{validate_api_base, validate_non_empty};

        if let Some(model) = &self.model_name {
            validate_non_empty("embedding.model_name", model)?;
        }
        validate_api_base("embedding.api_base", self.api_base.as_deref())?;
        crate::validation::validate_positive("embedding.timeout_secs", self.timeout_secs as usize, 0)?;
        Ok(())
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}
