//! Remote model providers shared by the embedding and LLM sections

use serde::{Deserialize, Serialize};

/// Which HTTP API a client talks to
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// OpenAI or any OpenAI-compatible endpoint
    #[serde(rename = "openai")]
    OpenAi,
    /// Local Ollama server
    Ollama,
    /// Google Gemini (Generative Language API)
    #[default]
    Gemini,
}

impl Provider {
    pub const NAMES: &'static [&'static str] = &["openai", "ollama", "gemini"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "openai" | "external" => Some(Provider::OpenAi),
            "ollama" => Some(Provider::Ollama),
            "gemini" | "google" => Some(Provider::Gemini),
            _ => None,
        }
    }

    pub fn default_api_base(&self) -> &'static str {
        match self {
            Provider::OpenAi => "https://api.openai.com/v1",
            Provider::Ollama => "http://localhost:11434",
            Provider::Gemini => "https://generativelanguage.googleapis.com/v1beta",
        }
    }

    /// Environment variable holding the credential, if the provider needs one
    pub fn default_api_key_env(&self) -> Option<&'static str> {
        match self {
            Provider::OpenAi => Some("OPENAI_API_KEY"),
            Provider::Ollama => None,
            Provider::Gemini => Some("GEMINI_API_KEY"),
        }
    }

    pub fn default_embedding_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "text-embedding-3-small",
            Provider::Ollama => "nomic-embed-text",
            Provider::Gemini => "models/embedding-001",
        }
    }

    pub fn default_chat_model(&self) -> &'static str {
        match self {
            Provider::OpenAi => "gpt-4o-mini",
            Provider::Ollama => "llama3.1",
            Provider::Gemini => "gemini-1.5-flash",
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Provider::OpenAi => "openai",
            Provider::Ollama => "ollama",
            Provider::Gemini => "gemini",
        };
        f.write_str(name)
    }
}
