//! Network adapters: embedding providers, LLM clients and the retry policy they share

pub mod embedder;
pub mod http;
pub mod llm;
pub mod retry;

pub use embedder::{select_embedder, GeminiEmbedder, OllamaEmbedder, OpenAiEmbedder};
pub use llm::{select_llm, GeminiClient, OllamaClient, OpenAiClient};
pub use retry::RetryPolicy;

/// Read an API key from `var`, treating blank values as unset
pub fn api_key_from_env(var: Option<&str>) -> Option<String> {
    let var = var?;
    std::env::var(var)
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
}
