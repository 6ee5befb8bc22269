use crate::embedder::{gemini_model_path, require_key, GeminiContent, GeminiPart};
use crate::http::{build_client, send_json};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use docqa_config::{LlmConfig, Provider};
use docqa_core::traits::LlmClient;
use docqa_core::{RagError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Sampling settings every client sends with a request
#[derive(Debug, Clone, Copy)]
pub struct Sampling {
    pub max_tokens: u32,
    pub temperature: f32,
}

impl From<&LlmConfig> for Sampling {
    fn from(config: &LlmConfig) -> Self {
        Self {
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

pub fn select_llm(config: &LlmConfig, api_key: Option<String>) -> Result<Arc<dyn LlmClient>> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let retry = RetryPolicy::new(config.max_retries);
    let sampling = Sampling::from(config);
    let model = config.model().to_string();
    let api_base = config.api_base().to_string();
    debug!("llm backend {} ({})", config.backend, model);

    let client: Arc<dyn LlmClient> = match config.backend {
        Provider::OpenAi => {
            let key = require_key(api_key, config.api_key_env(), "OpenAI")?;
            Arc::new(OpenAiClient::new(key, &api_base, model, sampling, timeout, retry)?)
        }
        Provider::Ollama => Arc::new(OllamaClient::new(&api_base, model, sampling, timeout, retry)?),
        Provider::Gemini => {
            let key = require_key(api_key, config.api_key_env(), "Gemini")?;
            Arc::new(GeminiClient::new(key, &api_base, model, sampling, timeout, retry)?)
        }
    };
    Ok(client)
}

fn non_empty(provider: &str, content: String) -> Result<String> {
    if content.trim().is_empty() {
        Err(RagError::InvalidInput(format!("empty response from {}", provider)))
    } else {
        Ok(content)
    }
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// OpenAI-compatible chat completions
pub struct OpenAiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    sampling: Sampling,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct OpenAiChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiMessage {
    content: Option<String>,
}

impl OpenAiClient {
    pub fn new(
        api_key: String,
        api_base: &str,
        model: String,
        sampling: Sampling,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: format!("{}/chat/completions", api_base.trim_end_matches('/')),
            api_key,
            model,
            sampling,
            retry,
        })
    }
}

fn openai_content(response: OpenAiChatResponse) -> Result<String> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .unwrap_or_default();
    non_empty("OpenAI", content)
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let response: OpenAiChatResponse = self
            .retry
            .run("OpenAI chat", || {
                let request = self
                    .client
                    .post(&self.endpoint)
                    .bearer_auth(&self.api_key)
                    .json(&OpenAiChatRequest {
                        model: &self.model,
                        messages: [ChatMessage {
                            role: "user",
                            content: prompt,
                        }],
                        max_tokens: self.sampling.max_tokens,
                        temperature: self.sampling.temperature,
                    });
                send_json("OpenAI", request)
            })
            .await?;
        openai_content(response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Ollama `/api/chat` without streaming
pub struct OllamaClient {
    client: Client,
    endpoint: String,
    model: String,
    sampling: Sampling,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    stream: bool,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: OllamaMessage,
}

#[derive(Debug, Deserialize)]
struct OllamaMessage {
    #[serde(default)]
    content: String,
}

impl OllamaClient {
    pub fn new(
        base_url: &str,
        model: String,
        sampling: Sampling,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: format!("{}/api/chat", base_url.trim_end_matches('/')),
            model,
            sampling,
            retry,
        })
    }
}

#[async_trait]
impl LlmClient for OllamaClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let response: OllamaChatResponse = self
            .retry
            .run("Ollama chat", || {
                let request = self.client.post(&self.endpoint).json(&OllamaChatRequest {
                    model: &self.model,
                    messages: [ChatMessage {
                        role: "user",
                        content: prompt,
                    }],
                    stream: false,
                    options: OllamaOptions {
                        temperature: self.sampling.temperature,
                        num_predict: self.sampling.max_tokens,
                    },
                });
                send_json("Ollama", request)
            })
            .await?;
        non_empty("Ollama", response.message.content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Gemini `generateContent`
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    sampling: Sampling,
    retry: RetryPolicy,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerateRequest<'a> {
    contents: [GeminiContent<'a>; 1],
    generation_config: GeminiGenerationConfig,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiGenerateResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiCandidateContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiCandidatePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidatePart {
    #[serde(default)]
    text: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        api_base: &str,
        model: String,
        sampling: Sampling,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let path = gemini_model_path(&model);
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: format!(
                "{}/{}:generateContent",
                api_base.trim_end_matches('/'),
                path
            ),
            api_key,
            model,
            sampling,
            retry,
        })
    }
}

fn gemini_text(response: GeminiGenerateResponse) -> Result<String> {
    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .map(|p| p.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default();
    non_empty("Gemini", text)
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        let response: GeminiGenerateResponse = self
            .retry
            .run("Gemini generate", || {
                let request = self
                    .client
                    .post(&self.endpoint)
                    .header("x-goog-api-key", &self.api_key)
                    .json(&GeminiGenerateRequest {
                        contents: [GeminiContent {
                            parts: vec![GeminiPart { text: prompt }],
                        }],
                        generation_config: GeminiGenerationConfig {
                            temperature: self.sampling.temperature,
                            max_output_tokens: self.sampling.max_tokens,
                        },
                    });
                send_json("Gemini", request)
            })
            .await?;
        gemini_text(response)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_content() {
        let response: OpenAiChatResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": "Paris."}}]}"#,
        )
        .unwrap();
        assert_eq!(openai_content(response).unwrap(), "Paris.");

        let empty: OpenAiChatResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(matches!(openai_content(empty), Err(RagError::InvalidInput(_))));
    }

    #[test]
    fn test_gemini_text_joins_parts() {
        let response: GeminiGenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "Paris "}, {"text": "is the capital."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(gemini_text(response).unwrap(), "Paris is the capital.");
    }

    #[test]
    fn test_gemini_blocked_response_is_error() {
        let response: GeminiGenerateResponse =
            serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        assert!(gemini_text(response).is_err());
    }

    #[test]
    fn test_gemini_request_uses_camel_case() {
        let body = serde_json::to_value(GeminiGenerateRequest {
            contents: [GeminiContent {
                parts: vec![GeminiPart { text: "hi" }],
            }],
            generation_config: GeminiGenerationConfig {
                temperature: 0.5,
                max_output_tokens: 100,
            },
        })
        .unwrap();
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 100);
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
    }

    #[test]
    fn test_select_llm_defaults() {
        let config = LlmConfig {
            backend: Provider::OpenAi,
            ..Default::default()
        };
        assert!(matches!(
            select_llm(&config, None).err(),
            Some(RagError::AuthenticationFailed(_))
        ));
        let client = select_llm(&config, Some("sk-test".to_string())).unwrap();
        assert_eq!(client.model(), "gpt-4o-mini");
    }
}
