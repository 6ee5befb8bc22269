use crate::http::{build_client, send_json};
use crate::retry::RetryPolicy;
use async_trait::async_trait;
use docqa_config::{EmbeddingConfig, Provider};
use docqa_core::traits::Embedder;
use docqa_core::{RagError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Build the configured embedding backend
///
/// `api_key` is required for OpenAI and Gemini; Ollama ignores it.
pub fn select_embedder(
    config: &EmbeddingConfig,
    api_key: Option<String>,
) -> Result<Arc<dyn Embedder>> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let retry = RetryPolicy::new(config.max_retries);
    let model = config.model().to_string();
    let api_base = config.api_base().to_string();
    debug!("embedding backend {} ({})", config.backend, model);

    let embedder: Arc<dyn Embedder> = match config.backend {
        Provider::OpenAi => {
            let key = require_key(api_key, config.api_key_env(), "OpenAI")?;
            Arc::new(OpenAiEmbedder::new(key, &api_base, model, timeout, retry)?)
        }
        Provider::Ollama => Arc::new(OllamaEmbedder::new(&api_base, model, timeout, retry)?),
        Provider::Gemini => {
            let key = require_key(api_key, config.api_key_env(), "Gemini")?;
            Arc::new(GeminiEmbedder::new(key, &api_base, model, timeout, retry)?)
        }
    };
    Ok(embedder)
}

pub(crate) fn require_key(
    api_key: Option<String>,
    env_var: Option<&str>,
    provider: &str,
) -> Result<String> {
    api_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
        RagError::AuthenticationFailed(format!(
            "no API key for {}; set {}",
            provider,
            env_var.unwrap_or("the configured api_key_env")
        ))
    })
}

fn reject_blank(texts: &[String]) -> Result<()> {
    if let Some(pos) = texts.iter().position(|t| t.trim().is_empty()) {
        return Err(RagError::InvalidInput(format!(
            "input {} is empty; embedding providers reject blank text",
            pos
        )));
    }
    Ok(())
}

fn check_count(provider: &str, got: usize, expected: usize) -> Result<()> {
    if got != expected {
        return Err(RagError::InvalidInput(format!(
            "{} returned {} embeddings for {} inputs",
            provider, got, expected
        )));
    }
    Ok(())
}

/// OpenAI-compatible `/embeddings` endpoint
pub struct OpenAiEmbedder {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct OpenAiEmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingItem>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingItem {
    embedding: Vec<f32>,
    index: usize,
}

impl OpenAiEmbedder {
    pub fn new(
        api_key: String,
        api_base: &str,
        model: String,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: format!("{}/embeddings", api_base.trim_end_matches('/')),
            api_key,
            model,
            retry,
        })
    }
}

fn openai_vectors(mut response: OpenAiEmbeddingResponse, expected: usize) -> Result<Vec<Vec<f32>>> {
    response.data.sort_by_key(|item| item.index);
    check_count("OpenAI", response.data.len(), expected)?;
    Ok(response.data.into_iter().map(|item| item.embedding).collect())
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        reject_blank(texts)?;

        let response: OpenAiEmbeddingResponse = self
            .retry
            .run("OpenAI embeddings", || {
                let request = self
                    .client
                    .post(&self.endpoint)
                    .bearer_auth(&self.api_key)
                    .json(&OpenAiEmbeddingRequest {
                        model: &self.model,
                        input: texts,
                    });
                send_json("OpenAI", request)
            })
            .await?;
        openai_vectors(response, texts.len())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Local Ollama server, one text per request
pub struct OllamaEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct OllamaEmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    pub fn new(base_url: &str, model: String, timeout: Duration, retry: RetryPolicy) -> Result<Self> {
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: format!("{}/api/embeddings", base_url.trim_end_matches('/')),
            model,
            retry,
        })
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        reject_blank(texts)?;
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            let response: OllamaEmbeddingResponse = self
                .retry
                .run("Ollama embeddings", || {
                    let request = self.client.post(&self.endpoint).json(&OllamaEmbeddingRequest {
                        model: &self.model,
                        prompt: text,
                    });
                    send_json("Ollama", request)
                })
                .await?;
            if response.embedding.is_empty() {
                return Err(RagError::InvalidInput(
                    "Ollama returned an empty embedding".to_string(),
                ));
            }
            vectors.push(response.embedding);
        }
        Ok(vectors)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Google Generative Language `batchEmbedContents`
pub struct GeminiEmbedder {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    retry: RetryPolicy,
}

#[derive(Serialize)]
struct GeminiBatchRequest<'a> {
    requests: Vec<GeminiEmbedRequest<'a>>,
}

#[derive(Serialize)]
struct GeminiEmbedRequest<'a> {
    model: &'a str,
    content: GeminiContent<'a>,
}

#[derive(Serialize)]
pub(crate) struct GeminiContent<'a> {
    pub(crate) parts: Vec<GeminiPart<'a>>,
}

#[derive(Serialize)]
pub(crate) struct GeminiPart<'a> {
    pub(crate) text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GeminiBatchResponse {
    #[serde(default)]
    embeddings: Vec<GeminiEmbedding>,
}

#[derive(Debug, Deserialize)]
struct GeminiEmbedding {
    values: Vec<f32>,
}

/// Gemini addresses models as `models/<name>`
pub(crate) fn gemini_model_path(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

impl GeminiEmbedder {
    pub fn new(
        api_key: String,
        api_base: &str,
        model: String,
        timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self> {
        let model = gemini_model_path(&model);
        Ok(Self {
            client: build_client(timeout)?,
            endpoint: format!(
                "{}/{}:batchEmbedContents",
                api_base.trim_end_matches('/'),
                model
            ),
            api_key,
            model,
            retry,
        })
    }

    fn request_body<'a>(&'a self, texts: &'a [String]) -> GeminiBatchRequest<'a> {
        GeminiBatchRequest {
            requests: texts
                .iter()
                .map(|text| GeminiEmbedRequest {
                    model: &self.model,
                    content: GeminiContent {
                        parts: vec![GeminiPart { text }],
                    },
                })
                .collect(),
        }
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        reject_blank(texts)?;

        let response: GeminiBatchResponse = self
            .retry
            .run("Gemini embeddings", || {
                let request = self
                    .client
                    .post(&self.endpoint)
                    .header("x-goog-api-key", &self.api_key)
                    .json(&self.request_body(texts));
                send_json("Gemini", request)
            })
            .await?;
        check_count("Gemini", response.embeddings.len(), texts.len())?;
        Ok(response.embeddings.into_iter().map(|e| e.values).collect())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_vectors_sorted_by_index() {
        let response: OpenAiEmbeddingResponse = serde_json::from_str(
            r#"{"data": [
                {"embedding": [0.0, 1.0], "index": 1},
                {"embedding": [1.0, 0.0], "index": 0}
            ]}"#,
        )
        .unwrap();
        let vectors = openai_vectors(response, 2).unwrap();
        assert_eq!(vectors, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[test]
    fn test_openai_count_mismatch() {
        let response: OpenAiEmbeddingResponse =
            serde_json::from_str(r#"{"data": [{"embedding": [1.0], "index": 0}]}"#).unwrap();
        assert!(matches!(
            openai_vectors(response, 2),
            Err(RagError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_gemini_request_shape() {
        let embedder = GeminiEmbedder::new(
            "key".to_string(),
            "https://generativelanguage.googleapis.com/v1beta/",
            "embedding-001".to_string(),
            Duration::from_secs(5),
            RetryPolicy::none(),
        )
        .unwrap();
        assert_eq!(
            embedder.endpoint,
            "https://generativelanguage.googleapis.com/v1beta/models/embedding-001:batchEmbedContents"
        );

        let texts = vec!["hello".to_string()];
        let body = serde_json::to_value(embedder.request_body(&texts)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"requests": [
                {"model": "models/embedding-001", "content": {"parts": [{"text": "hello"}]}}
            ]})
        );
    }

    #[tokio::test]
    async fn test_blank_input_rejected_before_request() {
        let embedder = OllamaEmbedder::new(
            "http://127.0.0.1:9",
            "nomic-embed-text".to_string(),
            Duration::from_secs(1),
            RetryPolicy::none(),
        )
        .unwrap();
        let err = embedder
            .embed_batch(&["ok".to_string(), "  ".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::InvalidInput(_)));
    }

    #[test]
    fn test_select_requires_key() {
        let config = EmbeddingConfig {
            backend: Provider::Gemini,
            ..Default::default()
        };
        let err = select_embedder(&config, None).err().unwrap();
        assert!(matches!(err, RagError::AuthenticationFailed(_)));
        assert!(err.to_string().contains("GEMINI_API_KEY"));
    }

    #[test]
    fn test_select_ollama_without_key() {
        let config = EmbeddingConfig {
            backend: Provider::Ollama,
            ..Default::default()
        };
        let embedder = select_embedder(&config, None).unwrap();
        assert_eq!(embedder.model(), "nomic-embed-text");
    }
}
