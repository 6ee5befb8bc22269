#![allow(dead_code)]

use async_trait::async_trait;
use docqa_core::traits::{Embedder, Generator, LlmClient};
use docqa_core::{Context, Document, RagError, Result};
use docqa_pipeline::{CancellationToken, Retriever, RetrieverOptions};
use docqa_store::SledVectorIndex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

const KEYWORDS: &[&str] = &["paris", "france", "berlin", "germany", "capital", "rust"];

/// Keyword-count vectors plus a small bias so no vector is zero
#[derive(Default)]
pub struct StubEmbedder {
    pub texts_embedded: AtomicUsize,
}

impl StubEmbedder {
    pub fn vector(text: &str) -> Vec<f32> {
        let lower = text.to_lowercase();
        let mut vector: Vec<f32> = KEYWORDS
            .iter()
            .map(|k| lower.matches(k).count() as f32)
            .collect();
        vector.push(0.01);
        vector
    }

    pub fn embedded(&self) -> usize {
        self.texts_embedded.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for StubEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.iter().any(|t| t.contains("poison")) {
            return Err(RagError::InvalidInput("provider rejected input".to_string()));
        }
        self.texts_embedded.fetch_add(texts.len(), Ordering::SeqCst);
        Ok(texts.iter().map(|t| Self::vector(t)).collect())
    }

    fn model(&self) -> &str {
        "stub"
    }
}

/// Cancels `token` during its first batch, as a Ctrl-C mid-ingest would
pub struct CancelAfterFirstBatch {
    pub inner: StubEmbedder,
    pub token: CancellationToken,
}

#[async_trait]
impl Embedder for CancelAfterFirstBatch {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.token.cancel();
        self.inner.embed_batch(texts).await
    }

    fn model(&self) -> &str {
        "cancelling"
    }
}

pub struct RevokedKeyEmbedder;

#[async_trait]
impl Embedder for RevokedKeyEmbedder {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Err(RagError::AuthenticationFailed("key revoked".to_string()))
    }

    fn model(&self) -> &str {
        "revoked"
    }
}

/// Echoes what it was given so tests can see the context
#[derive(Default)]
pub struct RecordingGenerator {
    pub seen: Mutex<Vec<(String, Context)>>,
}

#[async_trait]
impl Generator for RecordingGenerator {
    async fn generate(&self, question: &str, context: &Context) -> Result<String> {
        self.seen
            .lock()
            .unwrap()
            .push((question.to_string(), context.clone()));
        Ok(format!("answer from {} sources", context.sources.len()))
    }
}

#[derive(Default)]
pub struct RecordingLlm {
    pub prompts: Mutex<Vec<String>>,
}

#[async_trait]
impl LlmClient for RecordingLlm {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok("  generated text, kept verbatim  ".to_string())
    }

    fn model(&self) -> &str {
        "recording"
    }
}

pub struct Fixture {
    pub dir: TempDir,
    pub embedder: Arc<StubEmbedder>,
    pub index: Arc<SledVectorIndex>,
    pub retriever: Arc<Retriever>,
}

pub fn fixture(options: RetrieverOptions) -> Fixture {
    let dir = TempDir::new().unwrap();
    let embedder = Arc::new(StubEmbedder::default());
    let index = Arc::new(SledVectorIndex::open(&dir.path().join("index"), "rag_collection").unwrap());
    let retriever = Arc::new(Retriever::new(embedder.clone(), index.clone(), options).unwrap());
    Fixture {
        dir,
        embedder,
        index,
        retriever,
    }
}

pub fn small_options() -> RetrieverOptions {
    RetrieverOptions {
        chunk_size: 40,
        chunk_overlap: 5,
        n_results: 5,
        max_context_length: 4000,
        concurrency: 2,
        embed_batch_size: 2,
        ..Default::default()
    }
}

pub fn capitals() -> Vec<Document> {
    vec![
        Document::new("berlin.txt", "Berlin is the capital of Germany"),
        Document::new("paris.txt", "Paris is the capital of France"),
    ]
}
