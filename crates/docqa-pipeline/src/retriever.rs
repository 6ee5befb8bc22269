//! Ingest and retrieval over an injected embedder and vector index

use crate::context::assemble;
use docqa_config::{Config, ReingestPolicy};
use docqa_core::chunking::split_document;
use docqa_core::models::content_hash;
use docqa_core::traits::{Embedder, VectorIndex};
use docqa_core::{
    ChunkMetadata, ChunkParams, Context, Document, EmbeddingRecord, QueryMatch, RagError, Result,
};
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Every option the retriever recognizes
#[derive(Debug, Clone, PartialEq)]
pub struct RetrieverOptions {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub n_results: usize,
    pub max_context_length: usize,
    pub concurrency: usize,
    pub embed_batch_size: usize,
    pub reingest: ReingestPolicy,
}

impl Default for RetrieverOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl RetrieverOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            chunk_size: config.chunking.chunk_size,
            chunk_overlap: config.chunking.chunk_overlap,
            n_results: config.retrieval.n_results,
            max_context_length: config.retrieval.max_context_length,
            concurrency: config.ingest.concurrency,
            embed_batch_size: config.ingest.embed_batch_size,
            reingest: config.ingest.reingest,
        }
    }

    pub fn chunk_params(&self) -> Result<ChunkParams> {
        ChunkParams::new(self.chunk_size, self.chunk_overlap)
    }

    pub fn validate(&self) -> Result<()> {
        self.chunk_params()?;
        positive("n_results", self.n_results)?;
        positive("max_context_length", self.max_context_length)?;
        positive("concurrency", self.concurrency)?;
        positive("embed_batch_size", self.embed_batch_size)?;
        Ok(())
    }
}

fn positive(name: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(RagError::invalid_parameter(name, "must be greater than 0"));
    }
    Ok(())
}

#[derive(Debug)]
pub struct IngestFailure {
    pub document_id: String,
    pub error: RagError,
}

#[derive(Debug, Default)]
pub struct IngestReport {
    pub documents_indexed: usize,
    pub chunks_upserted: usize,
    /// Already stored with the same content hash, not re-embedded
    pub chunks_unchanged: usize,
    pub chunks_skipped_empty: usize,
    /// Stale records dropped under `reingest = replace`
    pub records_removed: usize,
    pub skipped_cancelled: usize,
    pub failures: Vec<IngestFailure>,
}

#[derive(Debug, Default)]
struct DocumentStats {
    upserted: usize,
    unchanged: usize,
    skipped_empty: usize,
    removed: usize,
}

enum Outcome {
    Indexed(DocumentStats),
    Failed(IngestFailure),
    Cancelled,
}

pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    options: RetrieverOptions,
}

impl Retriever {
    pub fn new(
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        options: RetrieverOptions,
    ) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            embedder,
            index,
            options,
        })
    }

    pub fn options(&self) -> &RetrieverOptions {
        &self.options
    }

    pub fn index(&self) -> &Arc<dyn VectorIndex> {
        &self.index
    }

    /// Ingest with the configured chunk parameters
    pub async fn ingest_documents(
        &self,
        documents: &[Document],
        cancel: &CancellationToken,
    ) -> Result<IngestReport> {
        let params = self.options.chunk_params()?;
        self.ingest(documents, params, cancel).await
    }

    pub async fn ingest(
        &self,
        documents: &[Document],
        params: ChunkParams,
        cancel: &CancellationToken,
    ) -> Result<IngestReport> {
        self.ingest_with_progress(documents, params, cancel, &|_: &str| {})
            .await
    }

    /// Like [`Retriever::ingest`], calling `progress` with each document id as it finishes
    pub async fn ingest_with_progress(
        &self,
        documents: &[Document],
        params: ChunkParams,
        cancel: &CancellationToken,
        progress: &(dyn Fn(&str) + Send + Sync),
    ) -> Result<IngestReport> {
        info!(
            "ingesting {} documents (chunk_size={}, overlap={}, reingest={:?})",
            documents.len(),
            params.chunk_size(),
            params.overlap(),
            self.options.reingest
        );

        let mut outcomes = stream::iter(documents.iter().map(|document| async move {
            if cancel.is_cancelled() {
                return (document, Outcome::Cancelled);
            }
            let outcome = match self.index_document(document, params).await {
                Ok(stats) => Outcome::Indexed(stats),
                Err(error) => Outcome::Failed(IngestFailure {
                    document_id: document.id.clone(),
                    error,
                }),
            };
            (document, outcome)
        }))
        .buffer_unordered(self.options.concurrency);

        let mut report = IngestReport::default();
        while let Some((document, outcome)) = outcomes.next().await {
            match outcome {
                Outcome::Indexed(stats) => {
                    report.documents_indexed += 1;
                    report.chunks_upserted += stats.upserted;
                    report.chunks_unchanged += stats.unchanged;
                    report.chunks_skipped_empty += stats.skipped_empty;
                    report.records_removed += stats.removed;
                }
                Outcome::Failed(failure) if failure.error.is_fatal() => {
                    error!("aborting ingest at {}: {}", failure.document_id, failure.error);
                    return Err(failure.error);
                }
                Outcome::Failed(failure) => {
                    error!("failed to index {}: {}", failure.document_id, failure.error);
                    report.failures.push(failure);
                }
                Outcome::Cancelled => report.skipped_cancelled += 1,
            }
            progress(&document.id);
        }

        if report.skipped_cancelled > 0 {
            warn!(
                "ingest cancelled; {} documents not started",
                report.skipped_cancelled
            );
        }
        info!(
            "ingest finished: {} documents, {} chunks upserted, {} unchanged, {} failed",
            report.documents_indexed,
            report.chunks_upserted,
            report.chunks_unchanged,
            report.failures.len()
        );
        Ok(report)
    }

    async fn index_document(&self, document: &Document, params: ChunkParams) -> Result<DocumentStats> {
        let chunks = split_document(document, params);
        let total_chunks = chunks.len();
        let mut stats = DocumentStats::default();

        // `current`: stored as-is. `ready`: vector known, needs writing.
        // `pending`: needs a vector.
        let mut current = Vec::new();
        let mut ready = Vec::new();
        let mut pending = Vec::new();
        for chunk in chunks {
            if chunk.text.trim().is_empty() {
                stats.skipped_empty += 1;
                continue;
            }
            let id = chunk.id(params);
            let metadata = ChunkMetadata {
                source: document.id.clone(),
                chunk_index: chunk.index,
                total_chunks,
                start: chunk.start,
                end: chunk.end,
                chunk_size: params.chunk_size(),
                overlap: params.overlap(),
                content_hash: content_hash(&chunk.text),
            };
            match self.index.get(&id).await? {
                Some(stored) if stored.metadata.content_hash == metadata.content_hash => {
                    stats.unchanged += 1;
                    if stored.metadata == metadata {
                        current.push(stored);
                    } else {
                        ready.push(EmbeddingRecord { metadata, ..stored });
                    }
                }
                _ => pending.push(EmbeddingRecord {
                    id,
                    vector: Vec::new(),
                    text: chunk.text,
                    metadata,
                }),
            }
        }

        for batch in pending.chunks_mut(self.options.embed_batch_size) {
            let texts: Vec<String> = batch.iter().map(|r| r.text.clone()).collect();
            let vectors = self.embedder.embed_batch(&texts).await?;
            if vectors.len() != batch.len() {
                return Err(RagError::InvalidInput(format!(
                    "embedder returned {} vectors for {} chunks",
                    vectors.len(),
                    batch.len()
                )));
            }
            for (record, vector) in batch.iter_mut().zip(vectors) {
                record.vector = vector;
            }
        }
        ready.extend(pending);
        stats.upserted = ready.len();

        match self.options.reingest {
            ReingestPolicy::Accumulate => {
                self.index.upsert(ready).await?;
            }
            ReingestPolicy::Replace => {
                current.extend(ready);
                stats.removed = self.index.replace_document(&document.id, current).await?;
            }
        }

        debug!(
            "indexed {}: {} upserted, {} unchanged, {} empty",
            document.id, stats.upserted, stats.unchanged, stats.skipped_empty
        );
        Ok(stats)
    }

    /// Ranked matches for `question`, without assembling a context
    pub async fn search(&self, question: &str, n_results: usize) -> Result<Vec<QueryMatch>> {
        if question.trim().is_empty() {
            return Err(RagError::EmptyQuery);
        }
        positive("n_results", n_results)?;

        let vector = self.embedder.embed(question).await?;
        let matches = self.index.query(&vector, n_results).await?;
        debug!("{} matches for question", matches.len());
        Ok(matches)
    }

    pub async fn retrieve(
        &self,
        question: &str,
        n_results: usize,
        max_context_length: usize,
    ) -> Result<Context> {
        positive("max_context_length", max_context_length)?;
        let matches = self.search(question, n_results).await?;
        let context = assemble(&matches, max_context_length);
        info!(
            "retrieved {} chunks ({} chars, {} omitted)",
            context.sources.len(),
            context.char_len(),
            context.omitted
        );
        Ok(context)
    }

    pub async fn retrieve_default(&self, question: &str) -> Result<Context> {
        self.retrieve(
            question,
            self.options.n_results,
            self.options.max_context_length,
        )
        .await
    }
}
