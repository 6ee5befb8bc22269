//! Configuration merging
//!
//! Fields of `overlay` that differ from their defaults replace the values in
//! `base`. Optional fields replace `base` whenever they are set.

use crate::{types::*, Config};

pub fn merge(mut base: Config, overlay: Config) -> Config {
    base.core = merge_core(base.core, overlay.core);
    base.documents = merge_documents(base.documents, overlay.documents);
    base.chunking = merge_chunking(base.chunking, overlay.chunking);
    base.retrieval = merge_retrieval(base.retrieval, overlay.retrieval);
    base.ingest = merge_ingest(base.ingest, overlay.ingest);
    base.embedding = merge_embedding(base.embedding, overlay.embedding);
    base.llm = merge_llm(base.llm, overlay.llm);
    base
}

fn pick<T: PartialEq>(base: T, overlay: T, default: T) -> T {
    if overlay != default {
        overlay
    } else {
        base
    }
}

fn merge_core(base: CoreConfig, overlay: CoreConfig) -> CoreConfig {
    let default = CoreConfig::default();
    CoreConfig {
        documents_dir: pick(base.documents_dir, overlay.documents_dir, default.documents_dir),
        index_dir: pick(base.index_dir, overlay.index_dir, default.index_dir),
        collection: pick(base.collection, overlay.collection, default.collection),
    }
}

fn merge_documents(base: DocumentsConfig, overlay: DocumentsConfig) -> DocumentsConfig {
    let default = DocumentsConfig::default();
    DocumentsConfig {
        extension: pick(base.extension, overlay.extension, default.extension),
        recursive: pick(base.recursive, overlay.recursive, default.recursive),
    }
}

fn merge_chunking(base: ChunkingConfig, overlay: ChunkingConfig) -> ChunkingConfig {
    let default = ChunkingConfig::default();
    ChunkingConfig {
        chunk_size: pick(base.chunk_size, overlay.chunk_size, default.chunk_size),
        chunk_overlap: pick(base.chunk_overlap, overlay.chunk_overlap, default.chunk_overlap),
    }
}

fn merge_retrieval(base: RetrievalConfig, overlay: RetrievalConfig) -> RetrievalConfig {
    let default = RetrievalConfig::default();
    RetrievalConfig {
        n_results: pick(base.n_results, overlay.n_results, default.n_results),
        max_context_length: pick(
            base.max_context_length,
            overlay.max_context_length,
            default.max_context_length,
        ),
    }
}

fn merge_ingest(base: IngestConfig, overlay: IngestConfig) -> IngestConfig {
    let default = IngestConfig::default();
    IngestConfig {
        concurrency: pick(base.concurrency, overlay.concurrency, default.concurrency),
        embed_batch_size: pick(
            base.embed_batch_size,
            overlay.embed_batch_size,
            default.embed_batch_size,
        ),
        reingest: pick(base.reingest, overlay.reingest, default.reingest),
    }
}

fn merge_embedding(base: EmbeddingConfig, overlay: EmbeddingConfig) -> EmbeddingConfig {
    let default = EmbeddingConfig::default();
    EmbeddingConfig {
        backend: pick(base.backend, overlay.backend, default.backend),
        model_name: overlay.model_name.or(base.model_name),
        api_base: overlay.api_base.or(base.api_base),
        api_key_env: overlay.api_key_env.or(base.api_key_env),
        timeout_secs: pick(base.timeout_secs, overlay.timeout_secs, default.timeout_secs),
        max_retries: pick(base.max_retries, overlay.max_retries, default.max_retries),
    }
}

fn merge_llm(base: LlmConfig, overlay: LlmConfig) -> LlmConfig {
    let default = LlmConfig::default();
    LlmConfig {
        backend: pick(base.backend, overlay.backend, default.backend),
        model: overlay.model.or(base.model),
        max_tokens: pick(base.max_tokens, overlay.max_tokens, default.max_tokens),
        temperature: if (overlay.temperature - default.temperature).abs() > f32::EPSILON {
            overlay.temperature
        } else {
            base.temperature
        },
        api_base: overlay.api_base.or(base.api_base),
        api_key_env: overlay.api_key_env.or(base.api_key_env),
        timeout_secs: pick(base.timeout_secs, overlay.timeout_secs, default.timeout_secs),
        max_retries: pick(base.max_retries, overlay.max_retries, default.max_retries),
    }
}
