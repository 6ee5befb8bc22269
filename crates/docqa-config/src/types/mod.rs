//! Configuration type definitions
//!
//! One module per concern. Each type carries its own defaults and validation.

pub mod chunking;
pub mod core;
pub mod documents;
pub mod embedding;
pub mod ingest;
pub mod llm;
pub mod provider;
pub mod retrieval;

pub use chunking::ChunkingConfig;
pub use self::core::CoreConfig;
pub use documents::DocumentsConfig;
pub use embedding::EmbeddingConfig;
pub use ingest::{IngestConfig, ReingestPolicy};
pub use llm::LlmConfig;
pub use provider::Provider;
pub use retrieval::RetrievalConfig;

use serde::{Deserialize, Serialize};

/// Top-level configuration, organized by functional area
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Paths and collection naming
    #[serde(default)]
    pub core: CoreConfig,

    /// Which files count as documents
    #[serde(default)]
    pub documents: DocumentsConfig,

    /// Fixed-window chunking
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Top-k and context budget at question time
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Ingest concurrency and re-indexing behavior
    #[serde(default)]
    pub ingest: IngestConfig,

    /// Embedding provider settings
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Answer generation settings
    #[serde(default)]
    pub llm: LlmConfig,
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.core.validate()?;
        self.documents.validate()?;
        self.chunking.validate()?;
        self.retrieval.validate()?;
        self.ingest.validate()?;
        self.embedding.validate()?;
        self.llm.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_roundtrip_through_toml() {
        let config = Config::default();
        let text = ::toml::to_string(&config).unwrap();
        let parsed: Config = ::toml::from_str(&text).unwrap();
        assert_eq!(parsed.chunking.chunk_size, config.chunking.chunk_size);
        assert_eq!(parsed.core.collection, config.core.collection);
    }
}
