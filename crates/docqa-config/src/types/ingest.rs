//! Ingest tuning and re-indexing behavior

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestConfig {
    /// Documents embedded and upserted concurrently
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Chunk texts sent per embedding request
    #[serde(default = "default_embed_batch_size")]
    pub embed_batch_size: usize,

    /// What happens to chunks stored by an earlier ingest of the same document
    #[serde(default)]
    pub reingest: ReingestPolicy,
}

/// Handling of previously stored chunks when a document is ingested again
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReingestPolicy {
    /// Keep old chunks; a parameter change adds a second set of chunk ids
    #[default]
    Accumulate,
    /// Swap every stored chunk of the document for the new set
    Replace,
}

impl ReingestPolicy {
    pub const NAMES: &'static [&'static str] = &["accumulate", "replace"];
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            embed_batch_size: default_embed_batch_size(),
            reingest: ReingestPolicy::default(),
        }
    }
}

impl crate::validation::Validate for IngestConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::validation::validate_positive;

        validate_positive("ingest.concurrency", self.concurrency, 0)?;
        validate_positive("ingest.embed_batch_size", self.embed_batch_size, 0)?;
        Ok(())
    }
}

fn default_concurrency() -> usize {
    4
}

fn default_embed_batch_size() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = IngestConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.reingest, ReingestPolicy::Accumulate);
    }

    #[test]
    fn test_zero_concurrency_invalid() {
        let config = IngestConfig {
            concurrency: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_policy_serialization() {
        assert_eq!(
            serde_json::to_string(&ReingestPolicy::Replace).unwrap(),
            "\"replace\""
        );
    }
}
