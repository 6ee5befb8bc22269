//! Fixed-window chunking configuration

use serde::{Deserialize, Serialize};

/// Configuration for splitting documents into overlapping windows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window length in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Characters shared by consecutive windows
    ///
    /// Must be smaller than `chunk_size`. Recommended: 10-20% of it.
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            chunk_overlap: default_chunk_overlap(),
        }
    }
}

impl crate::validation::Validate for ChunkingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        validate_positive("chunking.chunk_size", self.chunk_size, 0)?;

        if self.chunk_overlap >= self.chunk_size {
            return Err(ConfigError::ValidationError {
                field: "chunking.chunk_overlap".to_string(),
                message: format!(
                    "chunk_overlap ({}) must be < chunk_size ({})",
                    self.chunk_overlap, self.chunk_size
                ),
            });
        }

        Ok(())
    }
}

fn default_chunk_size() -> usize {
    1000
}

fn default_chunk_overlap() -> usize {
    200
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = ChunkingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.chunk_size, 1000);
        assert_eq!(config.chunk_overlap, 200);
    }

    #[test]
    fn test_overlap_too_large() {
        let config = ChunkingConfig {
            chunk_size: 100,
            chunk_overlap: 100,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_chunk_size() {
        let config = ChunkingConfig {
            chunk_size: 0,
            chunk_overlap: 0,
        };
        assert!(config.validate().is_err());
    }
}
