//! Question-time retrieval configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of chunks fetched from the index per question
    #[serde(default = "default_n_results")]
    pub n_results: usize,

    /// Character budget for the assembled context
    #[serde(default = "default_max_context_length")]
    pub max_context_length: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            n_results: default_n_results(),
            max_context_length: default_max_context_length(),
        }
    }
}

impl crate::validation::Validate for RetrievalConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        validate_positive("retrieval.n_results", self.n_results, 0)?;

        if self.n_results > 1000 {
            return Err(ConfigError::ValidationError {
                field: "retrieval.n_results".to_string(),
                message: format!("n_results too large ({}), consider using <= 1000", self.n_results),
            });
        }

        validate_positive("retrieval.max_context_length", self.max_context_length, 0)?;
        Ok(())
    }
}

fn default_n_results() -> usize {
    5
}

fn default_max_context_length() -> usize {
    4000
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = RetrievalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.n_results, 5);
        assert_eq!(config.max_context_length, 4000);
    }

    #[test]
    fn test_zero_n_results_invalid() {
        let config = RetrievalConfig {
            n_results: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_large_n_results_invalid() {
        let config = RetrievalConfig {
            n_results: 2000,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_budget_invalid() {
        let config = RetrievalConfig {
            max_context_length: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
