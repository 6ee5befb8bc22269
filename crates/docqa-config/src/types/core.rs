//! Core configuration (paths and collection naming)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where documents are read from and where the index lives
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Directory scanned for documents
    #[serde(default = "default_documents_dir")]
    pub documents_dir: PathBuf,

    /// Directory holding the persisted vector index
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Collection (keyspace) inside the index
    #[serde(default = "default_collection")]
    pub collection: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            documents_dir: default_documents_dir(),
            index_dir: default_index_dir(),
            collection: default_collection(),
        }
    }
}

impl crate::validation::Validate for CoreConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_non_empty;

        if self.index_dir.as_os_str().is_empty() {
            return Err(ConfigError::validation(
                "core.index_dir",
                "Index directory cannot be empty",
            ));
        }
        validate_non_empty("core.collection", &self.collection)?;
        Ok(())
    }
}

fn default_documents_dir() -> PathBuf {
    PathBuf::from("news_articles")
}

fn default_index_dir() -> PathBuf {
    PathBuf::from("chromadb_database")
}

fn default_collection() -> String {
    "rag_collection".to_string()
}
