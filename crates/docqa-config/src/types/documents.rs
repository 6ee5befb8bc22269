//! Document discovery settings

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentsConfig {
    /// File extension (without the dot) that marks a document
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Descend into subdirectories; ids become relative paths
    #[serde(default)]
    pub recursive: bool,
}

impl Default for DocumentsConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            recursive: false,
        }
    }
}

impl crate::validation::Validate for DocumentsConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        crate::validation::validate_non_empty("documents.extension", &self.extension)?;
        if self.extension.starts_with('.') {
            return Err(ConfigError::validation(
                "documents.extension",
                format!("write the extension without a leading dot, e.g. '{}'", self.extension.trim_start_matches('.')),
            ));
        }
        Ok(())
    }
}

fn default_extension() -> String {
    "txt".to_string()
}
