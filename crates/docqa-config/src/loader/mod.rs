//! Configuration loading from various sources

pub mod env;
pub mod file;
pub mod formats;
pub mod merge;

use crate::{Config, Result, Validate};
use std::path::{Path, PathBuf};

/// Default config file names, searched in order in the working directory
pub const DEFAULT_PATHS: &[&str] = &[
    ".docqa.toml",
    ".docqa.yml",
    ".docqa.yaml",
    ".docqa.json",
];

/// Format for configuration files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Configuration source for layered loading
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    Environment,
    /// Explicit config object (CLI flags, tests)
    Explicit(Config),
}

/// Builder for loading and merging configurations
///
/// Precedence: defaults < file < environment < explicit overrides.
///
/// ```no_run
/// use docqa_config::loader::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .with_file(".docqa.toml")
///     .with_env()
///     .build()?;
/// # Ok::<(), docqa_config::error::ConfigError>(())
/// ```
pub struct ConfigBuilder {
    sources: Vec<ConfigSource>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.sources
            .push(ConfigSource::File(path.as_ref().to_path_buf()));
        self
    }

    pub fn with_env(mut self) -> Self {
        self.sources.push(ConfigSource::Environment);
        self
    }

    pub fn with_config(mut self, config: Config) -> Self {
        self.sources.push(ConfigSource::Explicit(config));
        self
    }

    /// Merge all sources in order and validate the result
    pub fn build(self) -> Result<Config> {
        let mut config = Config::default();

        for source in self.sources {
            match source {
                ConfigSource::File(path) => {
                    let file_config = file::load_from_file(&path)?;
                    tracing::debug!(path = %path.display(), "loaded config file");
                    config = merge::merge(config, file_config);
                }
                ConfigSource::Environment => {
                    let applied = env::apply_env(&mut config)?;
                    tracing::debug!(applied, "applied environment overrides");
                }
                ConfigSource::Explicit(explicit_config) => {
                    config = merge::merge(config, explicit_config);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a single file without the environment overlay
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config> {
        Self::new().with_file(path).build()
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    /// Load configuration from the working directory
    ///
    /// Uses the first of [`DEFAULT_PATHS`] that exists, or defaults when none
    /// does, then applies `DOCQA_*` environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from_dir(Path::new("."))
    }

    /// Same as [`Config::load`] but searches `dir` for the config file
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let mut builder = ConfigBuilder::new();

        if let Some(path) = DEFAULT_PATHS
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
        {
            builder = builder.with_file(path);
        }

        builder.with_env().build()
    }

    /// Load configuration from a specific file, plus environment overrides
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        ConfigBuilder::new().with_file(path).with_env().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn clear_env() {
        let keys: Vec<String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("DOCQA_"))
            .map(|(k, _)| k)
            .collect();
        for key in keys {
            std::env::remove_var(&key);
        }
    }

    #[test]
    fn test_builder_default() {
        let _lock = crate::ENV_LOCK.lock().unwrap();
        clear_env();
        let config = ConfigBuilder::new().build().unwrap();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_empty_dir_uses_defaults() {
        let _lock = crate::ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.retrieval.n_results, 5);
        assert_eq!(config.core.collection, "rag_collection");
    }

    #[test]
    fn test_load_from_dir_finds_toml() {
        let _lock = crate::ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(".docqa.toml"),
            "[chunking]\nchunk_size = 500\nchunk_overlap = 50\n",
        )
        .unwrap();

        let config = Config::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.chunking.chunk_size, 500);
        assert_eq!(config.chunking.chunk_overlap, 50);
        assert_eq!(config.retrieval.max_context_length, 4000);
    }

    #[test]
    fn test_env_overrides_file() {
        let _lock = crate::ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yml");
        fs::write(&path, "retrieval:\n  n_results: 8\n").unwrap();

        std::env::set_var("DOCQA_RETRIEVAL_N_RESULTS", "12");
        let config = Config::from_file(&path).unwrap();
        clear_env();

        assert_eq!(config.retrieval.n_results, 12);
    }

    #[test]
    fn test_env_default_value_overrides_file() {
        let _lock = crate::ENV_LOCK.lock().unwrap();
        clear_env();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".docqa.toml");
        fs::write(&path, "[chunking]\nchunk_size = 500\nchunk_overlap = 50\n").unwrap();

        std::env::set_var("DOCQA_CHUNKING_CHUNK_SIZE", "1000");
        let config = Config::from_file(&path).unwrap();
        clear_env();

        assert_eq!(config.chunking.chunk_size, 1000);
        assert_eq!(config.chunking.chunk_overlap, 50);
    }

    #[test]
    fn test_env_leaves_unset_fields_alone() {
        let _lock = crate::ENV_LOCK.lock().unwrap();
        clear_env();
        let mut config = Config::default();
        config.retrieval.n_results = 9;

        std::env::set_var("DOCQA_LLM_MAX_TOKENS", "800");
        let applied = env::apply_env(&mut config).unwrap();
        clear_env();

        assert_eq!(applied, 1);
        assert_eq!(config.retrieval.n_results, 9);
        assert_eq!(config.llm.max_tokens, 800);
    }

    #[test]
    fn test_explicit_overrides_everything() {
        let _lock = crate::ENV_LOCK.lock().unwrap();
        clear_env();
        let mut explicit = Config::default();
        explicit.chunking.chunk_size = 300;
        explicit.chunking.chunk_overlap = 30;

        let config = ConfigBuilder::new().with_config(explicit).build().unwrap();
        assert_eq!(config.chunking.chunk_size, 300);
    }

    #[test]
    fn test_invalid_merged_config_rejected() {
        let _lock = crate::ENV_LOCK.lock().unwrap();
        clear_env();
        let mut explicit = Config::default();
        explicit.chunking.chunk_size = 100;
        explicit.chunking.chunk_overlap = 150;

        assert!(ConfigBuilder::new().with_config(explicit).build().is_err());
    }
}
