//! Configuration management for docqa
//!
//! This crate provides a validated configuration system with support for:
//! - Multiple formats (YAML, TOML, JSON)
//! - Config validation with helpful error messages
//! - Config merging (file + environment + explicit overrides)
//! - Type-safe configuration structs
//!
//! # Example
//!
//! ```no_run
//! use docqa_config::Config;
//!
//! // Load from default location (.docqa.{toml,yml,json})
//! let config = Config::load()?;
//!
//! // Or load from specific file
//! let config = Config::from_file("path/to/config.toml")?;
//!
//! let chunk_size = config.chunking.chunk_size;
//! let top_k = config.retrieval.n_results;
//! # Ok::<(), docqa_config::ConfigError>(())
//! ```

pub mod error;
pub mod loader;
pub mod types;
pub mod validation;

pub use error::{ConfigError, ErrorFormatter, Result};
pub use loader::ConfigBuilder;
pub use types::*;

/// Trait for config validation
pub use validation::Validate;

/// Serializes tests that touch `DOCQA_*` environment variables.
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
