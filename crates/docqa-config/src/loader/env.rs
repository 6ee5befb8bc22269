//! Environment variable configuration overlay
//!
//! Variables take the form `DOCQA_<SECTION>_<FIELD>=value`, for example:
//! - `DOCQA_CHUNKING_CHUNK_SIZE=500`
//! - `DOCQA_EMBEDDING_BACKEND=ollama`
//! - `DOCQA_INGEST_REINGEST=replace`

use crate::{error::ConfigError, types::*, Config, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

pub const PREFIX: &str = "DOCQA_";

/// Build a config from `DOCQA_*` variables, or `None` if none are set
///
/// Unparseable variables are logged and skipped.
pub fn from_env() -> Result<Option<Config>> {
    let mut config = Config::default();
    if apply_env(&mut config)? == 0 {
        return Ok(None);
    }
    Ok(Some(config))
}

/// Apply every set `DOCQA_*` variable onto `config`, returning how many were set
///
/// Only variables present in the environment touch `config`, so a variable
/// holding a default value still overrides a file value.
pub fn apply_env(config: &mut Config) -> Result<usize> {
    let env_vars: Vec<(String, String)> = env::vars()
        .filter(|(k, _)| k.starts_with(PREFIX))
        .collect();

    for (key, value) in &env_vars {
        if let Err(e) = apply_env_var(config, key, value) {
            tracing::warn!("ignoring {}: {}", key, e);
        }
    }

    Ok(env_vars.len())
}

fn apply_env_var(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let key = key.strip_prefix(PREFIX).unwrap_or(key);

    let Some((section, field)) = key.split_once('_') else {
        return Err(ConfigError::EnvVarError {
            var: format!("{PREFIX}{key}"),
            message: "Expected format: DOCQA_<section>_<field>".to_string(),
        });
    };

    let section = section.to_lowercase();
    let field = field.to_lowercase();
    let var = format!("{PREFIX}{}", key.to_uppercase());

    match section.as_str() {
        "core" => apply_core_var(&mut config.core, &var, &field, value),
        "documents" => apply_documents_var(&mut config.documents, &var, &field, value),
        "chunking" => apply_chunking_var(&mut config.chunking, &var, &field, value),
        "retrieval" => apply_retrieval_var(&mut config.retrieval, &var, &field, value),
        "ingest" => apply_ingest_var(&mut config.ingest, &var, &field, value),
        "embedding" => apply_embedding_var(&mut config.embedding, &var, &field, value),
        "llm" => apply_llm_var(&mut config.llm, &var, &field, value),
        _ => Err(ConfigError::EnvVarError {
            var,
            message: format!("Unknown section: {}", section),
        }),
    }
}

fn unknown_field(var: &str, field: &str) -> ConfigError {
    ConfigError::EnvVarError {
        var: var.to_string(),
        message: format!("Unknown field: {}", field),
    }
}

fn parse_num<T: FromStr>(var: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| ConfigError::EnvVarError {
        var: var.to_string(),
        message: format!("Invalid number: {}", value),
    })
}

fn parse_provider(field: &str, value: &str) -> Result<Provider> {
    Provider::parse(value).ok_or_else(|| ConfigError::invalid_enum(field, value, Provider::NAMES))
}

fn apply_core_var(config: &mut CoreConfig, var: &str, field: &str, value: &str) -> Result<()> {
    match field {
        "documents_dir" => config.documents_dir = PathBuf::from(value),
        "index_dir" => config.index_dir = PathBuf::from(value),
        "collection" => config.collection = value.to_string(),
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_documents_var(
    config: &mut DocumentsConfig,
    var: &str,
    field: &str,
    value: &str,
) -> Result<()> {
    match field {
        "extension" => config.extension = value.to_string(),
        "recursive" => config.recursive = parse_bool(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_chunking_var(
    config: &mut ChunkingConfig,
    var: &str,
    field: &str,
    value: &str,
) -> Result<()> {
    match field {
        "chunk_size" => config.chunk_size = parse_num(var, value)?,
        "chunk_overlap" => config.chunk_overlap = parse_num(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_retrieval_var(
    config: &mut RetrievalConfig,
    var: &str,
    field: &str,
    value: &str,
) -> Result<()> {
    match field {
        "n_results" => config.n_results = parse_num(var, value)?,
        "max_context_length" => config.max_context_length = parse_num(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_ingest_var(config: &mut IngestConfig, var: &str, field: &str, value: &str) -> Result<()> {
    match field {
        "concurrency" => config.concurrency = parse_num(var, value)?,
        "embed_batch_size" => config.embed_batch_size = parse_num(var, value)?,
        "reingest" => {
            config.reingest = match value.to_lowercase().as_str() {
                "accumulate" => ReingestPolicy::Accumulate,
                "replace" => ReingestPolicy::Replace,
                _ => {
                    return Err(ConfigError::invalid_enum(
                        "ingest.reingest",
                        value,
                        ReingestPolicy::NAMES,
                    ))
                }
            };
        }
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_embedding_var(
    config: &mut EmbeddingConfig,
    var: &str,
    field: &str,
    value: &str,
) -> Result<()> {
    match field {
        "backend" => config.backend = parse_provider("embedding.backend", value)?,
        "model_name" | "model" => config.model_name = Some(value.to_string()),
        "api_base" => config.api_base = Some(value.to_string()),
        "api_key_env" => config.api_key_env = Some(value.to_string()),
        "timeout_secs" => config.timeout_secs = parse_num(var, value)?,
        "max_retries" => config.max_retries = parse_num(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_llm_var(config: &mut LlmConfig, var: &str, field: &str, value: &str) -> Result<()> {
    match field {
        "backend" => config.backend = parse_provider("llm.backend", value)?,
        "model" => config.model = Some(value.to_string()),
        "max_tokens" => config.max_tokens = parse_num(var, value)?,
        "temperature" => config.temperature = parse_num(var, value)?,
        "api_base" => config.api_base = Some(value.to_string()),
        "api_key_env" => config.api_key_env = Some(value.to_string()),
        "timeout_secs" => config.timeout_secs = parse_num(var, value)?,
        "max_retries" => config.max_retries = parse_num(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn parse_bool(var: &str, value: &str) -> Result<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::EnvVarError {
            var: var.to_string(),
            message: format!(
                "Invalid boolean: {} (use true/false, 1/0, yes/no, on/off)",
                value
            ),
        }),
    }
}
