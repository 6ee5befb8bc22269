//! YAML format parser

use crate::{error::ConfigError, Config, Result};

pub fn parse(content: &str) -> Result<Config> {
    parse_with_path(content, None)
}

/// Parse with the file path attached to error messages
pub fn parse_with_path(content: &str, path: Option<&str>) -> Result<Config> {
    serde_yaml::from_str(content).map_err(|e| ConfigError::from_yaml_error(e, content, path))
}
