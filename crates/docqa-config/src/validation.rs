//! Validation trait and helpers for configuration types

use crate::error::{ConfigError, Result};

/// Trait for validating configuration values
///
/// Implement this trait for any config type that needs validation beyond
/// type-level checks. Validation should return a `ConfigError` that names the
/// offending field.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Validate that a float lies within `min..=max`
pub fn validate_range(field: impl Into<String>, value: f64, min: f64, max: f64) -> Result<()> {
    if !(min..=max).contains(&value) {
        return Err(ConfigError::OutOfRange {
            field: field.into(),
            value,
            min,
            max,
        });
    }
    Ok(())
}

/// Validate that an integer is strictly above `min`
pub fn validate_positive(field: impl Into<String>, value: usize, min: usize) -> Result<()> {
    if value <= min {
        return Err(ConfigError::InvalidInteger {
            field: field.into(),
            value,
            min,
        });
    }
    Ok(())
}

/// Validate an optional endpoint override
pub fn validate_api_base(field: impl Into<String>, api_base: Option<&str>) -> Result<()> {
    let Some(api_base) = api_base else {
        return Ok(());
    };
    let field = field.into();

    if api_base.is_empty() {
        return Err(ConfigError::validation(
            field,
            "API base URL cannot be empty string (omit it to use the default)",
        ));
    }

    if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
        return Err(ConfigError::validation(
            field,
            format!(
                "API base must start with http:// or https://, got: {}",
                api_base
            ),
        ));
    }

    Ok(())
}

/// Validate that a string setting is not blank
pub fn validate_non_empty(field: impl Into<String>, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ConfigError::validation(field, "cannot be empty"));
    }
    Ok(())
}
