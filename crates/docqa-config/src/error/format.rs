//! Error formatting with colors and context

use crate::error::ConfigError;
use std::fmt;
use yansi::Paint;

/// Format error with colors and context
pub struct ErrorFormatter {
    error: ConfigError,
    use_colors: bool,
}

impl ErrorFormatter {
    pub fn new(error: ConfigError) -> Self {
        Self {
            error,
            use_colors: supports_color(),
        }
    }

    pub fn format(&self) -> String {
        if self.use_colors {
            self.format_colored()
        } else {
            self.format_plain()
        }
    }

    fn format_colored(&self) -> String {
        let cross = "✗".red().bold();
        match &self.error {
            ConfigError::InvalidEnum {
                field,
                value,
                options,
                hint,
            } => {
                let value_str = format!("'{}'", value);
                format!(
                    "{} Invalid value {} for {}\n  {}: {}\n  {}: {}",
                    cross,
                    value_str.yellow(),
                    field.cyan(),
                    "Valid options".bold(),
                    options,
                    "Hint".bold(),
                    hint.green()
                )
            }
            ConfigError::OutOfRange {
                field,
                value,
                min,
                max,
            } => format!(
                "{} {} must be between {} and {}, got {}",
                cross,
                field.cyan(),
                min.green(),
                max.green(),
                value.red()
            ),
            ConfigError::InvalidInteger { field, value, min } => format!(
                "{} {} must be > {}, got {}",
                cross,
                field.cyan(),
                min.green(),
                value.red()
            ),
            ConfigError::ValidationError { field, message } => {
                format!("{} {}: {}", cross, field.cyan(), message)
            }
            ConfigError::FileNotFound { path } => {
                let path_str = path.display().to_string();
                format!(
                    "{} Configuration file not found: {}",
                    cross,
                    path_str.yellow()
                )
            }
            _ => self.format_plain(),
        }
    }

    fn format_plain(&self) -> String {
        self.error.to_string()
    }
}

fn supports_color() -> bool {
    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }
    atty::is(atty::Stream::Stderr)
}

impl fmt::Display for ErrorFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format())
    }
}
