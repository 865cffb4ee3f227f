use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load dashboard settings from file or environment: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid dashboard setting `{field}`: {reason}")]
    ValidationError { field: String, reason: String },
}
