use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration: {0}")]
    Source(#[from] config::ConfigError),

    #[error("section [{0}] not found")]
    MissingSection(String),

    #[error("section [{section}] is missing key '{key}'")]
    MissingKey { section: String, key: String },

    #[error("section [{section}] key '{key}' has invalid value '{value}'")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },
}
