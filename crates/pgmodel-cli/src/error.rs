use thiserror::Error;

/// Errors surfaced by the `pgmodel` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("{0}")]
    Core(#[from] pgmodel_core::Error),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("config file error: {0}")]
    Config(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("logging error: {0}")]
    Logging(String),
}

pub type CliResult<T> = std::result::Result<T, CliError>;
