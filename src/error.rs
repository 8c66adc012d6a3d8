use thiserror::Error;

#[derive(Error, Debug)]
pub enum VerbaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("translation resource error: {0}")]
    Upstream(String),

    #[error("persistence error: {0}")]
    Persistence(String),

    #[error("translation interrupted: {0}")]
    Interrupted(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, VerbaError>;
