use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrbitError>;

#[derive(Error, Debug)]
pub enum OrbitError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Relay error: {0}")]
    Relay(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for OrbitError {
    fn from(err: reqwest::Error) -> Self {
        OrbitError::Http(err.to_string())
    }
}
