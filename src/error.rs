//! Error types for supabase-bootstrap.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Required credentials are missing or the env file is unusable.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("supabase api returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
