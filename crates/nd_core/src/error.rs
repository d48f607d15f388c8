use thiserror::Error;

use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Article source error: {0}")]
    Source(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid rate {rate} for {content_type}: rates must be finite and non-negative")]
    InvalidRate { content_type: String, rate: f64 },

    #[error("Invalid content type: {0}")]
    InvalidType(String),

    #[error("Unknown filter field `{0}`")]
    InvalidFilter(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("External error: {0}")]
    External(#[from] anyhow::Error),
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::Export(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
