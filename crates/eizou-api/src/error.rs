use thiserror::Error;

/// Errors from publishing the catalog to the remote store.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("missing sync config: {0}")]
    MissingConfig(&'static str),

    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to read existing file (status {status}): {message}")]
    Read { status: u16, message: String },

    #[error("upload rejected (status {status}): {message}")]
    Write { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),

    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}
