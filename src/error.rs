use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubmuteError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed SRT timestamp: {0}")]
    MalformedTimestamp(String),

    #[error("Failed to read subtitle file {path}: {source}")]
    SubtitleRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Vocabulary error: {0}")]
    Vocabulary(String),

    #[error("Media processing error: {0}")]
    Media(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Media processing cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, SubmuteError>;
