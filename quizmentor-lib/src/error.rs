//! Error types for QuizMentor

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for QuizMentor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in QuizMentor operations
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to load or run the embedding model
    #[error("embedding error: {0}")]
    Embedding(String),

    /// Persisted index artifacts are missing
    #[error("index not built: {} not found (run `quizmentor build-index` first)", .0.display())]
    IndexNotBuilt(PathBuf),

    /// Persisted index and chunk sequence disagree
    #[error("index mismatch: {0}")]
    IndexMismatch(String),

    /// Failed to build or query the vector index
    #[error("index error: {0}")]
    Index(String),

    /// Failed to read text out of a PDF
    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),

    /// The generation service returned an unusable response
    #[error("generation error: {0}")]
    Generation(String),

    /// An external service answered with a non-success status
    #[error("upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// HTTP transport to an external service failed
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// User store failure
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid input provided
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Missing or malformed configuration
    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
