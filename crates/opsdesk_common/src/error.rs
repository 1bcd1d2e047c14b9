//! Error types for Opsdesk.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Invalid ticket: {0}")]
    InvalidTicket(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Retrieval unavailable: {0}")]
    RetrievalUnavailable(String),

    #[error("Embedding failed: {0}")]
    Embedding(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TriageError {
    /// True when a decision can still be produced by degrading to empty
    /// evidence instead of failing the request.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TriageError::RetrievalUnavailable(_) | TriageError::Embedding(_)
        )
    }
}
