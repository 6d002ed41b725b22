//! Error types for the chartjudge evaluation engine
//!
//! One central error enum shared by the evaluation, prompt assembly,
//! generation, and reporting layers.

use thiserror::Error;

/// Main error type for the evaluation engine
#[derive(Error, Debug)]
pub enum EngineError {
    /// Selector found no scoreboard entries at the requested depth
    #[error("No NDCG scores found for NDCG@{depth}")]
    NoScoresAtDepth { depth: usize },

    /// Prompt assembly received an empty document list for the winning method
    #[error("No documents found for method: {method}")]
    NoDocumentsForMethod { method: String },

    /// Generation response carried no answer content
    #[error("Generation response from '{model}' contained no answer")]
    MissingAnswer { model: String },

    /// HTTP client errors
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Query log I/O errors
    #[error("Query log error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors with context
    #[error("Engine error: {0}")]
    Generic(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Convert anyhow errors to EngineError
impl From<anyhow::Error> for EngineError {
    fn from(err: anyhow::Error) -> Self {
        EngineError::Generic(err.to_string())
    }
}
