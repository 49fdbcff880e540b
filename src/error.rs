//! Error types for the research agent client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {

    // =============================
    // Client Taxonomy
    // =============================

    /// Non-2xx HTTP status from the agent backend. Display is part of the
    /// contract: `"<Operation> error: <status>"`.
    #[error("{operation} error: {status}")]
    Transport { operation: String, status: u16 },

    /// 2xx response whose body signals failure or lacks an expected field
    #[error("Application error: {0}")]
    Application(String),

    /// Transcript export failed (layout or document write)
    #[error("Render error: {0}")]
    Render(String),

    /// Caller-side input rejected before any request was issued
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // =============================
    // External Library Conversions
    // =============================

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ClientError {
    pub(crate) fn transport(operation: &str, status: u16) -> Self {
        Self::Transport {
            operation: operation.to_string(),
            status,
        }
    }
}
