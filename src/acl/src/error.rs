//! Error types for the access-control engine

use thiserror::Error;

/// Access-control engine errors
///
/// Evaluation itself never fails; these cover loading, editing and
/// configuring rule sets.
#[derive(Debug, Error)]
pub enum AclError {
    /// Invalid input to an editing operation
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Rule document has the wrong shape
    #[error("Invalid rule document: {0}")]
    InvalidDocument(String),

    /// Rule document failed to parse or has wrongly typed fields
    #[error("Rule document error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for access-control operations
pub type Result<T> = std::result::Result<T, AclError>;
