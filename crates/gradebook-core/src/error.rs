//! Shared error type across gradebook crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Malformed or missing fields, out-of-range grade, unknown assignment type.
    InvalidInput,
    /// Unknown submission id or route.
    NotFound,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::InvalidInput => "INVALID_INPUT",
            ClientCode::NotFound => "NOT_FOUND",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, GradebookError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum GradebookError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl GradebookError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            GradebookError::InvalidInput(_) => ClientCode::InvalidInput,
            GradebookError::NotFound(_) => ClientCode::NotFound,
            GradebookError::Internal(_) => ClientCode::Internal,
        }
    }
}
