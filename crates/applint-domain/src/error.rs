//! Error types for lint runs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LintError {
    /// Neither explicit inputs nor a pull request supplied the revision range.
    #[error("Revision range unresolved: {0}")]
    RangeResolution(String),

    /// The platform answered with a non-success status.
    #[error("Failed to {operation}: {status}")]
    Upstream { operation: String, status: u16 },

    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// A checker failed internally instead of returning findings.
    #[error("Checker failed on {target}: {detail}")]
    Checker { target: String, detail: String },

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LintError {
    /// Build an upstream error for a failed platform `operation`.
    pub fn upstream(operation: impl Into<String>, status: u16) -> Self {
        LintError::Upstream {
            operation: operation.into(),
            status,
        }
    }

    /// Build a checker error for `target` (a file path or unit directory).
    pub fn checker(target: impl Into<String>, detail: impl std::fmt::Display) -> Self {
        LintError::Checker {
            target: target.into(),
            detail: detail.to_string(),
        }
    }
}

/// Result type for lint operations
pub type Result<T> = std::result::Result<T, LintError>;
