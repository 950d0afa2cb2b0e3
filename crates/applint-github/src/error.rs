//! Error types for the GitHub platform client

use applint_domain::LintError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitHubError {
    /// Missing or malformed client configuration.
    #[error("GitHub client misconfigured: {0}")]
    Config(String),

    /// The API answered with a non-success status.
    #[error("Failed to {operation}: {status}")]
    Status { operation: String, status: u16 },

    /// The request never produced a response.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A response body could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for GitHubError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            GitHubError::Decode(err.to_string())
        } else {
            GitHubError::Http(err.to_string())
        }
    }
}

impl From<GitHubError> for LintError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Config(msg) => LintError::Config(msg),
            GitHubError::Status { operation, status } => LintError::Upstream { operation, status },
            GitHubError::Http(msg) => LintError::Transport(msg),
            GitHubError::Decode(msg) => LintError::Decode(msg),
            GitHubError::Json(e) => LintError::Serialization(e),
        }
    }
}

pub type Result<T> = std::result::Result<T, GitHubError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_maps_to_upstream() {
        let err: LintError = GitHubError::Status {
            operation: "get tree".to_string(),
            status: 422,
        }
        .into();
        assert_eq!(err.to_string(), "Failed to get tree: 422");
        assert!(matches!(err, LintError::Upstream { status: 422, .. }));
    }

    #[test]
    fn test_http_maps_to_transport() {
        let err: LintError = GitHubError::Http("connection refused".to_string()).into();
        assert!(matches!(err, LintError::Transport(_)));
    }

    #[test]
    fn test_json_maps_to_serialization() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: LintError = GitHubError::from(json_err).into();
        assert!(matches!(err, LintError::Serialization(_)));
    }
}
