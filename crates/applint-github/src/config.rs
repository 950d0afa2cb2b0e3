//! GitHub client configuration.

use serde::{Deserialize, Serialize};

use crate::error::{GitHubError, Result};

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GitHubConfig {
    /// REST API root, without trailing slash.
    pub api_url: String,

    /// Bearer token (optional for public repositories).
    #[serde(skip_serializing)]
    pub token: Option<String>,

    pub owner: String,
    pub repo: String,
}

/// Split `owner/repo`.
pub fn parse_repository(repository: &str) -> Result<(String, String)> {
    match repository.trim().split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(GitHubError::Config(format!(
            "repository must look like 'owner/repo', got '{repository}'"
        ))),
    }
}

impl GitHubConfig {
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: None,
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Build from an `owner/repo` string.
    pub fn for_repository(repository: &str) -> Result<Self> {
        let (owner, repo) = parse_repository(repository)?;
        Ok(Self::new(owner, repo))
    }

    /// Read `GITHUB_REPOSITORY`, `GITHUB_TOKEN` and `GITHUB_API_URL`.
    pub fn from_env() -> Result<Self> {
        let repository = std::env::var("GITHUB_REPOSITORY")
            .map_err(|_| GitHubError::Config("GITHUB_REPOSITORY is not set".to_string()))?;
        let mut config = Self::for_repository(&repository)?;
        if let Ok(url) = std::env::var("GITHUB_API_URL") {
            config = config.with_api_url(&url);
        }
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            config = config.with_token(&token);
        }
        Ok(config)
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        let trimmed = api_url.trim().trim_end_matches('/');
        if !trimmed.is_empty() {
            self.api_url = trimmed.to_string();
        }
        self
    }

    /// Set authentication token; blank tokens are ignored.
    pub fn with_token(mut self, token: &str) -> Self {
        let token = token.trim();
        self.token = (!token.is_empty()).then(|| token.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_repository() {
        assert_eq!(
            parse_repository("getumbrel/umbrel-apps").expect("parse"),
            ("getumbrel".to_string(), "umbrel-apps".to_string())
        );
        assert!(parse_repository("no-slash").is_err());
        assert!(parse_repository("/repo").is_err());
        assert!(parse_repository("a/b/c").is_err());
    }

    #[test]
    fn test_builder_defaults() {
        let config = GitHubConfig::new("acme", "store");
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_api_url_trailing_slash_trimmed() {
        let config = GitHubConfig::new("acme", "store").with_api_url("https://ghe.example.com/api/v3/");
        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
        let config = config.with_api_url("  ");
        assert_eq!(config.api_url, "https://ghe.example.com/api/v3");
    }

    #[test]
    fn test_blank_token_ignored() {
        let config = GitHubConfig::new("acme", "store").with_token("  ");
        assert!(config.token.is_none());
        let config = config.with_token("ghp_x");
        assert_eq!(config.token.as_deref(), Some("ghp_x"));
    }

    #[test]
    fn test_token_not_serialized() {
        let config = GitHubConfig::new("acme", "store").with_token("secret");
        let raw = serde_json::to_string(&config).expect("serialize");
        assert!(!raw.contains("secret"));
    }
}
