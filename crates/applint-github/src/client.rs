//! GitHub REST implementation of the `Platform` collaborator.

use applint_core::platform::{CheckRunRequest, Platform};
use applint_core::trigger::RevisionRange;
use applint_domain::{ChangedFile, Result, TreeEntry};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::Value;
use tracing::debug;

use crate::config::GitHubConfig;
use crate::error::GitHubError;
use crate::wire::{self, CheckRunCreated, CommentBody, CompareResponse, TreeResponse};

const API_VERSION: &str = "2022-11-28";

/// GitHub API client for one repository.
pub struct GitHubClient {
    config: GitHubConfig,
    base: Url,
    http_client: reqwest::Client,
}

impl GitHubClient {
    pub fn new(config: GitHubConfig) -> std::result::Result<Self, GitHubError> {
        let base = Url::parse(&config.api_url)
            .map_err(|e| GitHubError::Config(format!("invalid API URL '{}': {e}", config.api_url)))?;
        if base.cannot_be_a_base() {
            return Err(GitHubError::Config(format!("invalid API URL '{}'", config.api_url)));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("applint/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(GitHubClient {
            config,
            base,
            http_client,
        })
    }

    /// Create client from environment variables
    pub fn from_env() -> std::result::Result<Self, GitHubError> {
        Self::new(GitHubConfig::from_env()?)
    }

    pub fn config(&self) -> &GitHubConfig {
        &self.config
    }

    /// `{api}/repos/{owner}/{repo}/{segments...}`, each segment percent-encoded.
    pub fn repo_url<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["repos", self.config.owner.as_str(), self.config.repo.as_str()])
                .extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http_client.request(method, url);
        match &self.config.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder, operation: &str) -> std::result::Result<Response, GitHubError> {
        let response = builder.send().await?;
        let status = response.status();
        debug!(operation = operation, status = status.as_u16(), "GitHub response");
        if !status.is_success() {
            return Err(GitHubError::Status {
                operation: operation.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl Platform for GitHubClient {
    async fn compare(&self, range: &RevisionRange) -> Result<Vec<ChangedFile>> {
        let basehead = range.basehead();
        let url = self.repo_url(["compare", basehead.as_str()]);
        let response = self
            .send(self.request(Method::GET, url), "compare commits")
            .await?;
        let body: CompareResponse = response.json().await.map_err(GitHubError::from)?;
        Ok(wire::changed_files(body))
    }

    async fn tree(&self, head: &str) -> Result<Vec<TreeEntry>> {
        let mut url = self.repo_url(["git", "trees", head]);
        url.query_pairs_mut().append_pair("recursive", "1");
        let response = self.send(self.request(Method::GET, url), "get tree").await?;
        let body: TreeResponse = response.json().await.map_err(GitHubError::from)?;
        Ok(wire::tree_entries(body)?)
    }

    async fn content(&self, path: &str, head: &str) -> Result<Option<String>> {
        let mut url = self.repo_url(["contents"].into_iter().chain(path.split('/')));
        url.query_pairs_mut().append_pair("ref", head);

        let response = self
            .request(Method::GET, url)
            .send()
            .await
            .map_err(GitHubError::from)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(GitHubError::Status {
                operation: format!("get content of {path}"),
                status: response.status().as_u16(),
            }
            .into());
        }
        let payload: Value = response.json().await.map_err(GitHubError::from)?;
        Ok(wire::decode_content(payload)?)
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<()> {
        let number = number.to_string();
        let url = self.repo_url(["issues", number.as_str(), "comments"]);
        self.send(
            self.request(Method::POST, url).json(&CommentBody { body }),
            "create comment",
        )
        .await?;
        Ok(())
    }

    async fn create_check_run(&self, request: &CheckRunRequest) -> Result<u64> {
        let url = self.repo_url(["check-runs"]);
        let response = self
            .send(
                self.request(Method::POST, url)
                    .json(&wire::check_run_body(request, true)),
                "create check run",
            )
            .await?;
        let created: CheckRunCreated = response.json().await.map_err(GitHubError::from)?;
        Ok(created.id)
    }

    async fn update_check_run(&self, id: u64, request: &CheckRunRequest) -> Result<()> {
        let id = id.to_string();
        let url = self.repo_url(["check-runs", id.as_str()]);
        self.send(
            self.request(Method::PATCH, url)
                .json(&wire::check_run_body(request, false)),
            "update check run",
        )
        .await?;
        Ok(())
    }
}
