//! Hosting platform contract.
//!
//! Discovery reads through [`Platform`]; the comment and check-run sinks
//! write through it. Implementations live outside this crate.

use applint_domain::{ChangedFile, Result, TreeEntry};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trigger::RevisionRange;

/// Final state of a check run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CheckConclusion {
    Success,
    Failure,
}

/// One inline annotation attached to a check run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckRunAnnotation {
    pub path: String,
    pub start_line: u32,
    pub end_line: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,

    /// `failure`, `warning` or `notice`.
    pub annotation_level: String,
    pub message: String,
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckRunRequest {
    pub name: String,
    pub head_sha: String,
    pub conclusion: CheckConclusion,
    pub title: String,
    pub summary: String,
    pub completed_at: DateTime<Utc>,
    pub annotations: Vec<CheckRunAnnotation>,
}

#[async_trait]
pub trait Platform: Send + Sync {
    /// Changed paths between the range's base and head.
    async fn compare(&self, range: &RevisionRange) -> Result<Vec<ChangedFile>>;

    /// Every entry in the repository tree at `head`, recursively.
    async fn tree(&self, head: &str) -> Result<Vec<TreeEntry>>;

    /// Text content of `path` at `head`. `None` when there is no readable file.
    async fn content(&self, path: &str, head: &str) -> Result<Option<String>>;

    /// Post a comment on a pull request.
    async fn create_comment(&self, number: u64, body: &str) -> Result<()>;

    /// Open a check run and return its id.
    async fn create_check_run(&self, request: &CheckRunRequest) -> Result<u64>;

    /// Update an existing check run, appending `request.annotations`.
    async fn update_check_run(&self, id: u64, request: &CheckRunRequest) -> Result<()>;
}
