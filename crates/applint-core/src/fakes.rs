//! In-memory fakes for the collaborator traits (testing only)
//!
//! `MemoryPlatform` serves a scripted change set, tree and file contents and
//! records everything written back. `ScriptedChecker` returns canned findings
//! keyed by file content or unit name.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use applint_domain::{ChangeKind, ChangedFile, LintError, RawFinding, Result, TreeEntry};
use async_trait::async_trait;

use crate::checker::{CheckContext, Checker};
use crate::kind::FileKind;
use crate::platform::{CheckRunRequest, Platform};
use crate::trigger::RevisionRange;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

// ---------------------------------------------------------------------------
// MemoryPlatform
// ---------------------------------------------------------------------------

/// A check-run call as the platform saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCheckRun {
    pub id: u64,
    /// `false` for the creating call, `true` for follow-up updates.
    pub update: bool,
    pub request: CheckRunRequest,
}

#[derive(Debug, Default)]
pub struct MemoryPlatform {
    changes: Vec<ChangedFile>,
    files: HashMap<String, String>,
    undecodable: HashSet<String>,
    content_status: HashMap<String, u16>,
    delays: HashMap<String, Duration>,
    tree: Vec<TreeEntry>,
    compare_status: Option<u16>,
    tree_status: Option<u16>,
    comment_status: Option<u16>,

    comments: Mutex<Vec<(u64, String)>>,
    check_runs: Mutex<Vec<RecordedCheckRun>>,
    content_requests: Mutex<Vec<String>>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_change(mut self, path: impl Into<String>, kind: ChangeKind) -> Self {
        self.changes.push(ChangedFile::new(path, kind));
        self
    }

    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.files.insert(path.into(), content.into());
        self
    }

    pub fn with_tree_entry(mut self, entry: TreeEntry) -> Self {
        self.tree.push(entry);
        self
    }

    /// The blob at `path` exists but cannot be decoded to text.
    pub fn with_undecodable(mut self, path: impl Into<String>) -> Self {
        self.undecodable.insert(path.into());
        self
    }

    /// Content requests for `path` fail with the given HTTP status.
    pub fn failing_content(mut self, path: impl Into<String>, status: u16) -> Self {
        self.content_status.insert(path.into(), status);
        self
    }

    /// Delay the content response for `path`.
    pub fn with_delay(mut self, path: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(path.into(), delay);
        self
    }

    pub fn failing_compare(mut self, status: u16) -> Self {
        self.compare_status = Some(status);
        self
    }

    pub fn failing_tree(mut self, status: u16) -> Self {
        self.tree_status = Some(status);
        self
    }

    pub fn failing_comments(mut self, status: u16) -> Self {
        self.comment_status = Some(status);
        self
    }

    pub fn comments(&self) -> Vec<(u64, String)> {
        lock(&self.comments).clone()
    }

    pub fn check_runs(&self) -> Vec<RecordedCheckRun> {
        lock(&self.check_runs).clone()
    }

    pub fn content_requests(&self) -> Vec<String> {
        lock(&self.content_requests).clone()
    }
}

#[async_trait]
impl Platform for MemoryPlatform {
    async fn compare(&self, _range: &RevisionRange) -> Result<Vec<ChangedFile>> {
        if let Some(status) = self.compare_status {
            return Err(LintError::upstream("compare commits", status));
        }
        Ok(self.changes.clone())
    }

    async fn tree(&self, _head: &str) -> Result<Vec<TreeEntry>> {
        if let Some(status) = self.tree_status {
            return Err(LintError::upstream("get tree", status));
        }
        Ok(self.tree.clone())
    }

    async fn content(&self, path: &str, _head: &str) -> Result<Option<String>> {
        lock(&self.content_requests).push(path.to_string());
        if let Some(delay) = self.delays.get(path) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(status) = self.content_status.get(path) {
            return Err(LintError::upstream("get content", *status));
        }
        if self.undecodable.contains(path) {
            return Err(LintError::Decode(format!("unsupported encoding for {path}")));
        }
        Ok(self.files.get(path).cloned())
    }

    async fn create_comment(&self, number: u64, body: &str) -> Result<()> {
        if let Some(status) = self.comment_status {
            return Err(LintError::upstream("create comment", status));
        }
        lock(&self.comments).push((number, body.to_string()));
        Ok(())
    }

    async fn create_check_run(&self, request: &CheckRunRequest) -> Result<u64> {
        let mut runs = lock(&self.check_runs);
        let id = runs.iter().filter(|r| !r.update).count() as u64 + 1;
        runs.push(RecordedCheckRun {
            id,
            update: false,
            request: request.clone(),
        });
        Ok(id)
    }

    async fn update_check_run(&self, id: u64, request: &CheckRunRequest) -> Result<()> {
        let mut runs = lock(&self.check_runs);
        if !runs.iter().any(|r| r.id == id) {
            return Err(LintError::upstream("update check run", 404));
        }
        runs.push(RecordedCheckRun {
            id,
            update: true,
            request: request.clone(),
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// ScriptedChecker
// ---------------------------------------------------------------------------

/// One checker invocation as the fake saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckerCall {
    /// `None` for structural checks.
    pub kind: Option<FileKind>,
    /// Unit argument (empty for unscoped files).
    pub target: String,
    pub is_new_submission: bool,
    pub has_tree: bool,
    pub check_image_architectures: bool,
    /// Number of tree entries handed to a structural check.
    pub entries: usize,
}

#[derive(Debug, Default)]
pub struct ScriptedChecker {
    by_content: HashMap<String, Vec<RawFinding>>,
    by_unit: HashMap<String, Vec<RawFinding>>,
    failing: HashSet<String>,
    calls: Mutex<Vec<CheckerCall>>,
}

impl ScriptedChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Findings returned for a file whose content equals `content`.
    pub fn on_content(mut self, content: impl Into<String>, findings: Vec<RawFinding>) -> Self {
        self.by_content.insert(content.into(), findings);
        self
    }

    /// Findings returned by the structural check for `unit`.
    pub fn on_unit(mut self, unit: impl Into<String>, findings: Vec<RawFinding>) -> Self {
        self.by_unit.insert(unit.into(), findings);
        self
    }

    /// Fail when handed this content or unit name.
    pub fn failing_on(mut self, key: impl Into<String>) -> Self {
        self.failing.insert(key.into());
        self
    }

    pub fn calls(&self) -> Vec<CheckerCall> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl Checker for ScriptedChecker {
    async fn lint(
        &self,
        kind: FileKind,
        content: &str,
        context: &CheckContext,
    ) -> Result<Vec<RawFinding>> {
        lock(&self.calls).push(CheckerCall {
            kind: Some(kind),
            target: context.unit.as_checker_arg().to_string(),
            is_new_submission: context.is_new_submission,
            has_tree: context.tree.is_some(),
            check_image_architectures: context.check_image_architectures,
            entries: 0,
        });
        if self.failing.contains(content) {
            return Err(LintError::checker(kind.filename(), "scripted failure"));
        }
        Ok(self.by_content.get(content).cloned().unwrap_or_default())
    }

    async fn lint_directory(&self, unit: &str, entries: &[TreeEntry]) -> Result<Vec<RawFinding>> {
        lock(&self.calls).push(CheckerCall {
            kind: None,
            target: unit.to_string(),
            is_new_submission: false,
            has_tree: true,
            check_image_architectures: false,
            entries: entries.len(),
        });
        if self.failing.contains(unit) {
            return Err(LintError::checker(unit, "scripted failure"));
        }
        Ok(self.by_unit.get(unit).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::CheckConclusion;

    fn request() -> CheckRunRequest {
        CheckRunRequest {
            name: "app-linter".to_string(),
            head_sha: "head".to_string(),
            conclusion: CheckConclusion::Success,
            title: "t".to_string(),
            summary: "s".to_string(),
            completed_at: chrono::Utc::now(),
            annotations: vec![],
        }
    }

    #[tokio::test]
    async fn test_memory_platform_records_writes() {
        let platform = MemoryPlatform::new();
        platform.create_comment(7, "hello").await.expect("comment");
        let id = platform.create_check_run(&request()).await.expect("create");
        platform.update_check_run(id, &request()).await.expect("update");

        assert_eq!(platform.comments(), vec![(7, "hello".to_string())]);
        let runs = platform.check_runs();
        assert_eq!(runs.len(), 2);
        assert!(!runs[0].update);
        assert!(runs[1].update);
        assert_eq!(runs[1].id, id);
    }

    #[tokio::test]
    async fn test_update_unknown_check_run_fails() {
        let platform = MemoryPlatform::new();
        let err = platform.update_check_run(99, &request()).await.unwrap_err();
        assert!(matches!(err, LintError::Upstream { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_memory_platform_missing_file_is_none() {
        let platform = MemoryPlatform::new().with_file("a/umbrel-app.yml", "x");
        assert_eq!(
            platform.content("a/umbrel-app.yml", "head").await.expect("content"),
            Some("x".to_string())
        );
        assert_eq!(platform.content("b/umbrel-app.yml", "head").await.expect("content"), None);
        assert_eq!(platform.content_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_scripted_checker_unknown_content_is_clean() {
        let checker = ScriptedChecker::new();
        let findings = checker
            .lint(FileKind::StoreIndex, "anything", &CheckContext::standalone())
            .await
            .expect("lint");
        assert!(findings.is_empty());
        assert_eq!(checker.calls().len(), 1);
    }
}
