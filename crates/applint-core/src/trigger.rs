//! Trigger source: where the revision range and pull request come from.

use std::path::Path;

use applint_domain::{LintError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const RANGE_HELP: &str =
    "This action can only be run on pull requests or with the 'base' and 'head-sha' set";

/// Two revisions bounding the change set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevisionRange {
    pub base: String,
    pub head: String,
}

impl RevisionRange {
    pub fn new(base: impl Into<String>, head: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            head: head.into(),
        }
    }

    /// `base...head` form used by compare endpoints.
    pub fn basehead(&self) -> String {
        format!("{}...{}", self.base, self.head)
    }
}

/// The change request that triggered the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PullRequestContext {
    pub number: u64,
    pub base_sha: String,
    pub head_sha: String,
    pub html_url: Option<String>,
}

impl PullRequestContext {
    /// Read `pull_request` out of a webhook/event payload.
    pub fn from_payload(payload: &Value) -> Option<Self> {
        let pr = payload.get("pull_request")?;
        let number = pr.get("number")?.as_u64()?;
        let base_sha = pr.pointer("/base/sha")?.as_str()?.to_string();
        let head_sha = pr.pointer("/head/sha")?.as_str()?.to_string();
        let html_url = pr
            .get("html_url")
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self {
            number,
            base_sha,
            head_sha,
            html_url,
        })
    }
}

/// Explicit revision inputs plus the optional enclosing pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trigger {
    pub base: Option<String>,
    pub head: Option<String>,
    pub pull_request: Option<PullRequestContext>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Trigger {
    pub fn new(base: Option<String>, head: Option<String>) -> Self {
        Self {
            base: present(base),
            head: present(head),
            pull_request: None,
        }
    }

    pub fn with_pull_request(mut self, pull_request: PullRequestContext) -> Self {
        self.pull_request = Some(pull_request);
        self
    }

    pub fn from_event_payload(payload: &Value, base: Option<String>, head: Option<String>) -> Self {
        Self {
            base: present(base),
            head: present(head),
            pull_request: PullRequestContext::from_payload(payload),
        }
    }

    /// Load the event payload written by the CI runner.
    pub fn from_event_file(path: &Path, base: Option<String>, head: Option<String>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let payload: Value = serde_json::from_str(&raw)?;
        Ok(Self::from_event_payload(&payload, base, head))
    }

    /// Explicit inputs win; gaps are filled from the pull request.
    pub fn resolve_range(&self) -> Result<RevisionRange> {
        let pr = self.pull_request.as_ref();
        let base = self
            .base
            .clone()
            .or_else(|| pr.map(|p| p.base_sha.clone()))
            .filter(|s| !s.is_empty());
        let head = self
            .head
            .clone()
            .or_else(|| pr.map(|p| p.head_sha.clone()))
            .filter(|s| !s.is_empty());

        match (base, head) {
            (Some(base), Some(head)) => Ok(RevisionRange { base, head }),
            _ => Err(LintError::RangeResolution(RANGE_HELP.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pr_payload() -> Value {
        json!({
            "pull_request": {
                "number": 42,
                "html_url": "https://github.com/org/store/pull/42",
                "base": { "sha": "base111" },
                "head": { "sha": "head222" }
            }
        })
    }

    #[test]
    fn test_range_from_pull_request() {
        let trigger = Trigger::from_event_payload(&pr_payload(), None, None);
        let range = trigger.resolve_range().expect("range");
        assert_eq!(range, RevisionRange::new("base111", "head222"));
        assert_eq!(trigger.pull_request.as_ref().map(|p| p.number), Some(42));
    }

    #[test]
    fn test_explicit_inputs_override_pull_request() {
        let trigger =
            Trigger::from_event_payload(&pr_payload(), Some("explicit".to_string()), None);
        let range = trigger.resolve_range().expect("range");
        assert_eq!(range.base, "explicit");
        assert_eq!(range.head, "head222");
    }

    #[test]
    fn test_missing_range_is_error() {
        let trigger = Trigger::new(Some("base".to_string()), None);
        let err = trigger.resolve_range().unwrap_err();
        assert!(matches!(err, LintError::RangeResolution(_)));
        assert!(err.to_string().contains("head-sha"));
    }

    #[test]
    fn test_empty_inputs_count_as_absent() {
        let trigger = Trigger::new(Some(String::new()), Some("  ".to_string()));
        assert!(trigger.base.is_none());
        assert!(trigger.head.is_none());
        assert!(trigger.resolve_range().is_err());
    }

    #[test]
    fn test_push_payload_has_no_pull_request() {
        let payload = json!({ "ref": "refs/heads/main" });
        assert!(PullRequestContext::from_payload(&payload).is_none());
    }

    #[test]
    fn test_event_file_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("event.json");
        std::fs::write(&path, pr_payload().to_string()).expect("write event");
        let trigger = Trigger::from_event_file(&path, None, None).expect("load");
        assert_eq!(
            trigger.pull_request.and_then(|p| p.html_url),
            Some("https://github.com/org/store/pull/42".to_string())
        );
    }

    #[test]
    fn test_basehead_format() {
        assert_eq!(RevisionRange::new("a", "b").basehead(), "a...b");
    }
}
