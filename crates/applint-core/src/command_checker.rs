//! Checker adapter that delegates to an external validator process.
//!
//! Protocol: one JSON [`CheckRequest`] on stdin, a JSON array of findings on
//! stdout. Any non-zero exit, timeout or malformed output is a checker failure.

use std::process::Stdio;
use std::time::Duration;

use applint_domain::{LintError, RawFinding, Result, TreeEntry};
use async_trait::async_trait;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

use crate::checker::{CheckContext, Checker};
use crate::kind::FileKind;

/// Request written to the validator's stdin.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckRequest<'a> {
    File {
        file_kind: FileKind,
        content: &'a str,
        unit: &'a str,
        is_new_submission: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        pull_request_url: Option<&'a str>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tree: Option<&'a [TreeEntry]>,
        check_image_architectures: bool,
    },
    Directory {
        unit: &'a str,
        entries: &'a [TreeEntry],
    },
}

impl<'a> CheckRequest<'a> {
    pub fn file(kind: FileKind, content: &'a str, context: &'a CheckContext) -> Self {
        CheckRequest::File {
            file_kind: kind,
            content,
            unit: context.unit.as_checker_arg(),
            is_new_submission: context.is_new_submission,
            pull_request_url: context.pull_request_url.as_deref(),
            tree: context.tree.as_ref().map(|t| t.as_slice()),
            check_image_architectures: context.check_image_architectures,
        }
    }
}

/// Runs a validator executable once per check.
#[derive(Debug, Clone)]
pub struct CommandChecker {
    program: String,
    args: Vec<String>,
    timeout_secs: u64,
}

impl CommandChecker {
    pub fn new(program: impl Into<String>, args: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            program: program.into(),
            args,
            timeout_secs,
        }
    }

    async fn invoke(&self, target: &str, request: &CheckRequest<'_>) -> Result<Vec<RawFinding>> {
        let payload = serde_json::to_vec(request)?;

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| LintError::checker(target, format!("failed to spawn {}: {}", self.program, e)))?;

        // Feed stdin concurrently so a chatty validator cannot deadlock on a full pipe.
        let stdin = child.stdin.take();
        let writer = tokio::spawn(async move {
            if let Some(mut stdin) = stdin {
                stdin.write_all(&payload).await?;
                stdin.shutdown().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        let output = if self.timeout_secs > 0 {
            tokio::time::timeout(Duration::from_secs(self.timeout_secs), child.wait_with_output())
                .await
                .map_err(|_| {
                    LintError::checker(
                        target,
                        format!("timed out after {} seconds", self.timeout_secs),
                    )
                })??
        } else {
            child.wait_with_output().await?
        };

        match writer.await {
            Ok(Ok(())) => {}
            // The validator may exit without draining stdin; its exit status decides.
            Ok(Err(e)) => debug!(target = %target, error = %e, "checker closed stdin early"),
            Err(e) => return Err(LintError::checker(target, format!("stdin writer failed: {e}"))),
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LintError::checker(
                target,
                format!(
                    "exited with code {}: {}",
                    output.status.code().unwrap_or(-1),
                    stderr.trim()
                ),
            ));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        if stdout.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(stdout.trim())
            .map_err(|e| LintError::checker(target, format!("malformed checker output: {e}")))
    }
}

#[async_trait]
impl Checker for CommandChecker {
    async fn lint(
        &self,
        kind: FileKind,
        content: &str,
        context: &CheckContext,
    ) -> Result<Vec<RawFinding>> {
        let request = CheckRequest::file(kind, content, context);
        self.invoke(kind.filename(), &request).await
    }

    async fn lint_directory(&self, unit: &str, entries: &[TreeEntry]) -> Result<Vec<RawFinding>> {
        let request = CheckRequest::Directory { unit, entries };
        self.invoke(unit, &request).await
    }
}
