//! Report sinks: where a rendered report goes once the run is decided.
//!
//! `WorkflowSink` serves the plain workflow step (annotations on stdout, job
//! summary and step outputs in runner files). `CheckRunSink` serves the bot
//! deployment and reports through the checks API.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use applint_domain::{Result, RunOutcome};
use async_trait::async_trait;
use chrono::Utc;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::outcome::conclusion;
use crate::platform::{CheckRunAnnotation, CheckRunRequest, Platform};
use crate::render::RenderedReport;
use crate::trigger::RevisionRange;

/// Annotations per check-run request accepted by the API.
pub const ANNOTATION_BATCH: usize = 50;

/// Longest check-run summary accepted by the API, in bytes.
pub const MAX_SUMMARY_BYTES: usize = 65_535;

#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    async fn publish(
        &self,
        range: &RevisionRange,
        rendered: &RenderedReport,
        outcome: &RunOutcome,
    ) -> Result<()>;
}

// ---------------------------------------------------------------------------
// WorkflowSink
// ---------------------------------------------------------------------------

pub struct WorkflowSink {
    writer: Mutex<Box<dyn Write + Send>>,
    summary_file: Option<PathBuf>,
    output_file: Option<PathBuf>,
}

impl WorkflowSink {
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
            summary_file: None,
            output_file: None,
        }
    }

    /// Workflow commands on stdout, no runner files.
    pub fn stdout() -> Self {
        Self::new(Box::new(std::io::stdout()))
    }

    /// Stdout plus the runner files named by `GITHUB_STEP_SUMMARY` and `GITHUB_OUTPUT`.
    pub fn from_env() -> Self {
        let mut sink = Self::stdout();
        if let Some(path) = env_path("GITHUB_STEP_SUMMARY") {
            sink = sink.with_summary_file(path);
        }
        if let Some(path) = env_path("GITHUB_OUTPUT") {
            sink = sink.with_output_file(path);
        }
        sink
    }

    pub fn with_summary_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.summary_file = Some(path.into());
        self
    }

    pub fn with_output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    fn write_commands(&self, rendered: &RenderedReport) -> Result<()> {
        // A panic mid-write leaves at worst a partial line; keep writing.
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        for annotation in &rendered.annotations {
            writeln!(writer, "{}", annotation.to_workflow_command())?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
}

/// `name<<delimiter` block; safe for multi-line values.
fn output_entry(name: &str, value: &str, delimiter: &str) -> String {
    format!("{name}<<{delimiter}\n{value}\n{delimiter}\n")
}

/// Step outputs: the three counts, the export and the digest.
pub fn render_outputs(rendered: &RenderedReport, outcome: &RunOutcome) -> String {
    let delimiter = format!("applint_{}", &rendered.digest[..rendered.digest.len().min(16)]);
    let mut out = String::new();
    out.push_str(&output_entry("errors", &outcome.error_count.to_string(), &delimiter));
    out.push_str(&output_entry("warnings", &outcome.warning_count.to_string(), &delimiter));
    out.push_str(&output_entry("infos", &outcome.info_count.to_string(), &delimiter));
    out.push_str(&output_entry("results", &rendered.export, &delimiter));
    out.push_str(&output_entry("digest", &rendered.digest, &delimiter));
    out
}

async fn append(path: &Path, content: &str) -> Result<()> {
    let mut file = tokio::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .await?;
    file.write_all(content.as_bytes()).await?;
    file.flush().await?;
    Ok(())
}

#[async_trait]
impl ReportSink for WorkflowSink {
    fn name(&self) -> &str {
        "workflow"
    }

    async fn publish(
        &self,
        _range: &RevisionRange,
        rendered: &RenderedReport,
        outcome: &RunOutcome,
    ) -> Result<()> {
        self.write_commands(rendered)?;

        if let Some(path) = &self.summary_file {
            append(path, &rendered.summary).await?;
            debug!(path = %path.display(), "job summary written");
        }
        if let Some(path) = &self.output_file {
            append(path, &render_outputs(rendered, outcome)).await?;
            debug!(path = %path.display(), "step outputs written");
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// CheckRunSink
// ---------------------------------------------------------------------------

pub struct CheckRunSink {
    platform: Arc<dyn Platform>,
    name: String,
}

impl CheckRunSink {
    pub fn new(platform: Arc<dyn Platform>, name: impl Into<String>) -> Self {
        Self {
            platform,
            name: name.into(),
        }
    }
}

fn truncate_summary(summary: &str) -> String {
    if summary.len() <= MAX_SUMMARY_BYTES {
        return summary.to_string();
    }
    let mut end = MAX_SUMMARY_BYTES;
    while !summary.is_char_boundary(end) {
        end -= 1;
    }
    summary[..end].to_string()
}

#[async_trait]
impl ReportSink for CheckRunSink {
    fn name(&self) -> &str {
        "check-run"
    }

    async fn publish(
        &self,
        range: &RevisionRange,
        rendered: &RenderedReport,
        outcome: &RunOutcome,
    ) -> Result<()> {
        let annotations: Vec<CheckRunAnnotation> = rendered
            .annotations
            .iter()
            .map(|a| a.to_check_run_annotation())
            .collect();
        let mut batches = annotations.chunks(ANNOTATION_BATCH);

        let mut request = CheckRunRequest {
            name: self.name.clone(),
            head_sha: range.head.clone(),
            conclusion: conclusion(outcome),
            title: rendered.title.clone(),
            summary: truncate_summary(&rendered.summary),
            completed_at: Utc::now(),
            annotations: batches.next().map(<[_]>::to_vec).unwrap_or_default(),
        };
        let id = self.platform.create_check_run(&request).await?;
        debug!(check_run = id, annotations = annotations.len(), "check run created");

        for batch in batches {
            request.annotations = batch.to_vec();
            self.platform.update_check_run(id, &request).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::MemoryPlatform;
    use crate::outcome::decide;
    use crate::platform::CheckConclusion;
    use crate::render::render;
    use applint_domain::{Finding, LintReport, RawFinding, Severity, Span};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    fn report(located: usize, unlocated: usize) -> LintReport {
        let mut findings = Vec::new();
        for i in 0..located {
            findings.push(Finding::from_raw(
                RawFinding::new(format!("r{i}"), Severity::Error, "t", "m")
                    .at_lines(Span::single(i as u32 + 1)),
                "bitcoin/umbrel-app.yml",
            ));
        }
        for i in 0..unlocated {
            findings.push(Finding::from_raw(
                RawFinding::new(format!("u{i}"), Severity::Warning, "t", "m"),
                "bitcoin",
            ));
        }
        LintReport::new(findings)
    }

    #[tokio::test]
    async fn test_workflow_sink_writes_commands_summary_and_outputs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let summary_path = dir.path().join("summary.md");
        let output_path = dir.path().join("output");
        let buf = SharedBuf::default();

        let sink = WorkflowSink::new(Box::new(buf.clone()))
            .with_summary_file(&summary_path)
            .with_output_file(&output_path);

        let report = report(2, 1);
        let outcome = decide(&report);
        let rendered = render(&report, &outcome).expect("render");
        sink.publish(&RevisionRange::new("a", "b"), &rendered, &outcome)
            .await
            .expect("publish");

        let commands = buf.contents();
        assert_eq!(commands.lines().count(), 2);
        assert!(commands.starts_with("::error file=bitcoin/umbrel-app.yml,line=1"));

        let summary = std::fs::read_to_string(&summary_path).expect("summary");
        assert_eq!(summary, rendered.summary);

        let outputs = std::fs::read_to_string(&output_path).expect("outputs");
        assert!(outputs.contains("errors<<applint_"));
        assert!(outputs.contains("\n2\n"));
        assert!(outputs.contains(&rendered.digest));
        assert!(outputs.contains("\"id\": \"u0\""));
    }

    #[tokio::test]
    async fn test_workflow_sink_survives_poisoned_writer() {
        let buf = SharedBuf::default();
        let sink = Arc::new(WorkflowSink::new(Box::new(buf.clone())));
        let poisoner = Arc::clone(&sink);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.writer.lock();
            panic!("writer panicked");
        })
        .join();
        assert!(sink.writer.is_poisoned());

        let report = report(1, 0);
        let outcome = decide(&report);
        let rendered = render(&report, &outcome).expect("render");
        sink.publish(&RevisionRange::new("a", "b"), &rendered, &outcome)
            .await
            .expect("publish");
        assert_eq!(buf.contents().lines().count(), 1);
    }

    #[tokio::test]
    async fn test_workflow_sink_appends() {
        let dir = tempfile::tempdir().expect("tempdir");
        let summary_path = dir.path().join("summary.md");
        std::fs::write(&summary_path, "previous step\n").expect("seed");

        let sink = WorkflowSink::new(Box::new(SharedBuf::default())).with_summary_file(&summary_path);
        let report = LintReport::default();
        let outcome = decide(&report);
        let rendered = render(&report, &outcome).expect("render");
        sink.publish(&RevisionRange::new("a", "b"), &rendered, &outcome)
            .await
            .expect("publish");

        let summary = std::fs::read_to_string(&summary_path).expect("summary");
        assert!(summary.starts_with("previous step\n# 🎉"));
    }

    #[test]
    fn test_output_entry_heredoc() {
        assert_eq!(output_entry("results", "[\n]", "EOF"), "results<<EOF\n[\n]\nEOF\n");
    }

    #[tokio::test]
    async fn test_check_run_sink_batches_annotations() {
        let platform = Arc::new(MemoryPlatform::new());
        let sink = CheckRunSink::new(platform.clone(), "app-linter");

        let report = report(120, 3);
        let outcome = decide(&report);
        let rendered = render(&report, &outcome).expect("render");
        sink.publish(&RevisionRange::new("base", "head"), &rendered, &outcome)
            .await
            .expect("publish");

        let runs = platform.check_runs();
        assert_eq!(runs.len(), 3);
        assert!(!runs[0].update);
        assert_eq!(runs[0].request.annotations.len(), 50);
        assert_eq!(runs[1].request.annotations.len(), 50);
        assert_eq!(runs[2].request.annotations.len(), 20);
        assert!(runs.iter().all(|r| r.id == runs[0].id));
        assert_eq!(runs[0].request.head_sha, "head");
        assert_eq!(runs[0].request.conclusion, CheckConclusion::Failure);
        assert_eq!(runs[0].request.title, outcome.title);
    }

    #[tokio::test]
    async fn test_check_run_sink_without_annotations() {
        let platform = Arc::new(MemoryPlatform::new());
        let sink = CheckRunSink::new(platform.clone(), "app-linter");
        let report = report(0, 2);
        let outcome = decide(&report);
        let rendered = render(&report, &outcome).expect("render");
        sink.publish(&RevisionRange::new("base", "head"), &rendered, &outcome)
            .await
            .expect("publish");

        let runs = platform.check_runs();
        assert_eq!(runs.len(), 1);
        assert!(runs[0].request.annotations.is_empty());
        assert_eq!(runs[0].request.conclusion, CheckConclusion::Success);
    }

    #[test]
    fn test_truncate_summary_respects_char_boundary() {
        let long = "é".repeat(MAX_SUMMARY_BYTES);
        let truncated = truncate_summary(&long);
        assert!(truncated.len() <= MAX_SUMMARY_BYTES);
        assert!(truncated.chars().all(|c| c == 'é'));
    }
}
