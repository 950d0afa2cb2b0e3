//! Pipeline orchestration: discover, dispatch, aggregate, decide, report.

use std::sync::Arc;
use std::time::Instant;

use applint_domain::{LintReport, Result, RunOutcome};
use tracing::{info, Instrument};

use crate::aggregate::aggregate;
use crate::checker::Checker;
use crate::config::LintConfig;
use crate::discovery::discover;
use crate::dispatch::Dispatcher;
use crate::obs;
use crate::outcome::decide;
use crate::platform::Platform;
use crate::render::{render, RenderedReport};
use crate::sink::ReportSink;
use crate::trigger::{PullRequestContext, RevisionRange, Trigger};

/// Result of one complete run.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub range: RevisionRange,
    pub report: LintReport,
    pub outcome: RunOutcome,
    pub rendered: RenderedReport,

    /// Whether a comment was posted on the pull request.
    pub commented: bool,

    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

impl RunResult {
    pub fn failed(&self) -> bool {
        self.outcome.failed
    }
}

/// The lint pipeline over injected platform and checker collaborators.
pub struct LintPipeline {
    platform: Arc<dyn Platform>,
    dispatcher: Dispatcher,
    config: LintConfig,
}

impl LintPipeline {
    pub fn new(
        platform: Arc<dyn Platform>,
        checker: Arc<dyn Checker>,
        config: LintConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            dispatcher: Dispatcher::new(Arc::clone(&platform), checker, config.clone()),
            platform,
            config,
        })
    }

    /// Discover, dispatch and aggregate. Any upstream or checker failure aborts.
    pub async fn run(
        &self,
        range: &RevisionRange,
        pull_request: Option<&PullRequestContext>,
    ) -> Result<LintReport> {
        let change_set = discover(self.platform.as_ref(), range, self.config.fetch_tree).await?;
        let pull_request_url = pull_request.and_then(|pr| pr.html_url.as_deref());
        let streams = self
            .dispatcher
            .dispatch(range, &change_set, pull_request_url)
            .await?;
        Ok(aggregate(streams))
    }

    /// Full run for `trigger`: resolve the range, lint, decide, publish to
    /// `sink`, then comment on the pull request when there is one.
    pub async fn execute(&self, trigger: &Trigger, sink: &dyn ReportSink) -> Result<RunResult> {
        let range = trigger.resolve_range()?;
        let span = obs::run_span(&range);
        self.execute_range(range, trigger.pull_request.as_ref(), sink)
            .instrument(span)
            .await
    }

    async fn execute_range(
        &self,
        range: RevisionRange,
        pull_request: Option<&PullRequestContext>,
        sink: &dyn ReportSink,
    ) -> Result<RunResult> {
        let start = Instant::now();
        info!(basehead = %range.basehead(), "Starting lint run");

        let report = self.run(&range, pull_request).await?;
        let outcome = decide(&report);
        let rendered = render(&report, &outcome)?;

        if let Err(e) = sink.publish(&range, &rendered, &outcome).await {
            obs::emit_publish_error(sink.name(), &e);
            return Err(e);
        }

        let commented = match pull_request {
            Some(pr) if self.config.post_comment => {
                self.platform.create_comment(pr.number, &rendered.comment).await?;
                true
            }
            _ => false,
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            findings = report.len(),
            failed = outcome.failed,
            commented = commented,
            duration_ms = duration_ms,
            "Lint run finished"
        );

        Ok(RunResult {
            range,
            report,
            outcome,
            rendered,
            commented,
            duration_ms,
        })
    }
}
