//! Dispatcher: routes changed files and unit directories to the checker.
//!
//! Per-file checks and structural checks each run with at most
//! `LintConfig::concurrency` in flight. Results are slotted back by
//! dispatch index, so completion order never leaks into the report.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use applint_domain::{ChangedFile, Finding, LintError, RawFinding, Result, TreeEntry};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::debug;

use crate::checker::{CheckContext, Checker};
use crate::config::LintConfig;
use crate::discovery::ChangeSet;
use crate::kind::FileKind;
use crate::obs;
use crate::platform::Platform;
use crate::trigger::RevisionRange;
use crate::unit::UnitId;

/// A changed file that passed classification and is due for a check.
#[derive(Debug, Clone)]
struct FileJob {
    path: String,
    kind: FileKind,
    is_added: bool,
}

impl FileJob {
    fn classify(file: &ChangedFile) -> Option<Self> {
        let kind = FileKind::classify(&file.path)?;
        if file.is_removed() {
            debug!(path = %file.path, "skipping removed file");
            return None;
        }
        Some(Self {
            path: file.path.clone(),
            kind,
            is_added: file.is_added(),
        })
    }
}

/// Immutable inputs shared by every check of one run.
struct Scope {
    platform: Arc<dyn Platform>,
    checker: Arc<dyn Checker>,
    head: String,
    tree: Arc<Vec<TreeEntry>>,
    pull_request_url: Option<String>,
    check_image_architectures: bool,
}

impl Scope {
    fn context_for(&self, job: &FileJob) -> CheckContext {
        if !job.kind.is_unit_scoped() {
            return CheckContext::standalone();
        }
        let unit = UnitId::owning(&job.path);
        match job.kind {
            FileKind::Compose => CheckContext::compose(
                unit,
                Arc::clone(&self.tree),
                self.check_image_architectures,
            ),
            _ => CheckContext::manifest(unit, job.is_added, self.pull_request_url.clone()),
        }
    }

    async fn lint_file(&self, job: FileJob) -> Result<Vec<Finding>> {
        let content = match self.platform.content(&job.path, &self.head).await {
            Ok(Some(content)) => content,
            Ok(None) => {
                obs::emit_file_skipped(&job.path, &"no readable content");
                return Ok(Vec::new());
            }
            Err(e @ LintError::Decode(_)) => {
                obs::emit_file_skipped(&job.path, &e);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e),
        };

        let context = self.context_for(&job);
        let started = Instant::now();
        let raw = self
            .checker
            .lint(job.kind, &content, &context)
            .await
            .map_err(|e| attribute(e, &job.path))?;
        obs::emit_check_finished(&job.path, raw.len(), started.elapsed().as_millis() as u64);

        Ok(raw
            .into_iter()
            .map(|r| Finding::from_raw(r, job.path.as_str()))
            .collect())
    }

    async fn lint_unit(&self, unit: String) -> Result<Vec<Finding>> {
        let entries: Vec<TreeEntry> = self
            .tree
            .iter()
            .filter(|entry| entry.is_under(&unit))
            .cloned()
            .collect();

        let started = Instant::now();
        let raw = self
            .checker
            .lint_directory(&unit, &entries)
            .await
            .map_err(|e| attribute(e, &unit))?;
        obs::emit_check_finished(&unit, raw.len(), started.elapsed().as_millis() as u64);

        Ok(raw
            .into_iter()
            .map(|r| structural_finding(r, &unit))
            .collect())
    }
}

/// Structural findings name the file they concern; fall back to the unit directory.
fn structural_finding(raw: RawFinding, unit: &str) -> Finding {
    let source_path = raw.file.clone().unwrap_or_else(|| unit.to_string());
    Finding::from_raw(raw, source_path)
}

/// Any checker failure aborts the run, named after the path or unit it hit.
fn attribute(err: LintError, target: &str) -> LintError {
    match err {
        LintError::Checker { detail, .. } => LintError::Checker {
            target: target.to_string(),
            detail,
        },
        other => LintError::checker(target, other),
    }
}

/// Distinct top-level units across every changed path, removed ones included.
fn structural_units(changed: &[ChangedFile], config: &LintConfig) -> Vec<String> {
    let mut units: Vec<String> = Vec::new();
    for file in changed {
        let UnitId::Scoped(unit) = UnitId::top_level(&file.path) else {
            continue;
        };
        if config.is_ignored(&unit) || units.contains(&unit) {
            continue;
        }
        units.push(unit);
    }
    units
}

/// Run `check` over `items` with bounded concurrency, returning results in input order.
async fn run_ordered<T, F, Fut>(items: Vec<T>, limit: usize, check: F) -> Result<Vec<Vec<Finding>>>
where
    T: Send + 'static,
    F: Fn(T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Finding>>> + Send + 'static,
{
    let total = items.len();
    let semaphore = Arc::new(Semaphore::new(limit.max(1)));
    let check = Arc::new(check);

    let mut join_set = JoinSet::new();
    for (idx, item) in items.into_iter().enumerate() {
        let semaphore = Arc::clone(&semaphore);
        let check = Arc::clone(&check);
        join_set.spawn(async move {
            let _permit = semaphore
                .acquire_owned()
                .await
                .map_err(|e| LintError::checker("dispatch", e))?;
            let findings = check(item).await?;
            Ok::<(usize, Vec<Finding>), LintError>((idx, findings))
        });
    }

    let mut ordered: Vec<Option<Vec<Finding>>> = vec![None; total];
    while let Some(joined) = join_set.join_next().await {
        // Returning early drops the set, which aborts the checks still running.
        let result = joined.map_err(|e| LintError::checker("dispatch", format!("task join error: {e}")))?;
        let (idx, findings) = result?;
        ordered[idx] = Some(findings);
    }

    ordered
        .into_iter()
        .enumerate()
        .map(|(idx, slot)| {
            slot.ok_or_else(|| LintError::checker("dispatch", format!("missing result for check {idx}")))
        })
        .collect()
}

/// Routes a change set to the checker.
pub struct Dispatcher {
    platform: Arc<dyn Platform>,
    checker: Arc<dyn Checker>,
    config: LintConfig,
}

impl Dispatcher {
    pub fn new(platform: Arc<dyn Platform>, checker: Arc<dyn Checker>, config: LintConfig) -> Self {
        Self {
            platform,
            checker,
            config,
        }
    }

    /// Lint every in-scope file of `change_set`, then every touched unit.
    ///
    /// Returns one finding stream per check: file checks in discovery order,
    /// followed by structural checks in order of first appearance. Structural
    /// checks are skipped when the change set carries no tree.
    pub async fn dispatch(
        &self,
        range: &RevisionRange,
        change_set: &ChangeSet,
        pull_request_url: Option<&str>,
    ) -> Result<Vec<Vec<Finding>>> {
        let scope = Arc::new(Scope {
            platform: Arc::clone(&self.platform),
            checker: Arc::clone(&self.checker),
            head: range.head.clone(),
            tree: change_set.tree_or_empty(),
            pull_request_url: pull_request_url.map(str::to_string),
            check_image_architectures: self.config.check_image_architectures,
        });

        let jobs: Vec<FileJob> = change_set.changed.iter().filter_map(FileJob::classify).collect();
        debug!(
            changed = change_set.changed.len(),
            in_scope = jobs.len(),
            "dispatching file checks"
        );

        let file_scope = Arc::clone(&scope);
        let mut streams = run_ordered(jobs, self.config.concurrency, move |job| {
            let scope = Arc::clone(&file_scope);
            async move { scope.lint_file(job).await }
        })
        .await?;

        if change_set.tree.is_some() {
            let units = structural_units(&change_set.changed, &self.config);
            debug!(units = units.len(), "dispatching structural checks");
            let unit_scope = Arc::clone(&scope);
            let structural = run_ordered(units, self.config.concurrency, move |unit| {
                let scope = Arc::clone(&unit_scope);
                async move { scope.lint_unit(unit).await }
            })
            .await?;
            streams.extend(structural);
        }

        Ok(streams)
    }
}
