//! Structured lifecycle events for a lint run.
//!
//! Every event carries an `event` field so JSON logs can be filtered on it.

use tracing::{debug, info, warn};

use crate::trigger::RevisionRange;

/// Span tagging all work for one revision range.
pub fn run_span(range: &RevisionRange) -> tracing::Span {
    tracing::info_span!("applint.run", base = %range.base, head = %range.head)
}

/// Emit event: changed paths and (optionally) the tree were fetched.
pub fn emit_discovery_finished(range: &RevisionRange, changed: usize, tree_entries: Option<usize>) {
    info!(
        event = "lint.discovery_finished",
        basehead = %range.basehead(),
        changed = changed,
        tree_entries = tree_entries.unwrap_or(0),
        tree_fetched = tree_entries.is_some(),
    );
}

/// Emit event: a supported file produced no content and was not checked.
pub fn emit_file_skipped(path: &str, reason: &dyn std::fmt::Display) {
    debug!(event = "lint.file_skipped", path = %path, reason = %reason);
}

/// Emit event: one checker invocation returned.
pub fn emit_check_finished(target: &str, findings: usize, duration_ms: u64) {
    debug!(
        event = "lint.check_finished",
        target = %target,
        findings = findings,
        duration_ms = duration_ms,
    );
}

/// Emit event: the report was aggregated.
pub fn emit_report_built(findings: usize, digest: &str) {
    info!(event = "lint.report_built", findings = findings, digest = %digest);
}

/// Emit event: pass/fail decided.
pub fn emit_outcome_decided(errors: usize, warnings: usize, infos: usize, failed: bool) {
    info!(
        event = "lint.outcome_decided",
        errors = errors,
        warnings = warnings,
        infos = infos,
        failed = failed,
    );
}

/// Emit event: a report destination rejected the report (warning level).
pub fn emit_publish_error(sink: &str, error: &dyn std::fmt::Display) {
    warn!(event = "lint.publish_error", sink = %sink, error = %error);
}
