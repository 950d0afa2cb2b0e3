//! Outcome decision and title.

use applint_domain::{LintReport, RunOutcome, SeverityCounts};

use crate::obs;
use crate::platform::CheckConclusion;

fn plural(count: usize) -> &'static str {
    if count > 1 {
        "s"
    } else {
        ""
    }
}

/// Human-readable run title. Only errors and warnings move it away from success.
pub fn outcome_title(counts: SeverityCounts) -> String {
    let (errors, warnings) = (counts.errors, counts.warnings);
    match (errors, warnings) {
        (0, 0) => "🎉 Linting finished with no errors or warnings 🎉".to_string(),
        (e, w) if e > 0 && w > 0 => format!(
            "❌ Linting failed with {e} error{} and {w} warning{} ❌",
            plural(e),
            plural(w)
        ),
        (e, 0) => format!("❌ Linting failed with {e} error{} ❌", plural(e)),
        (_, w) => format!("⚠️ Linting finished with {w} warning{} ⚠️", plural(w)),
    }
}

/// The single pass/fail signal: a run fails iff it has at least one error.
pub fn decide(report: &LintReport) -> RunOutcome {
    let counts = report.counts();
    let outcome = RunOutcome {
        title: outcome_title(counts),
        error_count: counts.errors,
        warning_count: counts.warnings,
        info_count: counts.infos,
        failed: counts.errors > 0,
    };
    obs::emit_outcome_decided(counts.errors, counts.warnings, counts.infos, outcome.failed);
    outcome
}

/// Check-run conclusion for an outcome.
pub fn conclusion(outcome: &RunOutcome) -> CheckConclusion {
    if outcome.failed {
        CheckConclusion::Failure
    } else {
        CheckConclusion::Success
    }
}
