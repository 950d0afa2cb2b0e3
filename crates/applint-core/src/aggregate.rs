//! Finding aggregation.

use applint_domain::{Finding, LintReport};

use crate::obs;

/// Concatenate finding streams in dispatch order into one report.
///
/// No deduplication and no reordering: two findings sharing a rule id are
/// still two reportable units.
pub fn aggregate(streams: impl IntoIterator<Item = Vec<Finding>>) -> LintReport {
    let findings: Vec<Finding> = streams.into_iter().flatten().collect();
    let report = LintReport::new(findings);
    obs::emit_report_built(report.len(), &report.digest());
    report
}
