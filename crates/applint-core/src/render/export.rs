//! Structured export: the full finding sequence as JSON.

use applint_domain::{Finding, LintReport, Result};

/// Serialize every finding, in report order, as a pretty JSON array.
pub fn render_export(report: &LintReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report.findings())?)
}

/// Rebuild a report from [`render_export`] output. Counts are recomputed.
pub fn parse_export(raw: &str) -> Result<LintReport> {
    let findings: Vec<Finding> = serde_json::from_str(raw)?;
    Ok(LintReport::new(findings))
}
