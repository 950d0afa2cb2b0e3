//! Reporter: four independent views over one [`LintReport`].
//!
//! - structured export (JSON, lossless)
//! - inline annotations (located findings only)
//! - run summary (HTML table for the job summary)
//! - pull request comment (escaped markdown table)

pub mod annotations;
pub mod comment;
pub mod export;
pub mod markdown;
pub mod summary;

use applint_domain::{LintReport, Result, RunOutcome, Severity};
use serde::Serialize;

pub use annotations::{render_annotations, Annotation, AnnotationLevel};
pub use comment::{render_comment, MAX_COMMENT_CHARS};
pub use export::{parse_export, render_export};
pub use markdown::{escape_html, escape_markdown};
pub use summary::render_summary;

pub(crate) const THANKS: &str = "Thank you for your submission! This is an automated linter that checks for common issues in pull requests to the Umbrel App Store.\nPlease review any comments below and make any necessary changes to your submission.";

pub(crate) const LEGEND: &str = "❌ **Error**  \nThis must be resolved before this PR can be merged.\n\n\n⚠️ **Warning**  \nThis is highly encouraged to be resolved, but is not strictly mandatory.\n\n\nℹ️ **Info**  \nThis is just for your information.";

/// Severity glyph and label shown in table rows.
pub fn badge(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "❌ Error",
        Severity::Warning => "⚠️ Warning",
        Severity::Info => "ℹ️ Info",
    }
}

/// Every view of one report, rendered once per run.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RenderedReport {
    pub title: String,
    pub digest: String,
    pub export: String,
    pub annotations: Vec<Annotation>,
    pub summary: String,
    pub comment: String,
}

pub fn render(report: &LintReport, outcome: &RunOutcome) -> Result<RenderedReport> {
    let digest = report.digest();
    Ok(RenderedReport {
        title: outcome.title.clone(),
        export: render_export(report)?,
        annotations: render_annotations(report)?,
        summary: render_summary(report, &outcome.title),
        comment: render_comment(report, &outcome.title, &digest),
        digest,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::decide;
    use applint_domain::{Finding, RawFinding, Span};

    #[test]
    fn test_unlocated_finding_appears_everywhere_but_annotations() {
        let report = LintReport::new(vec![Finding::from_raw(
            RawFinding::new("missing_icon", Severity::Warning, "Icon", "no icon"),
            "bitcoin",
        )]);
        let rendered = render(&report, &decide(&report)).expect("render");
        assert!(rendered.annotations.is_empty());
        assert!(rendered.export.contains("missing_icon"));
        assert!(rendered.summary.contains("missing_icon"));
        assert!(rendered.comment.contains("`missing_icon`"));
    }

    #[test]
    fn test_render_is_deterministic() {
        let report = LintReport::new(vec![Finding::from_raw(
            RawFinding::new("r", Severity::Error, "t", "m").at_lines(Span::single(1)),
            "a/umbrel-app.yml",
        )]);
        let outcome = decide(&report);
        assert_eq!(
            render(&report, &outcome).expect("render"),
            render(&report, &outcome).expect("render")
        );
    }
}
