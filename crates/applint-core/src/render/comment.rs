//! Conversational comment posted on the pull request.

use applint_domain::LintReport;

use super::markdown::{code_span, escape_markdown};
use super::{badge, LEGEND, THANKS};

/// Longest issue comment body accepted by the API, in characters.
pub const MAX_COMMENT_CHARS: usize = 65_536;

/// Hidden marker carrying the report digest, for spotting repeat comments.
pub fn digest_marker(digest: &str) -> String {
    format!("<!-- applint:{digest} -->")
}

/// Heading, preamble, escaped findings table (when non-empty), legend and marker.
///
/// Rows that would push the body past [`MAX_COMMENT_CHARS`] are left out and
/// counted in a closing line pointing at the job summary.
pub fn render_comment(report: &LintReport, title: &str, digest: &str) -> String {
    let mut out = format!("## {title}\n{THANKS}\n\n");
    let footer = format!("### Legend\n\n{LEGEND}\n\n{}\n", digest_marker(digest));

    if !report.is_empty() {
        out.push_str("| 🚨 Severity | 🪪 ID | 📄 File | 💬 Message |\n");
        out.push_str("| --- | --- | --- | --- |\n");

        let total = report.len();
        let reserve = overflow_line(total).chars().count() + footer.chars().count() + 1;
        let mut used = out.chars().count();
        let mut shown = 0;
        for finding in report.findings() {
            let row = format!(
                "| {} | {} | {} | **{}**: {} |\n",
                badge(finding.severity),
                code_span(&finding.id),
                code_span(&finding.source_path),
                escape_markdown(&finding.title),
                escape_markdown(&finding.message),
            );
            let len = row.chars().count();
            if used + len + reserve > MAX_COMMENT_CHARS {
                break;
            }
            out.push_str(&row);
            used += len;
            shown += 1;
        }
        if shown < total {
            out.push_str(&overflow_line(total - shown));
        }
        out.push('\n');
    }

    out.push_str(&footer);
    out
}

fn overflow_line(hidden: usize) -> String {
    let noun = if hidden == 1 { "finding" } else { "findings" };
    format!("\n_… and {hidden} more {noun}, see the job summary._\n")
}
