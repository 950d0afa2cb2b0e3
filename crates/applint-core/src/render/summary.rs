//! Run summary document (job summary).

use applint_domain::LintReport;

use super::markdown::escape_html;
use super::{badge, LEGEND, THANKS};

/// Title, legend and, for a non-empty report, an HTML table of every finding.
pub fn render_summary(report: &LintReport, title: &str) -> String {
    let mut out = format!("# {title}\n\n");

    if report.is_empty() {
        out.push_str(THANKS);
        out.push('\n');
        return out;
    }

    out.push_str("## Legend\n\n");
    out.push_str(LEGEND);
    out.push_str("\n\n");

    out.push_str("<table>\n");
    out.push_str(
        "<tr><th>🚨 Severity</th><th>🪪 ID</th><th>📄 File</th><th>💬 Message</th></tr>\n",
    );
    for finding in report.findings() {
        out.push_str(&format!(
            "<tr><td>{}</td><td><pre><code>{}</code></pre></td><td><pre><code>{}</code></pre></td><td><b>{}</b>: {}</td></tr>\n",
            badge(finding.severity),
            escape_html(&finding.id),
            escape_html(&finding.source_path),
            escape_html(&finding.title),
            escape_html(&finding.message),
        ));
    }
    out.push_str("</table>\n");
    out
}
