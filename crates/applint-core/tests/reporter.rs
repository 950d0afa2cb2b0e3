//! Rendering properties across the four report views.

use applint_core::render::{parse_export, render, render_comment, render_summary};
use applint_core::{decide, AnnotationLevel};
use applint_domain::{Finding, LintReport, RawFinding, Severity, Span};

fn mixed_report() -> LintReport {
    LintReport::new(vec![
        Finding::from_raw(
            RawFinding::new("invalid_yaml", Severity::Error, "YAML [syntax]", "expected `a|b`\ngot c")
                .at_lines(Span::new(4, 4))
                .at_columns(Span::new(2, 9)),
            "bitcoin/umbrel-app.yml",
        ),
        Finding::from_raw(
            RawFinding::new("missing_icon", Severity::Warning, "Icon", "add an icon.svg!"),
            "bitcoin",
        ),
        Finding::from_raw(
            RawFinding::new("port_hint", Severity::Info, "Port", "ports <1024> are (rare)")
                .at_lines(Span::new(10, 12)),
            "bitcoin/docker-compose.yml",
        ),
    ])
}

fn comment_rows(comment: &str) -> Vec<&str> {
    comment
        .lines()
        .filter(|l| l.starts_with("| ") && !l.starts_with("| 🚨") && !l.starts_with("| ---"))
        .collect()
}

fn bare_pipes(line: &str) -> usize {
    let bytes = line.as_bytes();
    (0..bytes.len())
        .filter(|&i| bytes[i] == b'|' && (i == 0 || bytes[i - 1] != b'\\'))
        .count()
}

#[test]
fn annotations_only_for_located_findings() {
    let report = mixed_report();
    let rendered = render(&report, &decide(&report)).expect("render");

    assert_eq!(rendered.annotations.len(), 2);
    assert_eq!(rendered.annotations[0].level, AnnotationLevel::Failure);
    assert_eq!(rendered.annotations[1].level, AnnotationLevel::Notice);
    assert!(rendered
        .annotations
        .iter()
        .all(|a| a.rule_id != "missing_icon"));
}

#[test]
fn unlocated_finding_reaches_every_other_view() {
    let report = mixed_report();
    let rendered = render(&report, &decide(&report)).expect("render");

    assert!(rendered.export.contains("\"missing_icon\""));
    assert!(rendered.summary.contains("missing_icon"));
    assert!(rendered.comment.contains("`missing_icon`"));
}

#[test]
fn comment_table_keeps_four_columns() {
    let report = mixed_report();
    let comment = render_comment(&report, "title", &report.digest());
    let rows = comment_rows(&comment);

    assert_eq!(rows.len(), 3);
    for row in rows {
        assert_eq!(bare_pipes(row), 5, "row broke the table: {row}");
    }
}

#[test]
fn comment_escapes_markdown_specials() {
    let report = mixed_report();
    let comment = render_comment(&report, "title", &report.digest());
    let rows = comment_rows(&comment);

    assert!(rows[0].contains("**YAML \\[syntax\\]**"));
    assert!(rows[0].contains("expected \\`a\\|b\\`<br>got c"));
    assert!(rows[1].contains("add an icon\\.svg\\!"));
    assert!(rows[2].contains("ports \\<1024\\> are \\(rare\\)"));
}

#[test]
fn summary_and_comment_have_one_row_per_finding() {
    let report = mixed_report();
    let summary = render_summary(&report, "title");
    let comment = render_comment(&report, "title", &report.digest());

    assert_eq!(summary.matches("<tr><td>").count(), report.len());
    assert_eq!(comment_rows(&comment).len(), report.len());
    assert!(summary.contains("## Legend"));
    assert!(comment.contains("### Legend"));
}

#[test]
fn comment_carries_digest_marker() {
    let report = mixed_report();
    let rendered = render(&report, &decide(&report)).expect("render");
    assert!(rendered
        .comment
        .contains(&format!("<!-- applint:{} -->", report.digest())));
}

#[test]
fn export_round_trips() {
    let report = mixed_report();
    let rendered = render(&report, &decide(&report)).expect("render");
    let parsed = parse_export(&rendered.export).expect("parse");

    assert_eq!(parsed, report);
    assert_eq!(parsed.counts(), report.counts());
}

#[test]
fn digest_depends_on_order() {
    let report = mixed_report();
    let mut reversed: Vec<Finding> = report.findings().to_vec();
    reversed.reverse();
    assert_ne!(LintReport::new(reversed).digest(), report.digest());
}
