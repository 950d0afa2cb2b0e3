//! Inline annotations, as workflow commands and as check-run annotations.

use applint_domain::{Finding, LintReport, Result, Severity};
use serde::{Deserialize, Serialize};

use crate::platform::CheckRunAnnotation;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationLevel {
    /// Blocking.
    Failure,
    /// Advisory.
    Warning,
    /// Informational.
    Notice,
}

impl AnnotationLevel {
    pub fn from_severity(severity: Severity) -> Self {
        match severity {
            Severity::Error => AnnotationLevel::Failure,
            Severity::Warning => AnnotationLevel::Warning,
            Severity::Info => AnnotationLevel::Notice,
        }
    }

    /// Level name in the check-runs API.
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationLevel::Failure => "failure",
            AnnotationLevel::Warning => "warning",
            AnnotationLevel::Notice => "notice",
        }
    }

    /// Workflow command name.
    pub fn command(&self) -> &'static str {
        match self {
            AnnotationLevel::Failure => "error",
            AnnotationLevel::Warning => "warning",
            AnnotationLevel::Notice => "notice",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Annotation {
    pub path: String,
    pub level: AnnotationLevel,
    pub title: String,
    pub message: String,
    pub rule_id: String,
    pub start_line: u32,
    pub end_line: u32,
    pub start_column: Option<u32>,
    pub end_column: Option<u32>,
    /// The finding as JSON.
    pub raw_details: String,
}

impl Annotation {
    /// `None` for findings without a location.
    pub fn from_finding(finding: &Finding) -> Result<Option<Self>> {
        let Some(location) = finding.location else {
            return Ok(None);
        };
        Ok(Some(Self {
            path: finding.source_path.clone(),
            level: AnnotationLevel::from_severity(finding.severity),
            title: finding.title.clone(),
            message: finding.message.clone(),
            rule_id: finding.id.clone(),
            start_line: location.line.start,
            end_line: location.line.end,
            start_column: location.column.map(|c| c.start),
            end_column: location.column.map(|c| c.end),
            raw_details: serde_json::to_string(finding)?,
        }))
    }

    /// `::error file=…,line=…::message` for the workflow runner.
    pub fn to_workflow_command(&self) -> String {
        let mut props = vec![
            format!("file={}", escape_property(&self.path)),
            format!("line={}", self.start_line),
            format!("endLine={}", self.end_line),
        ];
        if let Some(col) = self.start_column {
            props.push(format!("col={col}"));
        }
        if let Some(col) = self.end_column {
            props.push(format!("endColumn={col}"));
        }
        props.push(format!("title={}", escape_property(&self.title)));
        format!(
            "::{} {}::{}",
            self.level.command(),
            props.join(","),
            escape_data(&self.message)
        )
    }

    /// Check-run form. Columns are only sent for single-line ranges, which is
    /// all the API accepts.
    pub fn to_check_run_annotation(&self) -> CheckRunAnnotation {
        let single_line = self.start_line == self.end_line;
        CheckRunAnnotation {
            path: self.path.clone(),
            start_line: self.start_line,
            end_line: self.end_line,
            start_column: self.start_column.filter(|_| single_line),
            end_column: self.end_column.filter(|_| single_line),
            annotation_level: self.level.as_str().to_string(),
            message: self.message.clone(),
            title: format!("[{}] {}", self.rule_id, self.title),
            raw_details: Some(self.raw_details.clone()),
        }
    }
}

/// One annotation per located finding, in report order.
pub fn render_annotations(report: &LintReport) -> Result<Vec<Annotation>> {
    let mut annotations = Vec::new();
    for finding in report.findings() {
        if let Some(annotation) = Annotation::from_finding(finding)? {
            annotations.push(annotation);
        }
    }
    Ok(annotations)
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}
