//! Findings: the atomic unit of a lint run.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Severity of a finding. Closed set, ordered `Info < Warning < Error`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Capitalized label used in rendered reports.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Info => "Info",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive 1-indexed range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn single(at: u32) -> Self {
        Self { start: at, end: at }
    }
}

/// Position of a line-level finding inside its file.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Location {
    pub line: Span,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<Span>,
}

impl Location {
    pub fn lines(line: Span) -> Self {
        Self { line, column: None }
    }

    pub fn with_column(mut self, column: Span) -> Self {
        self.column = Some(column);
        self
    }
}

/// A checker's own output before attribution.
///
/// `file` is only set by structural checks, which report on files inside a
/// unit rather than on the content they were handed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawFinding {
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub message: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<Span>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<Span>,
}

impl RawFinding {
    pub fn new(
        id: impl Into<String>,
        severity: Severity,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            severity,
            title: title.into(),
            message: message.into(),
            file: None,
            line: None,
            column: None,
        }
    }

    pub fn at_lines(mut self, line: Span) -> Self {
        self.line = Some(line);
        self
    }

    pub fn at_columns(mut self, column: Span) -> Self {
        self.column = Some(column);
        self
    }

    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Location, if the checker reported a line. A column without a line is dropped.
    pub fn location(&self) -> Option<Location> {
        self.line.map(|line| Location {
            line,
            column: self.column,
        })
    }
}

/// One reportable lint result attributed to exactly one path.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Finding {
    /// Rule identifier.
    pub id: String,

    pub severity: Severity,

    /// Short human label.
    pub title: String,

    /// Free-form explanation, may span several lines.
    pub message: String,

    /// Absent for file-level and directory-level findings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// File or unit directory the finding is attributed to.
    pub source_path: String,
}

impl Finding {
    /// Attribute a checker result to `source_path`.
    pub fn from_raw(raw: RawFinding, source_path: impl Into<String>) -> Self {
        let location = raw.location();
        Self {
            id: raw.id,
            severity: raw.severity,
            title: raw.title,
            message: raw.message,
            location,
            source_path: source_path.into(),
        }
    }

    /// Stable SHA-256 identity over rule id, path and location.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.id.as_bytes());
        hasher.update(b"\0");
        hasher.update(self.source_path.as_bytes());
        hasher.update(b"\0");
        if let Some(loc) = &self.location {
            hasher.update(format!("{}:{}", loc.line.start, loc.line.end).as_bytes());
            if let Some(col) = &loc.column {
                hasher.update(format!(":{}:{}", col.start, col.end).as_bytes());
            }
        }
        hex::encode(hasher.finalize())
    }
}
