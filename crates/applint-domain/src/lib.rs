//! applint Domain Model
//!
//! Defines the objects that flow through a lint run:
//! - ChangedFile / TreeEntry: what changed between two revisions and the head layout
//! - RawFinding: a checker's own output, before it is attributed to a path
//! - Finding: one reportable lint result attributed to exactly one path
//! - LintReport: the ordered, immutable result of a run with severity counts
//! - RunOutcome: the pass/fail decision derived from a report
//!
//! All objects are serializable. Findings carry a stable fingerprint so that
//! repeated runs over the same revision produce identical reports.

pub mod change;
pub mod error;
pub mod finding;
pub mod report;

pub use change::{ChangeKind, ChangedFile, EntryKind, TreeEntry};
pub use error::{LintError, Result};
pub use finding::{Finding, Location, RawFinding, Severity, Span};
pub use report::{LintReport, RunOutcome, SeverityCounts};

/// applint domain version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
