//! Aggregated lint report and the outcome derived from it.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::finding::{Finding, Severity};

/// Number of findings per severity.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SeverityCounts {
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
}

impl SeverityCounts {
    /// Count `findings` in a single pass.
    pub fn tally<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> Self {
        let mut counts = SeverityCounts::default();
        for finding in findings {
            match finding.severity {
                Severity::Error => counts.errors += 1,
                Severity::Warning => counts.warnings += 1,
                Severity::Info => counts.infos += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.infos
    }
}

/// Ordered findings of one run plus their severity counts.
///
/// Built once by the aggregator; read-only afterwards.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct LintReport {
    findings: Vec<Finding>,
    counts: SeverityCounts,
}

impl LintReport {
    pub fn new(findings: Vec<Finding>) -> Self {
        let counts = SeverityCounts::tally(&findings);
        Self { findings, counts }
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn counts(&self) -> SeverityCounts {
        self.counts
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Order-sensitive digest over every finding fingerprint.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        for finding in &self.findings {
            hasher.update(finding.fingerprint().as_bytes());
            hasher.update(b"\n");
        }
        hex::encode(hasher.finalize())
    }
}

/// Pass/fail decision of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunOutcome {
    pub title: String,
    pub error_count: usize,
    pub warning_count: usize,
    pub info_count: usize,
    pub failed: bool,
}
