//! Checker contract.
//!
//! A checker validates one file's content (or one unit's file listing) and
//! returns findings. This crate never validates content itself.

use std::sync::Arc;

use applint_domain::{RawFinding, Result, TreeEntry};
use async_trait::async_trait;

use crate::kind::FileKind;
use crate::unit::UnitId;

/// Supplementary input handed to a file check.
#[derive(Debug, Clone, Default)]
pub struct CheckContext {
    /// Unit owning the file.
    pub unit: UnitId,

    /// Whether the file first appears in this change set.
    pub is_new_submission: bool,

    /// Link back to the pull request, when there is one.
    pub pull_request_url: Option<String>,

    /// Head tree, for checks that resolve cross-file references.
    pub tree: Option<Arc<Vec<TreeEntry>>>,

    /// Verify that referenced images support the required architectures.
    pub check_image_architectures: bool,
}

impl CheckContext {
    /// Context for an app manifest.
    pub fn manifest(unit: UnitId, is_new_submission: bool, pull_request_url: Option<String>) -> Self {
        Self {
            unit,
            is_new_submission,
            pull_request_url,
            ..Self::default()
        }
    }

    /// Context for a compose file.
    pub fn compose(unit: UnitId, tree: Arc<Vec<TreeEntry>>, check_image_architectures: bool) -> Self {
        Self {
            unit,
            tree: Some(tree),
            check_image_architectures,
            ..Self::default()
        }
    }

    /// Context for files validated on their own.
    pub fn standalone() -> Self {
        Self::default()
    }
}

#[async_trait]
pub trait Checker: Send + Sync {
    /// Lint one file's content.
    async fn lint(&self, kind: FileKind, content: &str, context: &CheckContext)
        -> Result<Vec<RawFinding>>;

    /// Structural check over the entries below `unit`.
    async fn lint_directory(&self, unit: &str, entries: &[TreeEntry]) -> Result<Vec<RawFinding>>;
}
