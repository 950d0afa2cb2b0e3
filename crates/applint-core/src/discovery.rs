//! Change discovery: changed paths plus the head tree snapshot.

use std::collections::HashSet;
use std::sync::Arc;

use applint_domain::{ChangedFile, Result, TreeEntry};

use crate::obs;
use crate::platform::Platform;
use crate::trigger::RevisionRange;

/// Everything dispatch needs to know about one revision range.
#[derive(Debug, Clone, Default)]
pub struct ChangeSet {
    /// Changed paths in the order the platform returned them, each path once.
    pub changed: Vec<ChangedFile>,

    /// Tree at `head`, when it was fetched.
    pub tree: Option<Arc<Vec<TreeEntry>>>,
}

impl ChangeSet {
    pub fn new(changed: Vec<ChangedFile>, tree: Option<Vec<TreeEntry>>) -> Self {
        Self {
            changed: dedup_paths(changed),
            tree: tree.map(Arc::new),
        }
    }

    /// Tree snapshot, or an empty one when discovery skipped it.
    pub fn tree_or_empty(&self) -> Arc<Vec<TreeEntry>> {
        self.tree.clone().unwrap_or_default()
    }
}

fn dedup_paths(changed: Vec<ChangedFile>) -> Vec<ChangedFile> {
    let mut seen = HashSet::new();
    changed
        .into_iter()
        .filter(|file| seen.insert(file.path.clone()))
        .collect()
}

/// Fetch the change set for `range`.
///
/// Compare and tree failures propagate; a bad range is not retried.
pub async fn discover(
    platform: &dyn Platform,
    range: &RevisionRange,
    fetch_tree: bool,
) -> Result<ChangeSet> {
    let changed = platform.compare(range).await?;
    let tree = if fetch_tree {
        Some(platform.tree(&range.head).await?)
    } else {
        None
    };

    let change_set = ChangeSet::new(changed, tree);
    obs::emit_discovery_finished(
        range,
        change_set.changed.len(),
        change_set.tree.as_ref().map(|t| t.len()),
    );
    Ok(change_set)
}
