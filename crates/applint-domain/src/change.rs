//! Change discovery objects: changed paths and the head tree snapshot.

use serde::{Deserialize, Serialize};

/// How a path changed between base and head.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
    Renamed,
}

/// One path that differs between two revisions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChangedFile {
    /// Repository-relative path at head.
    pub path: String,

    /// Kind of change.
    pub change_kind: ChangeKind,
}

impl ChangedFile {
    pub fn new(path: impl Into<String>, change_kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            change_kind,
        }
    }

    /// Removed files have no content at head and are never linted.
    pub fn is_removed(&self) -> bool {
        self.change_kind == ChangeKind::Removed
    }

    /// Whether this path first appears in the change set.
    pub fn is_added(&self) -> bool {
        self.change_kind == ChangeKind::Added
    }
}

/// Kind of entry in the head tree.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    File,
    Directory,
}

/// One entry of the repository layout at head.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: String,

    #[serde(rename = "type")]
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::File,
        }
    }

    pub fn directory(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind: EntryKind::Directory,
        }
    }

    /// Whether this entry lives strictly below directory `dir`.
    pub fn is_under(&self, dir: &str) -> bool {
        self.path
            .strip_prefix(dir)
            .map(|rest| rest.starts_with('/'))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_kind_serde() {
        let json = serde_json::to_string(&ChangeKind::Removed).expect("serialize");
        assert_eq!(json, "\"removed\"");
        let kind: ChangeKind = serde_json::from_str("\"renamed\"").expect("deserialize");
        assert_eq!(kind, ChangeKind::Renamed);
    }

    #[test]
    fn test_changed_file_flags() {
        assert!(ChangedFile::new("a/b.yml", ChangeKind::Removed).is_removed());
        assert!(ChangedFile::new("a/b.yml", ChangeKind::Added).is_added());
        assert!(!ChangedFile::new("a/b.yml", ChangeKind::Modified).is_added());
    }

    #[test]
    fn test_tree_entry_is_under() {
        let entry = TreeEntry::file("bitcoin/data/.gitkeep");
        assert!(entry.is_under("bitcoin"));
        assert!(!entry.is_under("bit"));
        assert!(!TreeEntry::directory("bitcoin").is_under("bitcoin"));
    }

    #[test]
    fn test_tree_entry_serializes_type_field() {
        let raw = serde_json::to_value(TreeEntry::directory("bitcoin")).expect("serialize");
        assert_eq!(raw["type"], "directory");
        assert_eq!(raw["path"], "bitcoin");
    }
}
