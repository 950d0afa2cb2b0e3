//! Supported file kinds.

use serde::{Deserialize, Serialize};

/// Files the linter knows how to check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// `umbrel-app.yml`
    AppManifest,

    /// `docker-compose.yml`
    Compose,

    /// `umbrel-app-store.yml`
    StoreIndex,
}

impl FileKind {
    pub const ALL: [FileKind; 3] = [FileKind::AppManifest, FileKind::Compose, FileKind::StoreIndex];

    /// Filename suffix the kind is recognized by.
    pub fn filename(&self) -> &'static str {
        match self {
            FileKind::AppManifest => "umbrel-app.yml",
            FileKind::Compose => "docker-compose.yml",
            FileKind::StoreIndex => "umbrel-app-store.yml",
        }
    }

    /// Classify `path` by filename suffix, at any directory depth.
    pub fn classify(path: &str) -> Option<FileKind> {
        Self::ALL.into_iter().find(|kind| path.ends_with(kind.filename()))
    }

    /// Whether checks of this kind are scoped to an owning unit.
    pub fn is_unit_scoped(&self) -> bool {
        !matches!(self, FileKind::StoreIndex)
    }
}

impl std::fmt::Display for FileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.filename())
    }
}
