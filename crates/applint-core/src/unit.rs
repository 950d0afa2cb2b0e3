//! Logical unit derivation.
//!
//! A unit is the directory-scoped component (one app) a file belongs to. The
//! derivation is purely path based; files at the repository root have no
//! owning unit and map to [`UnitId::Unscoped`].

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum UnitId {
    Scoped(String),
    #[default]
    Unscoped,
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

impl UnitId {
    /// Unit owning a component-scoped file: its parent directory name.
    pub fn owning(path: &str) -> Self {
        let parts = segments(path);
        if parts.len() >= 2 {
            UnitId::Scoped(parts[parts.len() - 2].to_string())
        } else {
            UnitId::Unscoped
        }
    }

    /// Top-level directory of `path`, used to group structural checks.
    pub fn top_level(path: &str) -> Self {
        let parts = segments(path);
        if parts.len() >= 2 {
            UnitId::Scoped(parts[0].to_string())
        } else {
            UnitId::Unscoped
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            UnitId::Scoped(name) => Some(name),
            UnitId::Unscoped => None,
        }
    }

    /// Value handed to checkers; unscoped files get an empty unit id.
    pub fn as_checker_arg(&self) -> &str {
        self.name().unwrap_or("")
    }

    pub fn is_scoped(&self) -> bool {
        matches!(self, UnitId::Scoped(_))
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitId::Scoped(name) => f.write_str(name),
            UnitId::Unscoped => f.write_str("(unscoped)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owning_unit_is_parent_directory() {
        assert_eq!(
            UnitId::owning("bitcoin/umbrel-app.yml"),
            UnitId::Scoped("bitcoin".to_string())
        );
        assert_eq!(
            UnitId::owning("apps/lightning/docker-compose.yml"),
            UnitId::Scoped("lightning".to_string())
        );
    }

    #[test]
    fn test_root_file_is_unscoped() {
        assert_eq!(UnitId::owning("umbrel-app.yml"), UnitId::Unscoped);
        assert_eq!(UnitId::top_level("README.md"), UnitId::Unscoped);
        assert_eq!(UnitId::Unscoped.as_checker_arg(), "");
    }

    #[test]
    fn test_top_level_unit() {
        assert_eq!(
            UnitId::top_level("bitcoin/data/.gitkeep"),
            UnitId::Scoped("bitcoin".to_string())
        );
    }

    #[test]
    fn test_leading_slash_ignored() {
        assert_eq!(
            UnitId::owning("/bitcoin/umbrel-app.yml"),
            UnitId::Scoped("bitcoin".to_string())
        );
    }
}
