//! Pipeline configuration.

use applint_domain::{LintError, Result};
use serde::{Deserialize, Serialize};

/// Knobs for one lint run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LintConfig {
    /// Maximum number of files fetched and checked at once.
    pub concurrency: usize,

    /// Ask compose checks to verify image architectures.
    pub check_image_architectures: bool,

    /// Fetch the head tree for compose and structural checks.
    pub fetch_tree: bool,

    /// Units that never get a structural check (e.g. `.github`).
    pub ignore_units: Vec<String>,

    /// Post the conversational comment when a pull request is known.
    pub post_comment: bool,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            check_image_architectures: true,
            fetch_tree: true,
            ignore_units: Vec::new(),
            post_comment: true,
        }
    }
}

impl LintConfig {
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_architecture_check(mut self, enabled: bool) -> Self {
        self.check_image_architectures = enabled;
        self
    }

    pub fn with_tree(mut self, enabled: bool) -> Self {
        self.fetch_tree = enabled;
        self
    }

    pub fn ignoring_unit(mut self, unit: impl Into<String>) -> Self {
        self.ignore_units.push(unit.into());
        self
    }

    pub fn with_comment(mut self, enabled: bool) -> Self {
        self.post_comment = enabled;
        self
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(LintError::Config("concurrency must be at least 1".to_string()));
        }
        Ok(())
    }

    pub fn is_ignored(&self, unit: &str) -> bool {
        self.ignore_units.iter().any(|u| u == unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LintConfig::default();
        assert_eq!(config.concurrency, 4);
        assert!(config.check_image_architectures);
        assert!(config.fetch_tree);
        assert!(config.post_comment);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let config = LintConfig::default().with_concurrency(0);
        assert!(matches!(config.validate(), Err(LintError::Config(_))));
    }

    #[test]
    fn test_ignored_units() {
        let config = LintConfig::default().ignoring_unit(".github");
        assert!(config.is_ignored(".github"));
        assert!(!config.is_ignored("bitcoin"));
    }
}
