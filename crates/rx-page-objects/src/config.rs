//! Runner configuration.

use crate::result::ExerciseResult;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for [`SuiteRunner`](crate::SuiteRunner)
///
/// ```yaml
/// timeout_ms: 10000
/// fail_fast: false
/// grep: "rxDatePicker"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerConfig {
    /// Per-case time budget (None = unlimited)
    pub timeout_ms: Option<u64>,
    /// Stop running further cases after the first failure
    pub fail_fast: bool,
    /// Only run cases whose full name contains this pattern
    pub grep: Option<String>,
}

impl RunnerConfig {
    /// Create new config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-case timeout
    #[must_use]
    pub const fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = Some(ms);
        self
    }

    /// Enable fail-fast mode
    #[must_use]
    pub const fn with_fail_fast(mut self) -> Self {
        self.fail_fast = true;
        self
    }

    /// Only run cases whose full name contains `pattern`
    #[must_use]
    pub fn with_grep(mut self, pattern: impl Into<String>) -> Self {
        self.grep = Some(pattern.into());
        self
    }

    /// Per-case timeout as a duration
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Whether a case with this full name is selected to run
    #[must_use]
    pub fn selects(&self, full_name: &str) -> bool {
        self.grep
            .as_deref()
            .map_or(true, |pattern| full_name.contains(pattern))
    }

    /// Parse from YAML text
    pub fn from_yaml_str(yaml: &str) -> ExerciseResult<Self> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Load from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> ExerciseResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::result::ExerciseError;

    #[test]
    fn test_default() {
        let config = RunnerConfig::default();
        assert!(config.timeout().is_none());
        assert!(!config.fail_fast);
        assert!(config.selects("anything at all"));
    }

    #[test]
    fn test_builder() {
        let config = RunnerConfig::new()
            .with_timeout_ms(250)
            .with_fail_fast()
            .with_grep("enabled");
        assert_eq!(config.timeout(), Some(Duration::from_millis(250)));
        assert!(config.fail_fast);
        assert!(config.selects("rxDatePicker should be enabled"));
        assert!(!config.selects("rxDatePicker should be valid"));
    }

    #[test]
    fn test_from_yaml_partial() {
        let config = RunnerConfig::from_yaml_str("grep: rxSearchBox\n").unwrap();
        assert_eq!(config.grep.as_deref(), Some("rxSearchBox"));
        assert!(config.timeout_ms.is_none());
        assert!(!config.fail_fast);
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = RunnerConfig::from_yaml_str("timeout_ms: soon").unwrap_err();
        assert!(matches!(err, ExerciseError::Yaml(_)));
    }

    #[test]
    fn test_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runner.yaml");
        std::fs::write(&path, "timeout_ms: 5000\nfail_fast: true\n").unwrap();

        let config = RunnerConfig::from_yaml_file(&path).unwrap();
        assert_eq!(config.timeout_ms, Some(5000));
        assert!(config.fail_fast);
    }

    #[test]
    fn test_from_missing_file() {
        let err = RunnerConfig::from_yaml_file("/nonexistent/runner.yaml").unwrap_err();
        assert!(matches!(err, ExerciseError::Io(_)));
    }
}
