//! Result and error types for page objects and exercises.

use thiserror::Error;

/// Result type for page-object and exercise operations
pub type ExerciseResult<T> = Result<T, ExerciseError>;

/// Errors that can occur while querying components or running exercises
#[derive(Debug, Error)]
pub enum ExerciseError {
    /// The component handle no longer resolves to a live element
    #[error("Element not found: {selector}")]
    ElementNotFound {
        /// Selector that failed to resolve
        selector: String,
    },

    /// A resolved value differs from the configured expectation
    #[error("Assertion failed: expected {expected}, got {actual}")]
    AssertionMismatch {
        /// Expected value (debug formatted)
        expected: String,
        /// Actual value (debug formatted)
        actual: String,
    },

    /// Operation timed out
    #[error("Operation timed out after {ms}ms")]
    Timeout {
        /// Timeout in milliseconds
        ms: u64,
    },

    /// A `before` hook of the enclosing suite failed
    #[error("Suite setup failed: {message}")]
    SetupFailed {
        /// Error message from the hook
        message: String,
    },

    /// A displayed value could not be interpreted
    #[error("Invalid value {value:?}: {message}")]
    InvalidValue {
        /// Raw value read from the page
        value: String,
        /// Error message
        message: String,
    },

    /// Driver-level failure (click dispatch, script evaluation, ...)
    #[error("Driver error: {message}")]
    Driver {
        /// Error message
        message: String,
    },

    /// Browser launch error
    #[error("Failed to launch browser: {message}")]
    BrowserLaunch {
        /// Error message
        message: String,
    },

    /// Navigation error
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed
        url: String,
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl ExerciseError {
    /// Build an `ElementNotFound` for a selector
    #[must_use]
    pub fn not_found(selector: impl Into<String>) -> Self {
        Self::ElementNotFound {
            selector: selector.into(),
        }
    }

    /// Whether this error is an assertion mismatch rather than an infrastructure failure
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::AssertionMismatch { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ExerciseError::not_found("#dpSimple");
        assert_eq!(err.to_string(), "Element not found: #dpSimple");
        assert!(!err.is_assertion());
    }

    #[test]
    fn test_mismatch_display() {
        let err = ExerciseError::AssertionMismatch {
            expected: "true".to_string(),
            actual: "false".to_string(),
        };
        assert!(err.is_assertion());
        assert!(err.to_string().contains("expected true, got false"));
    }

    #[test]
    fn test_json_conversion() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: ExerciseError = parse.unwrap_err().into();
        assert!(matches!(err, ExerciseError::Json(_)));
    }
}
