//! Log output for exercise runs.
//!
//! The crate only emits `tracing` events; installing a subscriber is left to
//! the binary or test that runs the suites. [`init_tracing`] is a convenience
//! for the common case.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Subscriber settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub filter: String,
    /// Emit one JSON object per event
    pub json: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl TracingConfig {
    /// Default settings (`info`, human-readable)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fallback filter directive
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Switch to JSON output
    #[must_use]
    pub const fn with_json(mut self) -> Self {
        self.json = true;
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }
}

/// Install a global fmt subscriber
///
/// Returns `false` when a global subscriber was already installed, in which
/// case the existing one stays in place.
pub fn init_tracing(config: &TracingConfig) -> bool {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(config.env_filter())
        .with_target(false);
    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };
    if installed {
        tracing::debug!(filter = %config.filter, json = config.json, "tracing initialized");
    }
    installed
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TracingConfig::new();
        assert_eq!(config.filter, "info");
        assert!(!config.json);
    }

    #[test]
    fn test_from_yaml_partial() {
        let config: TracingConfig = serde_yaml_ng::from_str("json: true").unwrap();
        assert!(config.json);
        assert_eq!(config.filter, "info");
    }

    #[test]
    fn test_init_is_idempotent() {
        let config = TracingConfig::new().with_filter("rx_page_objects=debug");
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
