//! Per-screen configuration.
//!
//! ```yaml
//! page_size: 25
//! page_window: 7
//! search_debounce_ms: 300
//! select_scope: page
//! bulk_concurrency: 4
//! ```
//!
//! Every key is optional; missing keys take the defaults below. Unknown keys
//! are rejected so typos don't silently fall back to defaults.

use std::path::Path;
use std::time::Duration;

use listkit_bulk::BulkActionCoordinator;
use listkit_query::{SelectScope, ViewState, DEFAULT_PAGE_WINDOW};
use serde::{Deserialize, Serialize};

use crate::error::ListError;

/// Rows per page when not configured.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Search debounce delay when not configured.
pub const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 250;

/// Settings for one list screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewConfig {
    /// Records per page.
    pub page_size: usize,
    /// Number of page buttons in the pagination control.
    pub page_window: usize,
    /// Quiet period before a search term is applied.
    pub search_debounce_ms: u64,
    /// What "select all" covers.
    pub select_scope: SelectScope,
    /// Maximum bulk calls in flight; `None` sends them all at once.
    pub bulk_concurrency: Option<usize>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            page_size: DEFAULT_PAGE_SIZE,
            page_window: DEFAULT_PAGE_WINDOW,
            search_debounce_ms: DEFAULT_SEARCH_DEBOUNCE_MS,
            select_scope: SelectScope::Filtered,
            bulk_concurrency: None,
        }
    }
}

impl ViewConfig {
    /// Parses and validates YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ListError> {
        let config: ViewConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ListError> {
        let config: ViewConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a `.json` file as JSON and anything else as YAML.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ListError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ListError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Rejects zero sizes.
    pub fn validate(&self) -> Result<(), ListError> {
        if self.page_size == 0 {
            return Err(ListError::Config("page_size must be at least 1".into()));
        }
        if self.page_window == 0 {
            return Err(ListError::Config("page_window must be at least 1".into()));
        }
        if self.bulk_concurrency == Some(0) {
            return Err(ListError::Config(
                "bulk_concurrency must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }

    /// First page, no filters, default sort.
    pub fn initial_state(&self) -> Result<ViewState, ListError> {
        Ok(ViewState::new(self.page_size)?)
    }

    /// A coordinator honoring `bulk_concurrency`.
    pub fn coordinator(&self) -> BulkActionCoordinator {
        match self.bulk_concurrency {
            Some(limit) => BulkActionCoordinator::new().with_concurrency_limit(limit),
            None => BulkActionCoordinator::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ViewConfig::default();
        assert_eq!(config.page_size, 10);
        assert_eq!(config.page_window, 5);
        assert_eq!(config.search_debounce(), Duration::from_millis(250));
        assert_eq!(config.select_scope, SelectScope::Filtered);
        assert_eq!(config.coordinator().concurrency_limit(), None);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = ViewConfig::from_yaml_str("page_size: 25\nselect_scope: page\n").unwrap();
        assert_eq!(config.page_size, 25);
        assert_eq!(config.select_scope, SelectScope::Page);
        assert_eq!(config.page_window, 5);
        assert_eq!(config.initial_state().unwrap().page.size(), 25);
    }

    #[test]
    fn json_with_concurrency() {
        let config = ViewConfig::from_json_str(r#"{"bulk_concurrency": 4}"#).unwrap();
        assert_eq!(config.coordinator().concurrency_limit(), Some(4));
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let err = ViewConfig::from_yaml_str("page_size: 0").unwrap_err();
        assert!(err.to_string().contains("page_size"));

        let err = ViewConfig::from_json_str(r#"{"bulk_concurrency": 0}"#).unwrap_err();
        assert!(err.to_string().contains("bulk_concurrency"));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            ViewConfig::from_yaml_str("pagesize: 20"),
            Err(ListError::Config(_))
        ));
    }

    #[test]
    fn loads_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("orders.yaml");
        std::fs::write(&yaml, "page_size: 50\n").unwrap();
        assert_eq!(ViewConfig::from_file(&yaml).unwrap().page_size, 50);

        let json = dir.path().join("orders.json");
        std::fs::write(&json, r#"{"page_window": 3}"#).unwrap();
        assert_eq!(ViewConfig::from_file(&json).unwrap().page_window, 3);

        let missing = dir.path().join("missing.yaml");
        assert!(ViewConfig::from_file(missing)
            .unwrap_err()
            .to_string()
            .contains("failed to read"));
    }
}
