//! Query configuration.

use serde::{Deserialize, Serialize};

/// Default attribute read by test-id queries
pub const DEFAULT_TEST_ID_ATTRIBUTE: &str = "data-testid";

/// Tags never matched by text queries
pub const DEFAULT_IGNORE_TAGS: &[&str] = &["script", "style"];

/// Options shared by every query on a screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Attribute holding test identifiers
    pub test_id_attribute: String,
    /// Tag names skipped by text queries
    pub ignore_tags: Vec<String>,
    /// Whether role queries consider hidden elements
    pub include_hidden: bool,
    /// Whether not-found errors embed the queried tree
    pub show_tree_in_errors: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            test_id_attribute: DEFAULT_TEST_ID_ATTRIBUTE.to_string(),
            ignore_tags: DEFAULT_IGNORE_TAGS.iter().map(|t| (*t).to_string()).collect(),
            include_hidden: false,
            show_tree_in_errors: true,
        }
    }
}

impl QueryConfig {
    /// Create a default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the test id attribute
    #[must_use]
    pub fn with_test_id_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.test_id_attribute = attribute.into();
        self
    }

    /// Replace the ignored tag list
    #[must_use]
    pub fn with_ignore_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Include hidden elements in role queries
    #[must_use]
    pub const fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }

    /// Toggle tree dumps in not-found errors
    #[must_use]
    pub const fn with_tree_in_errors(mut self, show: bool) -> Self {
        self.show_tree_in_errors = show;
        self
    }

    /// Whether text queries skip this tag
    #[must_use]
    pub fn ignores(&self, tag: &str) -> bool {
        self.ignore_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QueryConfig::default();
        assert_eq!(config.test_id_attribute, "data-testid");
        assert!(config.ignores("script"));
        assert!(config.ignores("STYLE"));
        assert!(!config.ignores("div"));
        assert!(!config.include_hidden);
        assert!(config.show_tree_in_errors);
    }

    #[test]
    fn test_builder() {
        let config = QueryConfig::new()
            .with_test_id_attribute("data-qa")
            .with_ignore_tags(["noscript"])
            .with_include_hidden(true)
            .with_tree_in_errors(false);
        assert_eq!(config.test_id_attribute, "data-qa");
        assert!(config.ignores("noscript"));
        assert!(!config.ignores("script"));
        assert!(config.include_hidden);
        assert!(!config.show_tree_in_errors);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: QueryConfig = serde_json::from_str(r#"{"include_hidden": true}"#).unwrap();
        assert!(config.include_hidden);
        assert_eq!(config.test_id_attribute, DEFAULT_TEST_ID_ATTRIBUTE);
    }
}
