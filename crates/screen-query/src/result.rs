//! Result and error types for screen-query.

use thiserror::Error;

/// Result type for query operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors that can occur while querying a rendered snapshot
#[derive(Debug, Error)]
pub enum QueryError {
    /// A single-match query found nothing
    #[error("Unable to find an element {query}{}{}", hint_suffix(.hint), tree_suffix(.tree))]
    NotFound {
        /// Description of the query, e.g. `by role "textbox" and name "Name"`
        query: String,
        /// Extra guidance for the caller (roles present, unlabelled labels)
        hint: Option<String>,
        /// Pretty-printed tree of the queried scope
        tree: Option<String>,
    },

    /// A single-match query found more than one element
    #[error(
        "Found multiple elements {query} ({count} matches):\n{}",
        .matches.join("\n")
    )]
    MultipleMatches {
        /// Description of the query
        query: String,
        /// Number of matches
        count: usize,
        /// Every matched element rendered as markup, in document order
        matches: Vec<String>,
    },

    /// The pattern could not be compiled
    #[error("Invalid pattern {pattern}: {message}")]
    InvalidPattern {
        /// Pattern source as supplied
        pattern: String,
        /// Compiler message
        message: String,
    },

    /// A node id does not belong to the snapshot
    #[error("Node {id} is not part of this snapshot")]
    UnknownNode {
        /// Offending id
        id: usize,
    },

    /// Assertion failed (from `Verdict::into_result`)
    #[error("Assertion failed: {message}")]
    AssertionFailed {
        /// Error message
        message: String,
    },

    /// A demo fixture name was not recognised
    #[error("Unknown fixture '{name}' (available: {available})")]
    UnknownFixture {
        /// Name as supplied
        name: String,
        /// Accepted names, comma separated
        available: String,
    },

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueryError {
    /// Create an invalid pattern error
    #[must_use]
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }

    /// Whether this is a zero-match failure
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Whether this is a too-many-matches failure
    #[must_use]
    pub const fn is_multiple_matches(&self) -> bool {
        matches!(self, Self::MultipleMatches { .. })
    }
}

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_ref().map_or_else(String::new, |h| format!("\n\n{h}"))
}

fn tree_suffix(tree: &Option<String>) -> String {
    tree.as_ref()
        .map_or_else(String::new, |t| format!("\n\n{}", t.trim_end()))
}
