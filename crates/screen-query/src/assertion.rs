//! Assertions over query results.
//!
//! Predicates return a [`Verdict`] instead of panicking so callers can decide
//! whether a failure aborts the test ([`Verdict::assert`]), propagates
//! ([`Verdict::into_result`]) or is merely reported.

use crate::matcher::MatchResult;
use crate::result::{QueryError, QueryResult};
use crate::snapshot::Node;
use crate::text_match::{normalize, TextMatch};

/// Outcome of an assertion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the assertion passed
    pub passed: bool,
    /// Expected vs actual; empty when passed
    pub message: String,
}

impl Verdict {
    /// Create a passing verdict
    #[must_use]
    pub const fn pass() -> Self {
        Self {
            passed: true,
            message: String::new(),
        }
    }

    /// Create a failing verdict
    #[must_use]
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            message: message.into(),
        }
    }

    fn check(passed: bool, message: impl FnOnce() -> String) -> Self {
        if passed {
            Self::pass()
        } else {
            Self::fail(message())
        }
    }

    /// Convert to a result, failures becoming [`QueryError::AssertionFailed`]
    pub fn into_result(self) -> QueryResult<()> {
        if self.passed {
            Ok(())
        } else {
            Err(QueryError::AssertionFailed {
                message: self.message,
            })
        }
    }

    /// Panic with the failure message
    #[track_caller]
    pub fn assert(self) {
        assert!(self.passed, "{}", self.message);
    }
}

/// Assertion predicates
#[derive(Debug, Clone, Copy, Default)]
pub struct Assertion;

impl Assertion {
    /// The element was found
    #[must_use]
    pub fn is_present(node: Option<&Node>) -> Verdict {
        Verdict::check(node.is_some(), || {
            "expected element to be in the document, but it was not found".to_string()
        })
    }

    /// The element was not found
    #[must_use]
    pub fn is_absent(node: Option<&Node>) -> Verdict {
        match node {
            None => Verdict::pass(),
            Some(node) => Verdict::fail(format!(
                "expected element not to be in the document, but found {}",
                node.describe()
            )),
        }
    }

    /// Normalized full text content matches
    #[must_use]
    pub fn has_text_content(node: &Node, expected: impl Into<TextMatch>) -> Verdict {
        let expected = expected.into();
        let actual = node.normalized_text();
        Verdict::check(expected.matches(&actual), || {
            format!(
                "expected {} to have text content {expected}, got {actual:?}",
                node.describe()
            )
        })
    }

    /// Normalized full text content contains `needle`
    #[must_use]
    pub fn contains_text(node: &Node, needle: &str) -> Verdict {
        let actual = node.normalized_text();
        Verdict::check(actual.contains(&normalize(needle)), || {
            format!(
                "expected {} to contain text {needle:?}, got {actual:?}",
                node.describe()
            )
        })
    }

    /// Attribute is present, optionally with a given value
    #[must_use]
    pub fn has_attribute(node: &Node, name: &str, value: Option<&str>) -> Verdict {
        let actual = node.attribute(name);
        match (actual, value) {
            (None, _) => Verdict::fail(format!(
                "expected {} to have attribute {name:?}",
                node.describe()
            )),
            (Some(actual), Some(expected)) if actual != expected => Verdict::fail(format!(
                "expected attribute {name:?} to be {expected:?}, got {actual:?}"
            )),
            _ => Verdict::pass(),
        }
    }

    /// Effective role equals `role`
    #[must_use]
    pub fn has_role(node: &Node, role: &str) -> Verdict {
        let actual = node.role();
        Verdict::check(actual == Some(role), || match actual {
            Some(actual) => format!("expected role {role:?}, got {actual:?}"),
            None => format!("expected role {role:?}, got no role"),
        })
    }

    /// Accessible name matches
    #[must_use]
    pub fn has_accessible_name(node: &Node, expected: impl Into<TextMatch>) -> Verdict {
        let expected = expected.into();
        let actual = node.accessible_name();
        Verdict::check(expected.matches(actual), || {
            format!("expected accessible name {expected}, got {actual:?}")
        })
    }

    /// Checkbox or radio is checked
    #[must_use]
    pub fn is_checked(node: &Node) -> Verdict {
        Verdict::check(node.is_checked(), || {
            format!("expected {} to be checked", node.describe())
        })
    }

    /// Control is disabled
    #[must_use]
    pub fn is_disabled(node: &Node) -> Verdict {
        Verdict::check(node.is_disabled(), || {
            format!("expected {} to be disabled", node.describe())
        })
    }

    /// Number of matches
    #[must_use]
    pub fn has_count(found: &MatchResult<'_>, expected: usize) -> Verdict {
        Verdict::check(found.len() == expected, || {
            format!("expected {expected} matching elements, got {}", found.len())
        })
    }
}

/// Fluent assertions on a query result
#[derive(Debug, Clone, Copy)]
pub struct Expect<'a> {
    node: Option<&'a Node>,
}

impl<'a> Expect<'a> {
    /// Create an expectation
    #[must_use]
    pub const fn new(node: Option<&'a Node>) -> Self {
        Self { node }
    }

    /// The element exists
    #[must_use]
    pub fn to_be_in_the_document(&self) -> Verdict {
        Assertion::is_present(self.node)
    }

    /// The element does not exist
    #[must_use]
    pub fn not_to_be_in_the_document(&self) -> Verdict {
        Assertion::is_absent(self.node)
    }

    /// See [`Assertion::has_text_content`]
    #[must_use]
    pub fn to_have_text_content(&self, expected: impl Into<TextMatch>) -> Verdict {
        self.with_node(|n| Assertion::has_text_content(n, expected))
    }

    /// See [`Assertion::contains_text`]
    #[must_use]
    pub fn to_contain_text(&self, needle: &str) -> Verdict {
        self.with_node(|n| Assertion::contains_text(n, needle))
    }

    /// See [`Assertion::has_attribute`]
    #[must_use]
    pub fn to_have_attribute(&self, name: &str, value: Option<&str>) -> Verdict {
        self.with_node(|n| Assertion::has_attribute(n, name, value))
    }

    /// See [`Assertion::has_role`]
    #[must_use]
    pub fn to_have_role(&self, role: &str) -> Verdict {
        self.with_node(|n| Assertion::has_role(n, role))
    }

    /// See [`Assertion::has_accessible_name`]
    #[must_use]
    pub fn to_have_accessible_name(&self, expected: impl Into<TextMatch>) -> Verdict {
        self.with_node(|n| Assertion::has_accessible_name(n, expected))
    }

    /// See [`Assertion::is_checked`]
    #[must_use]
    pub fn to_be_checked(&self) -> Verdict {
        self.with_node(Assertion::is_checked)
    }

    /// See [`Assertion::is_disabled`]
    #[must_use]
    pub fn to_be_disabled(&self) -> Verdict {
        self.with_node(Assertion::is_disabled)
    }

    fn with_node(&self, check: impl FnOnce(&Node) -> Verdict) -> Verdict {
        match self.node {
            Some(node) => check(node),
            None => Assertion::is_present(None),
        }
    }
}

/// Start a fluent assertion
///
/// Accepts a node or an optional node, so both `get_by_*` and `query_by_*`
/// results can be passed directly.
#[must_use]
pub fn expect<'a>(node: impl Into<Option<&'a Node>>) -> Expect<'a> {
    Expect::new(node.into())
}
