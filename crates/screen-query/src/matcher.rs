//! Matcher engine: strategy + pattern to every matching node.
//!
//! Matching walks the scope in document order and never stops early, so the
//! caller can enforce cardinality on the complete result.

use std::fmt;
use std::str::FromStr;

use crate::config::QueryConfig;
use crate::element::TagKind;
use crate::snapshot::{Node, NodeId, Snapshot};
use crate::text_match::{normalize, TextMatch};

/// Addressing strategy, without its pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Own text content
    Text,
    /// Associated label text or `aria-label`
    LabelText,
    /// `placeholder` attribute
    PlaceholderText,
    /// Effective ARIA role
    Role,
    /// Test identifier attribute
    TestId,
    /// `alt` attribute
    AltText,
    /// `title` attribute
    Title,
    /// Current form control value
    DisplayValue,
}

impl Strategy {
    /// All strategies
    pub const ALL: [Self; 8] = [
        Self::Text,
        Self::LabelText,
        Self::PlaceholderText,
        Self::Role,
        Self::TestId,
        Self::AltText,
        Self::Title,
        Self::DisplayValue,
    ];

    /// Short command-line name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::LabelText => "label",
            Self::PlaceholderText => "placeholder",
            Self::Role => "role",
            Self::TestId => "test-id",
            Self::AltText => "alt",
            Self::Title => "title",
            Self::DisplayValue => "display-value",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.as_str() == wanted)
            .ok_or_else(|| {
                let names: Vec<_> = Self::ALL.iter().map(|s| s.as_str()).collect();
                format!("unknown strategy '{s}', expected one of: {}", names.join(", "))
            })
    }
}

/// Extra filters for role queries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleOptions {
    /// Accessible-name filter
    pub name: Option<TextMatch>,
    /// Per-query override of [`QueryConfig::include_hidden`]
    pub hidden: Option<bool>,
}

impl RoleOptions {
    /// No filters
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by accessible name
    #[must_use]
    pub fn name(mut self, name: impl Into<TextMatch>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Include or exclude hidden elements for this query
    #[must_use]
    pub const fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }
}

/// A strategy paired with its pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    /// By own text content
    Text(TextMatch),
    /// By associated label
    LabelText(TextMatch),
    /// By placeholder
    PlaceholderText(TextMatch),
    /// By role, optionally filtered by accessible name
    Role {
        /// Role name, e.g. `textbox`
        role: String,
        /// Filters
        options: RoleOptions,
    },
    /// By test id
    TestId(TextMatch),
    /// By alt text
    AltText(TextMatch),
    /// By title
    Title(TextMatch),
    /// By form control value
    DisplayValue(TextMatch),
}

impl Query {
    /// By own text content
    #[must_use]
    pub fn text(pattern: impl Into<TextMatch>) -> Self {
        Self::Text(pattern.into())
    }

    /// By associated label
    #[must_use]
    pub fn label_text(pattern: impl Into<TextMatch>) -> Self {
        Self::LabelText(pattern.into())
    }

    /// By placeholder
    #[must_use]
    pub fn placeholder_text(pattern: impl Into<TextMatch>) -> Self {
        Self::PlaceholderText(pattern.into())
    }

    /// By role
    #[must_use]
    pub fn role(role: impl Into<String>, options: RoleOptions) -> Self {
        Self::Role {
            role: role.into(),
            options,
        }
    }

    /// By test id
    #[must_use]
    pub fn test_id(pattern: impl Into<TextMatch>) -> Self {
        Self::TestId(pattern.into())
    }

    /// By alt text
    #[must_use]
    pub fn alt_text(pattern: impl Into<TextMatch>) -> Self {
        Self::AltText(pattern.into())
    }

    /// By title
    #[must_use]
    pub fn title(pattern: impl Into<TextMatch>) -> Self {
        Self::Title(pattern.into())
    }

    /// By display value
    #[must_use]
    pub fn display_value(pattern: impl Into<TextMatch>) -> Self {
        Self::DisplayValue(pattern.into())
    }

    /// Strategy of this query
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        match self {
            Self::Text(_) => Strategy::Text,
            Self::LabelText(_) => Strategy::LabelText,
            Self::PlaceholderText(_) => Strategy::PlaceholderText,
            Self::Role { .. } => Strategy::Role,
            Self::TestId(_) => Strategy::TestId,
            Self::AltText(_) => Strategy::AltText,
            Self::Title(_) => Strategy::Title,
            Self::DisplayValue(_) => Strategy::DisplayValue,
        }
    }

    /// Whether a single node satisfies this query
    #[must_use]
    pub fn matches(&self, node: &Node, config: &QueryConfig) -> bool {
        match self {
            Self::Text(pattern) => {
                !config.ignores(node.tag().name())
                    && !node.own_text().is_empty()
                    && pattern.matches(node.own_text())
            }
            Self::LabelText(pattern) => {
                node.labels().iter().any(|label| pattern.matches(label))
                    || node
                        .attribute("aria-label")
                        .is_some_and(|label| pattern.matches(&normalize(label)))
            }
            Self::PlaceholderText(pattern) => node
                .attribute("placeholder")
                .is_some_and(|p| pattern.matches(&normalize(p))),
            Self::Role { role, options } => {
                let include_hidden = options.hidden.unwrap_or(config.include_hidden);
                (include_hidden || !node.is_hidden())
                    && node.role() == Some(role.as_str())
                    && options
                        .name
                        .as_ref()
                        .map_or(true, |name| name.matches(node.accessible_name()))
            }
            Self::TestId(pattern) => node
                .attribute(&config.test_id_attribute)
                .is_some_and(|id| pattern.matches(id)),
            Self::AltText(pattern) => {
                let carries_alt = matches!(node.tag(), TagKind::Img | TagKind::Input)
                    || node.tag().name() == "area";
                carries_alt
                    && node
                        .attribute("alt")
                        .is_some_and(|alt| pattern.matches(&normalize(alt)))
            }
            Self::Title(pattern) => node
                .attribute("title")
                .is_some_and(|title| pattern.matches(&normalize(title))),
            Self::DisplayValue(pattern) => node
                .display_value()
                .is_some_and(|value| pattern.matches(&normalize(value))),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(p) => write!(f, "by text {p}"),
            Self::LabelText(p) => write!(f, "by label text {p}"),
            Self::PlaceholderText(p) => write!(f, "by placeholder text {p}"),
            Self::Role { role, options } => {
                write!(f, "by role {role:?}")?;
                if let Some(name) = &options.name {
                    write!(f, " and name {name}")?;
                }
                Ok(())
            }
            Self::TestId(p) => write!(f, "by test id {p}"),
            Self::AltText(p) => write!(f, "by alt text {p}"),
            Self::Title(p) => write!(f, "by title {p}"),
            Self::DisplayValue(p) => write!(f, "by display value {p}"),
        }
    }
}

/// Matched nodes in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult<'a> {
    nodes: Vec<&'a Node>,
}

impl<'a> MatchResult<'a> {
    /// Wrap nodes already in document order
    #[must_use]
    pub fn new(nodes: Vec<&'a Node>) -> Self {
        Self { nodes }
    }

    /// Number of matches
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// No matches
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// First match in document order
    #[must_use]
    pub fn first(&self) -> Option<&'a Node> {
        self.nodes.first().copied()
    }

    /// Iterate over matches
    pub fn iter(&self) -> impl Iterator<Item = &'a Node> + '_ {
        self.nodes.iter().copied()
    }

    /// Matched node ids
    #[must_use]
    pub fn ids(&self) -> Vec<NodeId> {
        self.nodes.iter().map(|n| n.id()).collect()
    }

    /// Matched nodes
    #[must_use]
    pub fn nodes(&self) -> &[&'a Node] {
        &self.nodes
    }
}

impl<'a> IntoIterator for MatchResult<'a> {
    type Item = &'a Node;
    type IntoIter = std::vec::IntoIter<&'a Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

/// Every node strictly inside `scope` that satisfies `query`, in document order.
#[must_use]
pub fn match_all<'a>(
    snapshot: &'a Snapshot,
    scope: NodeId,
    query: &Query,
    config: &QueryConfig,
) -> MatchResult<'a> {
    let nodes: Vec<&Node> = snapshot
        .descendants(scope)
        .iter()
        .filter(|node| query.matches(node, config))
        .collect();
    tracing::debug!(
        strategy = %query.strategy(),
        query = %query,
        scope = %scope,
        matches = nodes.len(),
        "query evaluated"
    );
    MatchResult::new(nodes)
}
