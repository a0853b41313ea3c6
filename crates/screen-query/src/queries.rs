//! Query facade with cardinality enforcement.
//!
//! Every strategy comes in four flavours:
//!
//! | prefix         | 0 matches     | 1 match    | >1 matches        |
//! |----------------|---------------|------------|-------------------|
//! | `get_by_*`     | `NotFound`    | node       | `MultipleMatches` |
//! | `query_by_*`   | `None`        | `Some`     | `MultipleMatches` |
//! | `get_all_by_*` | `NotFound`    | all        | all               |
//! | `query_all_by_*` | empty       | all        | all               |

use crate::config::QueryConfig;
use crate::element::{Element, TagKind};
use crate::matcher::{match_all, MatchResult, Query, RoleOptions};
use crate::result::{QueryError, QueryResult};
use crate::snapshot::{Node, NodeId, Snapshot};
use crate::text_match::TextMatch;

macro_rules! pattern_queries {
    ($($label:literal => $ctor:ident: $get:ident, $query:ident, $get_all:ident, $query_all:ident;)*) => {
        $(
            #[doc = concat!("The single element ", $label, "; fails on zero or several matches")]
            fn $get(&self, pattern: impl Into<TextMatch>) -> QueryResult<&Node> {
                self.get(&Query::$ctor(pattern))
            }

            #[doc = concat!("The element ", $label, " if any; fails on several matches")]
            fn $query(&self, pattern: impl Into<TextMatch>) -> QueryResult<Option<&Node>> {
                self.query(&Query::$ctor(pattern))
            }

            #[doc = concat!("Every element ", $label, "; fails when there are none")]
            fn $get_all(&self, pattern: impl Into<TextMatch>) -> QueryResult<MatchResult<'_>> {
                self.get_all(&Query::$ctor(pattern))
            }

            #[doc = concat!("Every element ", $label, "; never fails")]
            fn $query_all(&self, pattern: impl Into<TextMatch>) -> MatchResult<'_> {
                self.query_all(&Query::$ctor(pattern))
            }
        )*
    };
}

/// Queries over a scope of a rendered snapshot.
///
/// Implementors only supply the snapshot, the scope root and the
/// configuration; every query operation is provided.
pub trait Queries {
    /// Snapshot being queried
    fn snapshot(&self) -> &Snapshot;

    /// Queries only see strict descendants of this node
    fn scope_root(&self) -> NodeId;

    /// Query configuration
    fn config(&self) -> &QueryConfig;

    /// Every match; never fails
    fn query_all(&self, query: &Query) -> MatchResult<'_> {
        match_all(self.snapshot(), self.scope_root(), query, self.config())
    }

    /// Zero or one match
    fn query(&self, query: &Query) -> QueryResult<Option<&Node>> {
        let found = self.query_all(query);
        if found.len() > 1 {
            return Err(multiple_matches(query, &found));
        }
        Ok(found.first())
    }

    /// Exactly one match
    fn get(&self, query: &Query) -> QueryResult<&Node> {
        match self.query(query)? {
            Some(node) => Ok(node),
            None => Err(not_found(self, query)),
        }
    }

    /// One or more matches
    fn get_all(&self, query: &Query) -> QueryResult<MatchResult<'_>> {
        let found = self.query_all(query);
        if found.is_empty() {
            return Err(not_found(self, query));
        }
        Ok(found)
    }

    pattern_queries! {
        "by text" => text: get_by_text, query_by_text, get_all_by_text, query_all_by_text;
        "by label text" => label_text: get_by_label_text, query_by_label_text, get_all_by_label_text, query_all_by_label_text;
        "by placeholder text" => placeholder_text: get_by_placeholder_text, query_by_placeholder_text, get_all_by_placeholder_text, query_all_by_placeholder_text;
        "by test id" => test_id: get_by_test_id, query_by_test_id, get_all_by_test_id, query_all_by_test_id;
        "by alt text" => alt_text: get_by_alt_text, query_by_alt_text, get_all_by_alt_text, query_all_by_alt_text;
        "by title" => title: get_by_title, query_by_title, get_all_by_title, query_all_by_title;
        "by display value" => display_value: get_by_display_value, query_by_display_value, get_all_by_display_value, query_all_by_display_value;
    }

    /// The single element with this role; fails on zero or several matches
    fn get_by_role(&self, role: &str, options: RoleOptions) -> QueryResult<&Node> {
        self.get(&Query::role(role, options))
    }

    /// The element with this role if any; fails on several matches
    fn query_by_role(&self, role: &str, options: RoleOptions) -> QueryResult<Option<&Node>> {
        self.query(&Query::role(role, options))
    }

    /// Every element with this role; fails when there are none
    fn get_all_by_role(&self, role: &str, options: RoleOptions) -> QueryResult<MatchResult<'_>> {
        self.get_all(&Query::role(role, options))
    }

    /// Every element with this role; never fails
    fn query_all_by_role(&self, role: &str, options: RoleOptions) -> MatchResult<'_> {
        self.query_all(&Query::role(role, options))
    }

    /// Narrow queries to the subtree below `node`
    fn within(&self, node: &Node) -> Within<'_> {
        Within {
            snapshot: self.snapshot(),
            root: node.id(),
            config: self.config(),
        }
    }

    /// Accessible roles in scope with their nodes, ordered by first occurrence
    fn roles(&self) -> Vec<(&str, Vec<&Node>)> {
        collect_roles(self, self.config().include_hidden)
    }

    /// Pretty-printed scope, also emitted as a debug log event
    fn debug(&self) -> String {
        let tree = self.snapshot().pretty_from(self.scope_root());
        tracing::debug!(scope = %self.scope_root(), tree = %tree, "scope tree");
        tree
    }
}

fn collect_roles<Q: Queries + ?Sized>(
    scope: &Q,
    include_hidden: bool,
) -> Vec<(&str, Vec<&Node>)> {
    let mut roles: Vec<(&str, Vec<&Node>)> = Vec::new();
    for node in scope.snapshot().descendants(scope.scope_root()) {
        if node.is_hidden() && !include_hidden {
            continue;
        }
        let Some(role) = node.role() else { continue };
        match roles.iter_mut().find(|(r, _)| *r == role) {
            Some((_, nodes)) => nodes.push(node),
            None => roles.push((role, vec![node])),
        }
    }
    roles
}

fn multiple_matches(query: &Query, found: &MatchResult<'_>) -> QueryError {
    QueryError::MultipleMatches {
        query: query.to_string(),
        count: found.len(),
        matches: found.iter().map(Node::describe).collect(),
    }
}

fn not_found<Q: Queries + ?Sized>(scope: &Q, query: &Query) -> QueryError {
    let hint = match query {
        Query::LabelText(pattern) => unassociated_label_hint(scope, pattern),
        Query::Role { options, .. } => Some(roles_hint(
            scope,
            options.hidden.unwrap_or(scope.config().include_hidden),
        )),
        _ => None,
    };
    let tree = scope
        .config()
        .show_tree_in_errors
        .then(|| scope.snapshot().pretty_from(scope.scope_root()));
    QueryError::NotFound {
        query: query.to_string(),
        hint,
        tree,
    }
}

fn unassociated_label_hint<Q: Queries + ?Sized>(scope: &Q, pattern: &TextMatch) -> Option<String> {
    scope
        .snapshot()
        .descendants(scope.scope_root())
        .iter()
        .any(|n| n.tag() == &TagKind::Label && pattern.matches(&n.normalized_text()))
        .then(|| {
            format!(
                "Found a label with the text of: {pattern}, however no form control was \
                 found associated to that label. Make sure the \"for\" attribute or \
                 \"aria-labelledby\" attribute is used correctly."
            )
        })
}

fn roles_hint<Q: Queries + ?Sized>(scope: &Q, include_hidden: bool) -> String {
    let roles = collect_roles(scope, include_hidden);
    if roles.is_empty() {
        return "There are no accessible roles.".to_string();
    }
    let mut hint = String::from("Accessible roles present:");
    for (role, nodes) in roles {
        let names: Vec<String> = nodes
            .iter()
            .map(|n| format!("{:?}", n.accessible_name()))
            .collect();
        hint.push_str(&format!("\n  {role}: name {}", names.join(", ")));
    }
    hint
}

/// A rendered snapshot plus the configuration its queries use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screen {
    snapshot: Snapshot,
    config: QueryConfig,
}

impl Screen {
    /// Wrap an existing snapshot
    #[must_use]
    pub const fn new(snapshot: Snapshot, config: QueryConfig) -> Self {
        Self { snapshot, config }
    }

    /// Render an element tree with the default configuration
    #[must_use]
    pub fn render(element: &Element) -> Self {
        Self::new(Snapshot::render(element), QueryConfig::default())
    }

    /// Replace the configuration
    #[must_use]
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// Take the snapshot back
    #[must_use]
    pub fn into_snapshot(self) -> Snapshot {
        self.snapshot
    }
}

impl Queries for Screen {
    fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    fn scope_root(&self) -> NodeId {
        NodeId::ROOT
    }

    fn config(&self) -> &QueryConfig {
        &self.config
    }
}

/// Queries scoped to one subtree (see [`Queries::within`])
#[derive(Debug, Clone, Copy)]
pub struct Within<'a> {
    snapshot: &'a Snapshot,
    root: NodeId,
    config: &'a QueryConfig,
}

impl Queries for Within<'_> {
    fn snapshot(&self) -> &Snapshot {
        self.snapshot
    }

    fn scope_root(&self) -> NodeId {
        self.root
    }

    fn config(&self) -> &QueryConfig {
        self.config
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn screen() -> Screen {
        Screen::render(&Element::fragment().children([
            Element::new("section").with_test_id("first").children([
                Element::new("h2").text("Account"),
                Element::new("button").text("Save"),
            ]),
            Element::new("section").with_test_id("second").children([
                Element::new("h2").text("Profile"),
                Element::new("button").text("Save"),
                Element::new("label").text("Orphan"),
            ]),
        ]))
    }

    mod cardinality_tests {
        use super::*;

        #[test]
        fn test_get_single_match() {
            let s = screen();
            let heading = s.get_by_text("Account").unwrap();
            assert_eq!(heading.tag(), &TagKind::Heading(2));
        }

        #[test]
        fn test_get_zero_matches_is_not_found() {
            let err = screen().get_by_text("Nonexistent").unwrap_err();
            assert!(err.is_not_found());
            assert!(err.to_string().contains("by text \"Nonexistent\""));
            assert!(err.to_string().contains("<body>"));
        }

        #[test]
        fn test_get_multiple_matches_lists_all() {
            let err = screen().get_by_text("Save").unwrap_err();
            match err {
                QueryError::MultipleMatches { count, matches, .. } => {
                    assert_eq!(count, 2);
                    assert_eq!(matches, ["<button />", "<button />"]);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_query_zero_is_none() {
            assert!(screen().query_by_text("Nonexistent").unwrap().is_none());
        }

        #[test]
        fn test_query_multiple_still_fails() {
            assert!(screen().query_by_text("Save").unwrap_err().is_multiple_matches());
        }

        #[test]
        fn test_get_all_and_query_all() {
            let s = screen();
            assert_eq!(s.get_all_by_text("Save").unwrap().len(), 2);
            assert!(s.get_all_by_text("Nope").unwrap_err().is_not_found());
            assert!(s.query_all_by_text("Nope").is_empty());
        }

        #[test]
        fn test_tree_can_be_left_out_of_errors() {
            let s = screen().with_config(QueryConfig::default().with_tree_in_errors(false));
            let err = s.get_by_test_id("missing").unwrap_err();
            assert_eq!(err.to_string(), "Unable to find an element by test id \"missing\"");
        }
    }

    mod within_tests {
        use super::*;

        #[test]
        fn test_within_disambiguates() {
            let s = screen();
            let second = s.get_by_test_id("second").unwrap();
            let scoped = s.within(second);
            let save = scoped.get_by_role("button", RoleOptions::new()).unwrap();
            assert!(s.snapshot().is_ancestor(second.id(), save.id()));
        }

        #[test]
        fn test_within_excludes_container_itself() {
            let s = screen();
            let first = s.get_by_test_id("first").unwrap();
            assert!(s.within(first).query_by_test_id("first").unwrap().is_none());
        }
    }

    mod hint_tests {
        use super::*;

        #[test]
        fn test_role_not_found_lists_roles() {
            let err = screen()
                .get_by_role("textbox", RoleOptions::new())
                .unwrap_err()
                .to_string();
            assert!(err.contains("Accessible roles present:"));
            assert!(err.contains("heading: name \"Account\", \"Profile\""));
            assert!(err.contains("button: name \"Save\", \"Save\""));
        }

        #[test]
        fn test_orphan_label_hint() {
            let err = screen().get_by_label_text("Orphan").unwrap_err().to_string();
            assert!(err.contains("Found a label with the text of: \"Orphan\""));
        }

        #[test]
        fn test_roles_hint_follows_hidden_option() {
            let s = Screen::render(
                &Element::new("div")
                    .attr("hidden", "")
                    .child(Element::new("button").text("Ghost")),
            );
            let default = s
                .get_by_role("textbox", RoleOptions::new())
                .unwrap_err()
                .to_string();
            assert!(default.contains("There are no accessible roles."));

            let with_hidden = s
                .get_by_role("textbox", RoleOptions::new().hidden(true))
                .unwrap_err()
                .to_string();
            assert!(with_hidden.contains("button: name \"Ghost\""));
        }
    }

    mod roles_tests {
        use super::*;

        #[test]
        fn test_roles_in_first_occurrence_order() {
            let s = screen();
            let roles: Vec<_> = s.roles().iter().map(|(r, n)| (*r, n.len())).collect();
            assert_eq!(roles, [("region", 2), ("heading", 2), ("button", 2)]);
        }

        #[test]
        fn test_debug_returns_scope_tree() {
            let s = screen();
            let first = s.get_by_test_id("first").unwrap();
            let tree = s.within(first).debug();
            assert!(tree.starts_with("<section data-testid=\"first\">"));
            assert!(!tree.contains("Profile"));
        }
    }

    #[test]
    fn test_screen_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Screen>();
    }
}
