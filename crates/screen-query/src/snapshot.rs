//! Immutable rendered element trees.
//!
//! [`Snapshot::render`] flattens an [`Element`] description into an arena of
//! [`Node`]s in document order and precomputes everything the matchers need:
//! text content, label associations, roles, accessible names and visibility.
//! A snapshot is never mutated; rendering again produces a new one.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::element::{Content, Element, TagKind};
use crate::result::{QueryError, QueryResult};
use crate::role::{effective_role, implicit_role, is_labelable, names_from_content};
use crate::text_match::normalize;

/// Position of a node in document order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    /// The render container
    pub const ROOT: Self = Self(0);

    /// Document-order index
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Ordered child content of a node, text interleaved with elements
#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Text(String),
    Node(NodeId),
}

/// A rendered element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    id: NodeId,
    tag: TagKind,
    attributes: BTreeMap<String, String>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    #[serde(skip)]
    content: Vec<Segment>,
    #[serde(skip)]
    subtree_end: usize,
    own_text: String,
    text_content: String,
    labels: Vec<String>,
    labelledby: Option<String>,
    implicit_role: Option<&'static str>,
    accessible_name: String,
    display_value: Option<String>,
    hidden: bool,
}

impl Node {
    /// Node id
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// Element kind
    #[must_use]
    pub const fn tag(&self) -> &TagKind {
        &self.tag
    }

    /// All attributes
    #[must_use]
    pub const fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    /// A single attribute value
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child elements in render order
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Parent element, `None` for the container
    #[must_use]
    pub const fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Normalized text of this element's direct text children
    #[must_use]
    pub fn own_text(&self) -> &str {
        &self.own_text
    }

    /// Raw concatenated text of all descendants
    #[must_use]
    pub fn text_content(&self) -> &str {
        &self.text_content
    }

    /// Whitespace-normalized [`Self::text_content`]
    #[must_use]
    pub fn normalized_text(&self) -> String {
        normalize(&self.text_content)
    }

    /// Text of every label associated with this control, in document order
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// All associated label texts joined by a space
    #[must_use]
    pub fn associated_label_text(&self) -> Option<String> {
        if self.labels.is_empty() {
            None
        } else {
            Some(self.labels.join(" "))
        }
    }

    /// Role implied by the tag alone
    #[must_use]
    pub const fn implicit_role(&self) -> Option<&'static str> {
        self.implicit_role
    }

    /// Role after applying an explicit `role` attribute
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        effective_role(self.implicit_role, &self.attributes)
    }

    /// Computed accessible name (empty when none applies)
    #[must_use]
    pub fn accessible_name(&self) -> &str {
        &self.accessible_name
    }

    /// Current value of a form control
    #[must_use]
    pub fn display_value(&self) -> Option<&str> {
        self.display_value.as_deref()
    }

    /// Excluded from the accessibility tree (`hidden` / `aria-hidden`, inherited)
    #[must_use]
    pub const fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Checked checkbox or radio
    #[must_use]
    pub fn is_checked(&self) -> bool {
        self.attributes.contains_key("checked") || self.attribute("aria-checked") == Some("true")
    }

    /// Disabled control
    #[must_use]
    pub fn is_disabled(&self) -> bool {
        self.attributes.contains_key("disabled")
            || self.attribute("aria-disabled") == Some("true")
    }

    /// Opening tag with serialized attributes, e.g. `<input id="name" type="text" />`
    #[must_use]
    pub fn describe(&self) -> String {
        format!("<{}{} />", self.tag, self.attribute_markup())
    }

    fn attribute_markup(&self) -> String {
        self.attributes
            .iter()
            .map(|(k, v)| {
                if v.is_empty() {
                    format!(" {k}")
                } else {
                    format!(" {k}=\"{}\"", v.replace('"', "&quot;"))
                }
            })
            .collect()
    }
}

/// An immutable, fully indexed render of an element tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    nodes: Vec<Node>,
}

impl Snapshot {
    /// Render an element description.
    ///
    /// The tree is mounted under a `body` container unless its root already
    /// is a `body`. Fragments are spliced into their parent.
    #[must_use]
    pub fn render(element: &Element) -> Self {
        let mut builder = Builder::default();
        if element.tag == TagKind::Body {
            builder.push_element(element, None);
        } else {
            let root = builder.open(&TagKind::Body, &BTreeMap::new(), None);
            builder.push_child(element, root);
            builder.nodes[root.0].subtree_end = builder.nodes.len();
        }
        let snapshot = builder.finish();
        tracing::trace!(nodes = snapshot.nodes.len(), "rendered snapshot");
        snapshot
    }

    /// The render container
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.nodes[0]
    }

    /// Look up a node
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Look up a node, failing for foreign ids
    pub fn get(&self, id: NodeId) -> QueryResult<&Node> {
        self.node(id)
            .ok_or(QueryError::UnknownNode { id: id.index() })
    }

    /// Every node in document order
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes, container included
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: the container is always present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The node and all of its descendants, in document order
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> &[Node] {
        match self.node(id) {
            Some(node) => &self.nodes[id.0..node.subtree_end],
            None => &[],
        }
    }

    /// Descendants of a node (the node itself excluded), in document order
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> &[Node] {
        self.subtree(id).get(1..).unwrap_or_default()
    }

    /// Whether `ancestor` strictly contains `node`
    #[must_use]
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.node(ancestor)
            .is_some_and(|a| node.0 > ancestor.0 && node.0 < a.subtree_end)
    }

    /// First node whose `id` attribute equals `value`
    #[must_use]
    pub fn element_by_id(&self, value: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.attribute("id") == Some(value))
    }

    /// Markup description of a node
    pub fn describe(&self, id: NodeId) -> QueryResult<String> {
        Ok(self.get(id)?.describe())
    }

    /// Indented markup of the whole tree
    #[must_use]
    pub fn pretty(&self) -> String {
        self.pretty_from(NodeId::ROOT)
    }

    /// Indented markup of one subtree
    #[must_use]
    pub fn pretty_from(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(node) = self.node(id) {
            self.write_pretty(node, 0, &mut out);
        }
        out
    }

    fn write_pretty(&self, node: &Node, depth: usize, out: &mut String) {
        let indent = "  ".repeat(depth);
        let has_content = node.content.iter().any(|segment| match segment {
            Segment::Text(t) => !t.trim().is_empty(),
            Segment::Node(_) => true,
        });
        if !has_content {
            out.push_str(&format!("{indent}{}\n", node.describe()));
            return;
        }

        out.push_str(&format!("{indent}<{}{}>\n", node.tag, node.attribute_markup()));
        for segment in &node.content {
            match segment {
                Segment::Text(text) => {
                    let text = normalize(text);
                    if !text.is_empty() {
                        out.push_str(&format!("{indent}  {text}\n"));
                    }
                }
                Segment::Node(child) => self.write_pretty(&self.nodes[child.0], depth + 1, out),
            }
        }
        out.push_str(&format!("{indent}</{}>\n", node.tag));
    }
}

#[derive(Default)]
struct Builder {
    nodes: Vec<Node>,
}

impl Builder {
    fn open(
        &mut self,
        tag: &TagKind,
        attributes: &BTreeMap<String, String>,
        parent: Option<NodeId>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            id,
            tag: tag.clone(),
            attributes: attributes.clone(),
            children: Vec::new(),
            parent,
            content: Vec::new(),
            subtree_end: id.0 + 1,
            own_text: String::new(),
            text_content: String::new(),
            labels: Vec::new(),
            labelledby: None,
            implicit_role: implicit_role(tag, attributes),
            accessible_name: String::new(),
            display_value: None,
            hidden: false,
        });
        if let Some(parent) = parent {
            let p = &mut self.nodes[parent.0];
            p.children.push(id);
            p.content.push(Segment::Node(id));
        }
        id
    }

    fn push_element(&mut self, element: &Element, parent: Option<NodeId>) -> NodeId {
        let id = self.open(&element.tag, &element.attributes, parent);
        for child in &element.children {
            self.push_content(child, id);
        }
        self.nodes[id.0].subtree_end = self.nodes.len();
        id
    }

    fn push_content(&mut self, content: &Content, parent: NodeId) {
        match content {
            Content::Text(text) => self.nodes[parent.0]
                .content
                .push(Segment::Text(text.clone())),
            Content::Element(el) => self.push_child(el, parent),
        }
    }

    fn push_child(&mut self, element: &Element, parent: NodeId) {
        if element.tag == TagKind::Fragment {
            for child in &element.children {
                self.push_content(child, parent);
            }
        } else {
            self.push_element(element, Some(parent));
        }
    }

    fn finish(mut self) -> Snapshot {
        self.compute_text();
        self.compute_hidden();
        self.compute_labels();
        self.compute_names();
        self.compute_display_values();
        Snapshot { nodes: self.nodes }
    }

    /// Children always follow their parent, so a reverse sweep sees them first.
    fn compute_text(&mut self) {
        for index in (0..self.nodes.len()).rev() {
            let mut own = String::new();
            let mut all = String::new();
            for segment in &self.nodes[index].content {
                match segment {
                    Segment::Text(t) => {
                        own.push_str(t);
                        all.push_str(t);
                    }
                    Segment::Node(child) => all.push_str(&self.nodes[child.0].text_content),
                }
            }
            let node = &mut self.nodes[index];
            node.own_text = normalize(&own);
            node.text_content = all;
        }
    }

    fn compute_hidden(&mut self) {
        for index in 0..self.nodes.len() {
            let inherited = self.nodes[index]
                .parent
                .is_some_and(|p| self.nodes[p.0].hidden);
            let node = &mut self.nodes[index];
            node.hidden = inherited
                || node.attributes.contains_key("hidden")
                || node.attribute("aria-hidden") == Some("true");
        }
    }

    fn compute_labels(&mut self) {
        let mut by_id: HashMap<String, NodeId> = HashMap::new();
        for node in &self.nodes {
            if let Some(value) = node.attribute("id") {
                by_id.entry(value.to_string()).or_insert(node.id);
            }
        }

        let mut associations: Vec<(NodeId, String)> = Vec::new();
        for node in &self.nodes {
            if node.tag == TagKind::Label {
                let text = normalize(&self.label_text(node.id));
                if text.is_empty() {
                    continue;
                }
                let target = match node.attribute("for") {
                    Some(for_id) => by_id
                        .get(for_id)
                        .copied()
                        .filter(|t| self.labelable(*t)),
                    None => (node.id.0 + 1..node.subtree_end)
                        .map(NodeId)
                        .find(|t| self.labelable(*t)),
                };
                if let Some(target) = target {
                    associations.push((target, text));
                }
            }
        }

        let mut referenced: Vec<(NodeId, String)> = Vec::new();
        for node in &self.nodes {
            if let Some(refs) = node.attribute("aria-labelledby") {
                let text = refs
                    .split_whitespace()
                    .filter_map(|r| by_id.get(r))
                    .map(|r| normalize(&self.nodes[r.0].text_content))
                    .filter(|t| !t.is_empty())
                    .collect::<Vec<_>>()
                    .join(" ");
                if !text.is_empty() {
                    referenced.push((node.id, text));
                }
            }
        }

        for (target, text) in &referenced {
            self.nodes[target.0].labelledby = Some(text.clone());
        }
        associations.extend(referenced);
        associations.sort_by_key(|(target, _)| *target);
        for (target, text) in associations {
            self.nodes[target.0].labels.push(text);
        }
    }

    fn labelable(&self, id: NodeId) -> bool {
        let node = &self.nodes[id.0];
        is_labelable(&node.tag, &node.attributes)
    }

    /// Label text without the text of controls nested inside the label.
    fn label_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for segment in &self.nodes[id.0].content {
            match segment {
                Segment::Text(t) => out.push_str(t),
                Segment::Node(child) if self.labelable(*child) => {}
                Segment::Node(child) => out.push_str(&self.label_text(*child)),
            }
        }
        out
    }

    fn compute_names(&mut self) {
        for index in 0..self.nodes.len() {
            let name = self.accessible_name(&self.nodes[index]);
            self.nodes[index].accessible_name = name;
        }
    }

    fn accessible_name(&self, node: &Node) -> String {
        if let Some(text) = &node.labelledby {
            return text.clone();
        }
        let candidates = [
            node.attribute("aria-label").map(normalize),
            node.associated_label_text(),
            matches!(node.tag, TagKind::Img | TagKind::Input)
                .then(|| node.attribute("alt").map(normalize))
                .flatten(),
            names_from_content(node.role()).then(|| normalize(&node.text_content)),
            node.attribute("title").map(normalize),
            node.attribute("placeholder").map(normalize),
        ];
        candidates
            .into_iter()
            .flatten()
            .find(|name| !name.is_empty())
            .unwrap_or_default()
    }

    fn compute_display_values(&mut self) {
        for index in 0..self.nodes.len() {
            let node = &self.nodes[index];
            let value = match node.tag {
                TagKind::Input => Some(node.attribute("value").unwrap_or_default().to_string()),
                TagKind::Textarea => Some(
                    node.attribute("value")
                        .map_or_else(|| node.text_content.clone(), str::to_string),
                ),
                TagKind::Select => self.selected_option_text(node),
                _ => None,
            };
            self.nodes[index].display_value = value;
        }
    }

    /// Text of the selected option, or the first option when none is marked.
    fn selected_option_text(&self, select: &Node) -> Option<String> {
        let options: Vec<&Node> = self.nodes[select.id.0 + 1..select.subtree_end]
            .iter()
            .filter(|n| n.tag == TagKind::Option)
            .collect();
        options
            .iter()
            .find(|o| o.attributes.contains_key("selected"))
            .or_else(|| options.first())
            .map(|o| normalize(&o.text_content))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> Element {
        Element::new("form").children([
            Element::new("label").attr("for", "name").text("Name"),
            Element::new("input").attr("type", "text").with_id("name"),
            Element::new("label").children([
                Content::from(Element::new("input").attr("type", "checkbox")),
                Content::from(" I agree to the terms and\n   conditions"),
            ]),
        ])
    }

    mod render_tests {
        use super::*;

        #[test]
        fn test_mounts_under_body_in_document_order() {
            let snap = Snapshot::render(&form());
            assert_eq!(snap.root().tag(), &TagKind::Body);
            let tags: Vec<_> = snap.nodes().iter().map(|n| n.tag().name()).collect();
            assert_eq!(tags, ["body", "form", "label", "input", "label", "input"]);
            for (i, node) in snap.nodes().iter().enumerate() {
                assert_eq!(node.id().index(), i);
            }
        }

        #[test]
        fn test_body_root_is_not_wrapped() {
            let snap = Snapshot::render(&Element::new("body").child(Element::new("p").text("x")));
            assert_eq!(snap.len(), 2);
        }

        #[test]
        fn test_fragments_are_spliced() {
            let el = Element::fragment()
                .child(Element::new("form"))
                .child(Element::new("form"));
            let snap = Snapshot::render(&el);
            assert_eq!(snap.root().children().len(), 2);
            assert!(snap.nodes().iter().all(|n| n.tag() != &TagKind::Fragment));
        }

        #[test]
        fn test_text_content_and_own_text() {
            let el = Element::new("div")
                .text("Hello ")
                .child(Element::new("span").text("World"));
            let snap = Snapshot::render(&el);
            let div = &snap.nodes()[1];
            assert_eq!(div.text_content(), "Hello World");
            assert_eq!(div.own_text(), "Hello");
        }
    }

    mod label_tests {
        use super::*;

        #[test]
        fn test_explicit_label() {
            let snap = Snapshot::render(&form());
            let input = snap.element_by_id("name").unwrap();
            assert_eq!(input.labels(), ["Name".to_string()]);
            assert_eq!(input.accessible_name(), "Name");
        }

        #[test]
        fn test_implicit_label_excludes_control_text() {
            let snap = Snapshot::render(&form());
            let checkbox = &snap.nodes()[5];
            assert_eq!(
                checkbox.associated_label_text().as_deref(),
                Some("I agree to the terms and conditions")
            );
        }

        #[test]
        fn test_for_pointing_at_non_labelable_is_ignored() {
            let el = Element::new("div").children([
                Element::new("label").attr("for", "x").text("Lost"),
                Element::new("span").with_id("x"),
            ]);
            let snap = Snapshot::render(&el);
            assert!(snap.nodes().iter().all(|n| n.labels().is_empty()));
        }

        #[test]
        fn test_aria_labelledby() {
            let el = Element::new("div").children([
                Element::new("span").with_id("a").text("Billing"),
                Element::new("span").with_id("b").text("Address"),
                Element::new("input").attr("aria-labelledby", "a b"),
            ]);
            let snap = Snapshot::render(&el);
            let input = &snap.nodes()[4];
            assert_eq!(input.accessible_name(), "Billing Address");
        }

        #[test]
        fn test_aria_labelledby_replaces_label_in_name() {
            let el = Element::new("div").children([
                Element::new("span").with_id("other").text("Other"),
                Element::new("label").attr("for", "name").text("Name"),
                Element::new("input").with_id("name").attr("aria-labelledby", "other"),
            ]);
            let snap = Snapshot::render(&el);
            let input = snap.element_by_id("name").unwrap();
            assert_eq!(input.accessible_name(), "Other");
            assert_eq!(input.labels(), ["Name".to_string(), "Other".to_string()]);
        }
    }

    mod name_tests {
        use super::*;

        #[test]
        fn test_button_named_from_content() {
            let snap = Snapshot::render(&Element::new("button").text(" Submit "));
            assert_eq!(snap.nodes()[1].accessible_name(), "Submit");
        }

        #[test]
        fn test_aria_label_beats_label() {
            let el = Element::new("div").children([
                Element::new("label").attr("for", "q").text("Query"),
                Element::new("input").with_id("q").attr("aria-label", "Search"),
            ]);
            let snap = Snapshot::render(&el);
            assert_eq!(snap.nodes()[3].accessible_name(), "Search");
        }

        #[test]
        fn test_placeholder_is_last_resort() {
            let snap = Snapshot::render(&Element::new("input").attr("placeholder", "Email"));
            assert_eq!(snap.nodes()[1].accessible_name(), "Email");
        }

        #[test]
        fn test_div_has_no_name_from_content() {
            let snap = Snapshot::render(&Element::new("div").text("Hello"));
            assert_eq!(snap.nodes()[1].accessible_name(), "");
        }
    }

    mod state_tests {
        use super::*;

        #[test]
        fn test_hidden_is_inherited() {
            let el = Element::new("div")
                .attr("aria-hidden", "true")
                .child(Element::new("button").text("x"));
            let snap = Snapshot::render(&el);
            assert!(snap.nodes()[2].is_hidden());
            assert!(!snap.root().is_hidden());
        }

        #[test]
        fn test_select_display_value() {
            let el = Element::new("select").children([
                Element::new("option").attr("value", "").text("Select a country"),
                Element::new("option").attr("value", "IN").attr("selected", "").text("India"),
            ]);
            let snap = Snapshot::render(&el);
            assert_eq!(snap.nodes()[1].display_value(), Some("India"));
        }

        #[test]
        fn test_select_defaults_to_first_option() {
            let el = Element::new("select")
                .child(Element::new("option").text("First"))
                .child(Element::new("option").text("Second"));
            let snap = Snapshot::render(&el);
            assert_eq!(snap.nodes()[1].display_value(), Some("First"));
        }

        #[test]
        fn test_checked_and_disabled() {
            let el = Element::new("input")
                .attr("type", "checkbox")
                .attr("checked", "")
                .attr("disabled", "");
            let snap = Snapshot::render(&el);
            assert!(snap.nodes()[1].is_checked());
            assert!(snap.nodes()[1].is_disabled());
        }
    }

    mod navigation_tests {
        use super::*;

        #[test]
        fn test_subtree_and_ancestry() {
            let snap = Snapshot::render(&form());
            let form_id = snap.nodes()[1].id();
            assert_eq!(snap.subtree(form_id).len(), 5);
            assert_eq!(snap.descendants(form_id).len(), 4);
            assert!(snap.is_ancestor(form_id, NodeId(5)));
            assert!(!snap.is_ancestor(NodeId(2), NodeId(3)));
            assert!(!snap.is_ancestor(form_id, form_id));
        }

        #[test]
        fn test_unknown_node() {
            let snap = Snapshot::render(&form());
            let err = snap.get(NodeId(99)).unwrap_err();
            assert!(matches!(err, QueryError::UnknownNode { id: 99 }));
            assert!(snap.subtree(NodeId(99)).is_empty());
        }
    }

    mod pretty_tests {
        use super::*;

        #[test]
        fn test_describe_serializes_attributes() {
            let snap = Snapshot::render(&Element::new("textarea").with_id("bio").attr("name", "bio"));
            assert_eq!(
                snap.describe(NodeId(1)).unwrap(),
                "<textarea id=\"bio\" name=\"bio\" />"
            );
        }

        #[test]
        fn test_pretty_indents_children() {
            let snap = Snapshot::render(&Element::new("div").text("Hello"));
            assert_eq!(snap.pretty(), "<body>\n  <div>\n    Hello\n  </div>\n</body>\n");
        }
    }
}
