//! Declarative UI descriptions.
//!
//! An [`Element`] tree is what a component renders to. It carries no layout or
//! behaviour, only tags, attributes and text, which is all the query layer
//! needs. Trees can be built in Rust or deserialized from JSON:
//!
//! ```json
//! {"tag": "label", "attributes": {"for": "name"}, "children": ["Name"]}
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Known element kinds
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TagKind {
    /// Document body, used as the render container
    Body,
    /// Grouping with no element of its own; children are spliced into the parent
    Fragment,
    /// `<div>`
    Div,
    /// `<span>`
    Span,
    /// `<p>`
    P,
    /// `<label>`
    Label,
    /// `<input>`
    Input,
    /// `<textarea>`
    Textarea,
    /// `<select>`
    Select,
    /// `<option>`
    Option,
    /// `<button>`
    Button,
    /// `<form>`
    Form,
    /// `<a>`
    A,
    /// `<img>`
    Img,
    /// `<h1>` through `<h6>`
    Heading(u8),
    /// `<ul>`
    Ul,
    /// `<ol>`
    Ol,
    /// `<li>`
    Li,
    /// `<nav>`
    Nav,
    /// `<main>`
    Main,
    /// `<header>`
    Header,
    /// `<footer>`
    Footer,
    /// `<section>`
    Section,
    /// `<article>`
    Article,
    /// `<aside>`
    Aside,
    /// `<fieldset>`
    Fieldset,
    /// `<legend>`
    Legend,
    /// `<table>`
    Table,
    /// `<tr>`
    Tr,
    /// `<td>`
    Td,
    /// `<th>`
    Th,
    /// `<script>`
    Script,
    /// `<style>`
    Style,
    /// Any other tag, stored lowercase
    Other(String),
}

impl TagKind {
    /// Lowercase tag name as it appears in markup
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Body => "body",
            Self::Fragment => "#fragment",
            Self::Div => "div",
            Self::Span => "span",
            Self::P => "p",
            Self::Label => "label",
            Self::Input => "input",
            Self::Textarea => "textarea",
            Self::Select => "select",
            Self::Option => "option",
            Self::Button => "button",
            Self::Form => "form",
            Self::A => "a",
            Self::Img => "img",
            Self::Heading(1) => "h1",
            Self::Heading(2) => "h2",
            Self::Heading(3) => "h3",
            Self::Heading(4) => "h4",
            Self::Heading(5) => "h5",
            Self::Heading(_) => "h6",
            Self::Ul => "ul",
            Self::Ol => "ol",
            Self::Li => "li",
            Self::Nav => "nav",
            Self::Main => "main",
            Self::Header => "header",
            Self::Footer => "footer",
            Self::Section => "section",
            Self::Article => "article",
            Self::Aside => "aside",
            Self::Fieldset => "fieldset",
            Self::Legend => "legend",
            Self::Table => "table",
            Self::Tr => "tr",
            Self::Td => "td",
            Self::Th => "th",
            Self::Script => "script",
            Self::Style => "style",
            Self::Other(name) => name,
        }
    }
}

impl FromStr for TagKind {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Ok(match lower.as_str() {
            "body" => Self::Body,
            "" | "#fragment" | "fragment" => Self::Fragment,
            "div" => Self::Div,
            "span" => Self::Span,
            "p" => Self::P,
            "label" => Self::Label,
            "input" => Self::Input,
            "textarea" => Self::Textarea,
            "select" => Self::Select,
            "option" => Self::Option,
            "button" => Self::Button,
            "form" => Self::Form,
            "a" => Self::A,
            "img" => Self::Img,
            "h1" => Self::Heading(1),
            "h2" => Self::Heading(2),
            "h3" => Self::Heading(3),
            "h4" => Self::Heading(4),
            "h5" => Self::Heading(5),
            "h6" => Self::Heading(6),
            "ul" => Self::Ul,
            "ol" => Self::Ol,
            "li" => Self::Li,
            "nav" => Self::Nav,
            "main" => Self::Main,
            "header" => Self::Header,
            "footer" => Self::Footer,
            "section" => Self::Section,
            "article" => Self::Article,
            "aside" => Self::Aside,
            "fieldset" => Self::Fieldset,
            "legend" => Self::Legend,
            "table" => Self::Table,
            "tr" => Self::Tr,
            "td" => Self::Td,
            "th" => Self::Th,
            "script" => Self::Script,
            "style" => Self::Style,
            _ => Self::Other(lower),
        })
    }
}

impl From<&str> for TagKind {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(tag) => tag,
            Err(never) => match never {},
        }
    }
}

impl From<String> for TagKind {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<TagKind> for String {
    fn from(tag: TagKind) -> Self {
        tag.name().to_string()
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A child of an element: either text or a nested element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Content {
    /// Text node
    Text(String),
    /// Element node
    Element(Element),
}

impl From<Element> for Content {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A declarative element description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Element kind
    pub tag: TagKind,
    /// Attributes, kept sorted for stable diagnostics
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Children in render order
    #[serde(default)]
    pub children: Vec<Content>,
}

impl Element {
    /// Create an element with no attributes or children
    #[must_use]
    pub fn new(tag: impl Into<TagKind>) -> Self {
        Self {
            tag: tag.into(),
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a fragment (`<>...</>`)
    #[must_use]
    pub fn fragment() -> Self {
        Self::new(TagKind::Fragment)
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the `id` attribute
    #[must_use]
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Set the default test id attribute (`data-testid`)
    #[must_use]
    pub fn with_test_id(self, id: impl Into<String>) -> Self {
        self.attr("data-testid", id)
    }

    /// Append a text child
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Content::Text(text.into()));
        self
    }

    /// Append an element child
    #[must_use]
    pub fn child(mut self, child: impl Into<Content>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several children
    #[must_use]
    pub fn children<I, C>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Content>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Parse an element tree from JSON
    pub fn from_json(json: &str) -> crate::QueryResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
