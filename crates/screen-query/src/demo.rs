//! Bundled demo components.
//!
//! These back the CLI's `--fixture` flag and double as end-to-end coverage
//! of the query facade.

use std::fmt;
use std::str::FromStr;

use crate::component::Component;
use crate::element::Element;
use crate::result::{QueryError, QueryResult};

/// Greeting heading, optionally addressed to someone
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Greet {
    /// Who to greet
    pub name: Option<String>,
}

impl Greet {
    /// Anonymous greeting
    #[must_use]
    pub const fn new() -> Self {
        Self { name: None }
    }

    /// Greeting addressed to `name`
    #[must_use]
    pub fn with_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

impl Component for Greet {
    fn render(&self) -> Element {
        let heading = Element::new("h1").text("Hello ");
        match &self.name {
            Some(name) => heading.text(name.as_str()),
            None => heading,
        }
    }
}

/// Job application and login forms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Application;

const COUNTRIES: &[(&str, &str)] = &[
    ("", "Select a country"),
    ("US", "United States"),
    ("GB", "United Kingdom"),
    ("CA", "Canada"),
    ("IN", "India"),
    ("AU", "Australia"),
];

fn labelled(id: &str, label: &str, control: Element) -> Element {
    Element::new("div").children([
        Element::new("label").attr("for", id).text(label),
        control.with_id(id),
    ])
}

impl Application {
    fn job_form() -> Element {
        let countries = COUNTRIES
            .iter()
            .map(|(value, text)| Element::new("option").attr("value", *value).text(*text));
        Element::new("form").children([
            labelled("name", "Name", Element::new("input").attr("type", "text")),
            labelled("bio", "Bio", Element::new("textarea").attr("name", "bio")),
            labelled(
                "job-location",
                "Job location",
                Element::new("select").children(countries),
            ),
            Element::new("div").child(
                Element::new("label")
                    .child(
                        Element::new("input")
                            .attr("type", "checkbox")
                            .with_id("terms"),
                    )
                    .text(" I agree to the terms and\n conditions"),
            ),
            Element::new("button").text("Submit"),
        ])
    }

    fn login_form() -> Element {
        Element::new("form").children([
            labelled(
                "email",
                "Email",
                Element::new("input")
                    .attr("type", "email")
                    .attr("placeholder", "Enter your email"),
            ),
            labelled(
                "password",
                "Password",
                Element::new("input")
                    .attr("type", "password")
                    .attr("placeholder", "Enter your password"),
            ),
            Element::new("button").attr("type", "submit").text("Login"),
        ])
    }
}

impl Component for Application {
    fn render(&self) -> Element {
        Element::fragment().children([Self::job_form(), Self::login_form()])
    }
}

/// A named demo component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fixture {
    /// `greet` or `greet:<name>`
    Greet(Greet),
    /// `application`
    Application,
}

impl Fixture {
    /// Names accepted by [`FromStr`]
    pub const NAMES: &'static [&'static str] = &["greet", "greet:<name>", "application"];
}

impl Component for Fixture {
    fn render(&self) -> Element {
        match self {
            Self::Greet(greet) => greet.render(),
            Self::Application => Application.render(),
        }
    }
}

impl FromStr for Fixture {
    type Err = QueryError;

    fn from_str(s: &str) -> QueryResult<Self> {
        match s.split_once(':') {
            None if s == "greet" => Ok(Self::Greet(Greet::new())),
            None if s == "application" => Ok(Self::Application),
            Some(("greet", name)) if !name.trim().is_empty() => {
                Ok(Self::Greet(Greet::with_name(name.trim())))
            }
            _ => Err(QueryError::UnknownFixture {
                name: s.to_string(),
                available: Self::NAMES.join(", "),
            }),
        }
    }
}

impl fmt::Display for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Greet(Greet { name: None }) => f.write_str("greet"),
            Self::Greet(Greet { name: Some(name) }) => write!(f, "greet:{name}"),
            Self::Application => f.write_str("application"),
        }
    }
}
