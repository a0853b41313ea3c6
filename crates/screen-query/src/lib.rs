//! screen-query: user-centric element queries and assertions
//!
//! Renders a declarative element tree into an immutable [`Snapshot`] and
//! finds elements the way a user perceives them: by visible text, label,
//! placeholder, accessible role and name, or test id.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐   ┌──────────┐   ┌──────────────┐   ┌───────────┐
//! │ Component │──►│ Snapshot │──►│ Matcher      │──►│ Queries   │
//! │ (Element) │   │ (arena)  │   │ (strategies) │   │ get/query │
//! └───────────┘   └──────────┘   └──────────────┘   └─────┬─────┘
//!                                                         ▼
//!                                                   ┌───────────┐
//!                                                   │ Assertion │
//!                                                   │ (Verdict) │
//!                                                   └───────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use screen_query::prelude::*;
//!
//! let screen = render(&Application);
//! let name = screen
//!     .get_by_role("textbox", RoleOptions::new().name("Name"))
//!     .unwrap();
//! expect(name).to_be_in_the_document().assert();
//!
//! let err = screen.get_by_role("textbox", RoleOptions::new()).unwrap_err();
//! assert!(err.is_multiple_matches());
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod assertion;
mod component;
mod config;
#[allow(clippy::missing_errors_doc)]
mod demo;
mod element;
#[allow(clippy::missing_errors_doc, clippy::module_name_repetitions)]
mod matcher;
#[allow(clippy::missing_errors_doc)]
mod queries;
mod result;
/// Implicit ARIA roles and labelable controls
pub mod role;
mod snapshot;
mod suite;
#[allow(clippy::missing_errors_doc)]
mod text_match;

pub use assertion::{expect, Assertion, Expect, Verdict};
pub use component::{render, render_with_config, Component};
pub use config::{QueryConfig, DEFAULT_IGNORE_TAGS, DEFAULT_TEST_ID_ATTRIBUTE};
pub use demo::{Application, Fixture, Greet};
pub use element::{Content, Element, TagKind};
pub use matcher::{match_all, MatchResult, Query, RoleOptions, Strategy};
pub use queries::{Queries, Screen, Within};
pub use result::{QueryError, QueryResult};
pub use snapshot::{Node, NodeId, Snapshot};
pub use suite::{SuiteResults, TestCase, TestHarness, TestResult, TestSuite};
pub use text_match::{normalize, TextMatch};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::assertion::*;
    pub use super::component::*;
    pub use super::config::*;
    pub use super::demo::*;
    pub use super::element::*;
    pub use super::matcher::*;
    pub use super::queries::*;
    pub use super::result::*;
    pub use super::snapshot::*;
    pub use super::suite::*;
    pub use super::text_match::*;
}
