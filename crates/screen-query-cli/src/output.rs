//! Output formatting

use clap::ValueEnum;
use console::{style, Term};
use screen_query::{Node, Snapshot};
use serde::{Deserialize, Serialize};

use crate::error::CliResult;

/// Output format for query results
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Serializable view of a matched element
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    /// Pre-order node index
    pub id: usize,
    /// Tag name
    pub tag: String,
    /// Effective role
    pub role: Option<String>,
    /// Accessible name
    pub name: String,
    /// Normalized text content
    pub text: String,
    /// Opening tag markup
    pub markup: String,
}

impl From<&Node> for NodeSummary {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id().index(),
            tag: node.tag().name().to_string(),
            role: node.role().map(str::to_string),
            name: node.accessible_name().to_string(),
            text: node.normalized_text(),
            markup: node.describe(),
        }
    }
}

/// Writes command results to stdout
#[derive(Debug)]
pub struct Printer {
    term: Term,
    /// Quiet mode
    pub quiet: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(false)
    }
}

impl Printer {
    /// Create a printer
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            term: Term::stdout(),
            quiet,
        }
    }

    fn line(&self, line: &str) -> CliResult<()> {
        self.term.write_line(line)?;
        Ok(())
    }

    /// Print matched nodes
    pub fn matches(&self, nodes: &[&Node], format: OutputFormat) -> CliResult<()> {
        match format {
            OutputFormat::Json => {
                let summaries: Vec<NodeSummary> = nodes.iter().copied().map(Into::into).collect();
                self.line(&serde_json::to_string_pretty(&summaries)?)
            }
            OutputFormat::Text => {
                for node in nodes {
                    self.line(&render_match(node))?;
                }
                if !self.quiet {
                    let count = format!("{} match(es)", nodes.len());
                    self.line(&style(count).dim().to_string())?;
                }
                Ok(())
            }
        }
    }

    /// Print role groups as `role: name "a", "b"`
    pub fn roles(&self, roles: &[(&str, Vec<&Node>)]) -> CliResult<()> {
        if roles.is_empty() {
            return self.line("There are no accessible roles.");
        }
        for (role, nodes) in roles {
            let names: Vec<String> = nodes
                .iter()
                .map(|n| format!("{:?}", n.accessible_name()))
                .collect();
            self.line(&format!(
                "{}: name {}",
                style(role).cyan().bold(),
                names.join(", ")
            ))?;
        }
        Ok(())
    }

    /// Print the pretty tree
    pub fn tree(&self, snapshot: &Snapshot) -> CliResult<()> {
        self.line(snapshot.pretty().trim_end())
    }
}

fn render_match(node: &Node) -> String {
    let mut line = format!("{} {}", style(node.id()).dim(), style(node.describe()).green());
    if let Some(role) = node.role() {
        line.push_str(&format!(" role={role}"));
    }
    if !node.accessible_name().is_empty() {
        line.push_str(&format!(" name={:?}", node.accessible_name()));
    }
    line
}
