//! CLI command definitions using clap

use clap::{Args, Parser, Subcommand, ValueEnum};
use screen_query::{Fixture, Strategy};
use std::path::PathBuf;

use crate::output::OutputFormat;

/// screenq: render a UI description and query it the way a user would
#[derive(Parser, Debug)]
#[command(name = "screenq")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (suppress non-error output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Color output (auto, always, never)
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorArg,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find elements by text, label, placeholder, role, test id and more
    Query(QueryArgs),

    /// List accessible roles and their names
    Roles(RenderArgs),

    /// Print the rendered element tree
    Tree(RenderArgs),
}

/// Where the element tree comes from
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct SourceArgs {
    /// JSON element description
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Bundled demo component (greet, greet:<name>, application)
    #[arg(short, long, value_parser = parse_fixture)]
    pub fixture: Option<Fixture>,
}

fn parse_fixture(s: &str) -> Result<Fixture, String> {
    s.parse().map_err(|e: screen_query::QueryError| e.to_string())
}

/// Arguments shared by every command that renders a tree
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Element source
    #[command(flatten)]
    pub source: SourceArgs,

    /// YAML query configuration
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

/// Arguments for the query command
#[derive(Args, Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct QueryArgs {
    /// Element source and configuration
    #[command(flatten)]
    pub render: RenderArgs,

    /// Query strategy
    #[arg(short, long, default_value = "text")]
    pub by: Strategy,

    /// Text to match, or the role name for `--by role`
    pub pattern: String,

    /// Accessible name filter for `--by role`
    #[arg(short, long)]
    pub name: Option<String>,

    /// Treat the text (or role name filter) as a regex, e.g. `/terms/i`
    #[arg(long, conflicts_with = "partial")]
    pub regex: bool,

    /// Substring match instead of exact
    #[arg(long)]
    pub partial: bool,

    /// Case-insensitive substring match
    #[arg(long, conflicts_with = "regex")]
    pub ignore_case: bool,

    /// Accept any number of matches (fails only when none are found)
    #[arg(short, long)]
    pub all: bool,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,
}

/// Color argument for CLI
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ColorArg {
    /// Automatic color detection
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl From<ColorArg> for crate::config::ColorChoice {
    fn from(arg: ColorArg) -> Self {
        match arg {
            ColorArg::Auto => Self::Auto,
            ColorArg::Always => Self::Always,
            ColorArg::Never => Self::Never,
        }
    }
}
