//! screen-query CLI library
//!
//! Command-line interface over the screen-query element query engine.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::format_push_string)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{Cli, ColorArg, Commands, QueryArgs, RenderArgs, SourceArgs};
pub use config::{CliConfig, ColorChoice, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{NodeSummary, OutputFormat, Printer};
pub use runner::{build_query, load_config, load_screen, run_query, run_roles, run_tree};
