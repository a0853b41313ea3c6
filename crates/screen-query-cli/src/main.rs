//! screenq: query a rendered UI description from the command line
//!
//! ## Usage
//!
//! ```bash
//! screenq query --fixture application --by role textbox --name Name
//! screenq query --input page.json --by label --regex '/terms/i'
//! screenq roles --fixture application
//! screenq tree --fixture greet:Manish
//! ```

use clap::Parser;
use screen_query_cli::{
    run_query, run_roles, run_tree, Cli, CliConfig, CliResult, ColorChoice, Commands, Printer,
    Verbosity,
};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();
    let config = build_config(&cli);
    init_tracing(&config);
    console::set_colors_enabled(config.color.should_color());

    let printer = Printer::new(config.verbosity.is_quiet());
    match &cli.command {
        Commands::Query(args) => run_query(args, &printer),
        Commands::Roles(args) => run_roles(args, &printer),
        Commands::Tree(args) => run_tree(args, &printer),
    }
}

fn build_config(cli: &Cli) -> CliConfig {
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        match cli.verbose {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Debug,
        }
    };

    let color: ColorChoice = cli.color.into();

    CliConfig::new().with_verbosity(verbosity).with_color(color)
}

/// `RUST_LOG` wins over the `-v`/`-q` derived level.
fn init_tracing(config: &CliConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
