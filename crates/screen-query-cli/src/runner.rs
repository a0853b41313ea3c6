//! Command execution

use std::fs;
use std::path::Path;

use screen_query::{
    render_with_config, Component, Element, Queries, Query, QueryConfig, RoleOptions, Screen,
    Strategy, TextMatch,
};

use crate::commands::{QueryArgs, RenderArgs};
use crate::error::{CliError, CliResult};
use crate::output::Printer;

/// Load a YAML query configuration
pub fn load_config(path: &Path) -> CliResult<QueryConfig> {
    let text = fs::read_to_string(path)?;
    let config = serde_yaml_ng::from_str(&text)?;
    tracing::debug!(path = %path.display(), ?config, "loaded query config");
    Ok(config)
}

/// Render the tree named by the source arguments
pub fn load_screen(args: &RenderArgs) -> CliResult<Screen> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => QueryConfig::default(),
    };
    let element = match (&args.source.input, &args.source.fixture) {
        (Some(path), _) => Element::from_json(&fs::read_to_string(path)?)?,
        (None, Some(fixture)) => fixture.render(),
        (None, None) => {
            return Err(CliError::invalid_argument(
                "one of --input or --fixture is required",
            ))
        }
    };
    Ok(render_with_config(&element, config))
}

fn text_match(args: &QueryArgs, text: &str) -> CliResult<TextMatch> {
    Ok(if args.regex {
        TextMatch::regex(text)?
    } else if args.ignore_case {
        TextMatch::partial_ignore_case(text)
    } else if args.partial {
        TextMatch::partial(text)
    } else {
        TextMatch::exact(text)
    })
}

/// Build the query described by the arguments.
///
/// For `--by role` the positional is the role and the matching flags apply
/// to `--name`; for every other strategy they apply to the positional.
pub fn build_query(args: &QueryArgs) -> CliResult<Query> {
    if args.by != Strategy::Role && args.name.is_some() {
        return Err(CliError::invalid_argument("--name only applies to --by role"));
    }
    let pattern = || text_match(args, &args.pattern);
    Ok(match args.by {
        Strategy::Text => Query::text(pattern()?),
        Strategy::LabelText => Query::label_text(pattern()?),
        Strategy::PlaceholderText => Query::placeholder_text(pattern()?),
        Strategy::TestId => Query::test_id(pattern()?),
        Strategy::AltText => Query::alt_text(pattern()?),
        Strategy::Title => Query::title(pattern()?),
        Strategy::DisplayValue => Query::display_value(pattern()?),
        Strategy::Role => {
            let mut options = RoleOptions::new();
            if let Some(name) = &args.name {
                options = options.name(text_match(args, name)?);
            }
            Query::role(args.pattern.trim(), options)
        }
    })
}

/// Run the query command
pub fn run_query(args: &QueryArgs, printer: &Printer) -> CliResult<()> {
    let screen = load_screen(&args.render)?;
    let query = build_query(args)?;
    tracing::info!(%query, all = args.all, "running query");
    if args.all {
        let found = screen.get_all(&query)?;
        printer.matches(found.nodes(), args.format)
    } else {
        let node = screen.get(&query)?;
        printer.matches(&[node], args.format)
    }
}

/// Run the roles command
pub fn run_roles(args: &RenderArgs, printer: &Printer) -> CliResult<()> {
    let screen = load_screen(args)?;
    printer.roles(&screen.roles())
}

/// Run the tree command
pub fn run_tree(args: &RenderArgs, printer: &Printer) -> CliResult<()> {
    let screen = load_screen(args)?;
    printer.tree(screen.snapshot())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use clap::Parser;
    use std::io::Write;

    fn query_args(argv: &[&str]) -> QueryArgs {
        let mut full = vec!["screenq", "query"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Query(args) => args,
            other => panic!("unexpected command {other:?}"),
        }
    }

    mod build_query_tests {
        use super::*;

        #[test]
        fn test_role_with_regex_name() {
            let args = query_args(&[
                "-f",
                "application",
                "--by",
                "role",
                "checkbox",
                "--regex",
                "--name",
                "/terms/i",
            ]);
            let query = build_query(&args).unwrap();
            assert_eq!(query.strategy(), Strategy::Role);
            let screen = load_screen(&args.render).unwrap();
            assert_eq!(screen.get(&query).unwrap().attribute("id"), Some("terms"));
        }

        #[test]
        fn test_name_requires_role() {
            let args = query_args(&["-f", "greet", "--name", "x", "Hello"]);
            assert!(matches!(
                build_query(&args),
                Err(CliError::InvalidArgument { .. })
            ));
        }

        #[test]
        fn test_invalid_regex_is_query_error() {
            let args = query_args(&["-f", "greet", "--regex", "/(/"]);
            assert!(matches!(
                build_query(&args),
                Err(CliError::Query(screen_query::QueryError::InvalidPattern { .. }))
            ));
        }

        #[test]
        fn test_ignore_case_is_partial() {
            let args = query_args(&["-f", "greet:Manish", "--ignore-case", "manish"]);
            let screen = load_screen(&args.render).unwrap();
            let node = screen.get(&build_query(&args).unwrap()).unwrap();
            assert_eq!(node.own_text(), "Hello Manish");
        }
    }

    mod load_tests {
        use super::*;

        #[test]
        fn test_load_json_and_yaml_config() {
            let dir = tempfile::tempdir().unwrap();
            let input = dir.path().join("tree.json");
            fs::write(
                &input,
                r#"{"tag":"div","children":[{"tag":"span","attributes":{"data-qa":"x"},"children":["qa"]}]}"#,
            )
            .unwrap();
            let config = dir.path().join("config.yaml");
            let mut file = fs::File::create(&config).unwrap();
            writeln!(file, "test_id_attribute: data-qa").unwrap();

            let args = query_args(&[
                "-i",
                input.to_str().unwrap(),
                "-c",
                config.to_str().unwrap(),
                "--by",
                "test-id",
                "x",
            ]);
            let screen = load_screen(&args.render).unwrap();
            assert_eq!(screen.config().test_id_attribute, "data-qa");
            let node = screen.get(&build_query(&args).unwrap()).unwrap();
            assert_eq!(node.own_text(), "qa");
        }

        #[test]
        fn test_missing_input_is_io_error() {
            let args = query_args(&["-i", "/definitely/not/here.json", "x"]);
            assert!(matches!(load_screen(&args.render), Err(CliError::Io(_))));
        }
    }
}
