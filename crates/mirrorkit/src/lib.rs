//! # mirrorkit
//!
//! Command-line front end for the mirror registry: batch generation of setup
//! scripts and the static site (`scripts`, `pages`, `sitemap`, `validate`,
//! `build`), plus `list`, `show` for a single selection, and a `probe` of
//! mirror latency.

// CLI crate prints its results to stdout/stderr
#![allow(clippy::print_stdout, clippy::print_stderr)]

/// CLI argument parsing and exit codes.
pub mod cli;
/// Command implementations.
pub mod commands;
/// Tracing and logging configuration.
pub mod tracing;

use mirrorkit_registry::Registry;

use crate::cli::{Cli, CliError, EXIT_OK, exit_code_for, render_error};
use crate::commands::Context;

/// Run a parsed command line against the built-in registry and return the
/// process exit code.
#[must_use]
pub fn run(cli: Cli) -> i32 {
    let tracing_config = tracing::TracingConfig {
        format: tracing::TracingFormat::select(cli.log_format, cli.json),
        level: cli.level.into(),
    };
    // Ignore error if tracing already initialized (e.g., in tests)
    let _ = tracing::init_tracing(tracing_config);

    let ctx = Context::from_cli(&cli);
    let Some(command) = cli.command else {
        let err = CliError::config_with_help(
            "No subcommand provided",
            "Run 'mirrorkit --help' for usage information",
        );
        render_error(&err, ctx.json);
        return exit_code_for(&err);
    };

    match commands::execute(command, Registry::builtin(), &ctx) {
        Ok(()) => EXIT_OK,
        Err(err) => {
            render_error(&err, ctx.json);
            exit_code_for(&err)
        }
    }
}
