//! Batch generation commands: `scripts`, `pages`, `sitemap`, `validate` and
//! `build`.

use std::fmt::Write as _;

use mirrorkit_generator::{BuildReport, Generator, Summary};
use mirrorkit_registry::Registry;

use super::Context;
use crate::cli::CliError;

/// Which part of the generation pipeline to run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Scripts plus manifest, test matrix and diff report
    Scripts,
    /// Site pages
    Pages,
    /// Sitemap and robots.txt
    Sitemap,
    /// Render and validate without writing
    Validate,
    /// Scripts, pages and sitemap
    Build,
}

/// Run `stage` with `generator`.
///
/// # Errors
///
/// Only aggregate-report write failures are errors; per-item failures are in
/// the returned report.
pub fn run(stage: Stage, generator: &Generator<'_>) -> Result<BuildReport, CliError> {
    Ok(match stage {
        Stage::Build => generator.build()?,
        Stage::Scripts => single(generator.scripts()?),
        Stage::Pages => single(generator.pages()),
        Stage::Sitemap => single(generator.sitemap()),
        Stage::Validate => single(generator.validate()),
    })
}

fn single(summary: Summary) -> BuildReport {
    BuildReport {
        stages: vec![summary],
    }
}

/// Human-readable report: one summary line per stage, followed by failures
/// and validation issues.
#[must_use]
pub fn format_report(report: &BuildReport) -> String {
    let mut out = String::new();
    for summary in &report.stages {
        let _ = writeln!(out, "{summary}");
        for failure in &summary.failures {
            let _ = writeln!(out, "  failed {}: {}", failure.item, failure.reason);
        }
        if let Some(tally) = &summary.validation {
            for script in &tally.issues {
                for issue in &script.issues {
                    let _ = writeln!(out, "  issue {}: {issue}", script.file);
                }
            }
        }
    }
    out
}

/// The error that sets a non-zero exit code when any item failed or collided.
#[must_use]
pub fn failure_error(report: &BuildReport) -> Option<CliError> {
    let (total, bad) = report.stages.iter().fold((0, 0), |(total, bad), s| {
        (total + s.total, bad + s.total - s.succeeded)
    });
    (bad > 0).then(|| {
        CliError::generation_with_help(
            format!("{bad} of {total} items failed or collided"),
            "Partial output was kept; see the failures listed above",
        )
    })
}

/// Run a generation command and print its report.
///
/// # Errors
///
/// Configuration errors exit with 2; failed or collided items with 3.
pub fn execute(stage: Stage, registry: &Registry, ctx: &Context) -> Result<(), CliError> {
    let options = ctx.generate_options()?;
    tracing::info!(
        stage = ?stage,
        out = %options.output_dir.display(),
        site_url = %options.site.site_url,
        "Generating"
    );
    let generator = Generator::new(registry, options);
    let report = run(stage, &generator)?;
    ctx.emit(&report, &format_report(&report))?;
    failure_error(&report).map_or(Ok(()), Err)
}
