//! `show`: render one selection to stdout.

use std::fmt::Write as _;

use mirrorkit_generator::{SiteConfig, one_click_command};
use mirrorkit_registry::{GeneratedArtifact, Registry};
use serde::Serialize;
use tracing::warn;

use super::Context;
use crate::cli::{CliError, ShowPart};

/// An explicit `(tool, mirror, os?)` selection.
#[derive(Debug, Clone, Copy)]
pub struct Selection<'a> {
    /// Tool key
    pub tool: &'a str,
    /// Mirror key
    pub mirror: &'a str,
    /// OS version key
    pub os: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ShowOutput<'a> {
    #[serde(flatten)]
    artifact: &'a GeneratedArtifact,
    one_click_command: String,
    issues: Vec<String>,
}

/// Render `selection`, warning about validation issues in the script.
///
/// # Errors
///
/// Unknown keys and missing or unexpected OS versions are configuration
/// errors; renderer failures are generation errors.
pub fn render(registry: &Registry, selection: &Selection<'_>) -> Result<GeneratedArtifact, CliError> {
    let artifact = registry.render(selection.tool, selection.mirror, selection.os)?;
    let report = mirrorkit_validate::validate(artifact.script());
    for issue in report.issues() {
        warn!(file = artifact.script_file_name(), "{issue}");
    }
    Ok(artifact)
}

/// Text for one part of `artifact`. `All` joins every section under a
/// heading; single parts are printed bare so they can be piped.
#[must_use]
pub fn format_part(artifact: &GeneratedArtifact, part: ShowPart, site: &SiteConfig) -> String {
    fn terminated(text: &str) -> String {
        if text.ends_with('\n') {
            text.to_string()
        } else {
            format!("{text}\n")
        }
    }

    match part {
        ShowPart::Script => artifact.script().to_string(),
        ShowPart::Manual => terminated(artifact.manual_command()),
        ShowPart::Config => artifact
            .config_file()
            .map(|file| file.content.clone())
            .unwrap_or_default(),
        ShowPart::All => {
            let mut out = String::new();
            let _ = writeln!(out, "==> One-click ({})", artifact.script_file_name());
            let _ = writeln!(out, "{}\n", one_click_command(site, artifact.script_file_name()));
            out.push_str("==> Manual command\n");
            out.push_str(&terminated(artifact.manual_command()));
            if let Some(file) = artifact.config_file() {
                let _ = writeln!(out, "\n==> Config file ({})", file.file_name);
                out.push_str(&terminated(&file.content));
            }
            out.push_str("\n==> Script\n");
            out.push_str(&terminated(artifact.script()));
            out
        }
    }
}

/// Print one selection.
///
/// # Errors
///
/// See [`render`]; asking for the config file of a tool without one is a
/// configuration error.
pub fn execute(
    registry: &Registry,
    selection: &Selection<'_>,
    part: ShowPart,
    ctx: &Context,
) -> Result<(), CliError> {
    let site = ctx.site_config()?;
    let artifact = render(registry, selection)?;
    if part == ShowPart::Config && artifact.config_file().is_none() {
        return Err(CliError::config_with_help(
            format!("Tool '{}' has no config file", selection.tool),
            "Use --part script or --part manual instead",
        ));
    }

    let output = ShowOutput {
        artifact: &artifact,
        one_click_command: one_click_command(&site, artifact.script_file_name()),
        issues: mirrorkit_validate::validate(artifact.script()).messages(),
    };
    ctx.emit(&output, &format_part(&artifact, part, &site))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn npm() -> GeneratedArtifact {
        let selection = Selection {
            tool: "npm",
            mirror: "aliyun",
            os: None,
        };
        render(Registry::builtin(), &selection).unwrap()
    }

    #[test]
    fn test_manual_part_is_bare() {
        let text = format_part(&npm(), ShowPart::Manual, &SiteConfig::default());
        assert!(text.starts_with("npm config set registry https://registry.npmmirror.com"));
        assert!(!text.contains("==>"));
    }

    #[test]
    fn test_script_part_is_byte_identical() {
        let artifact = npm();
        assert_eq!(
            format_part(&artifact, ShowPart::Script, &SiteConfig::default()),
            artifact.script()
        );
    }

    #[test]
    fn test_all_parts_have_headings() {
        let text = format_part(&npm(), ShowPart::All, &SiteConfig::default());
        assert!(text.contains("==> One-click (npm-aliyun.sh)"));
        assert!(text.contains("curl -sSL https://mirror.example.com/scripts/npm-aliyun.sh | bash"));
        assert!(text.contains("==> Config file (.npmrc)"));
        assert!(text.contains("==> Script\n#!/bin/bash"));
    }

    #[test]
    fn test_missing_os_version_is_config_error() {
        let selection = Selection {
            tool: "apt",
            mirror: "aliyun",
            os: None,
        };
        let err = render(Registry::builtin(), &selection).unwrap_err();
        assert_eq!(crate::cli::exit_code_for(&err), crate::cli::EXIT_CLI);
    }
}
