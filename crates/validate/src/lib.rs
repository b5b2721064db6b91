//! # mirrorkit-validate
//!
//! Advisory checks for generated shell scripts. A report never blocks
//! writing a script; it is tallied into the build summary and manifest.
//!
//! Rules:
//! - the first line is a recognized interpreter directive
//! - at least one `echo`/`printf` line prints something
//! - destructive or system-wide commands (`rm -r`, `mv` touching `/etc`,
//!   and `cp`/`tee` writing into `/etc`) run under `sudo` or `doas`
//!
//! Comment lines, `echo`/`printf` lines and here-document bodies are data and
//! are never treated as command invocations.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod shell;

use std::fmt;

use serde::Serialize;
use tracing::debug;

use shell::{Invocation, Line, ScriptLines};

/// Interpreter directives accepted on the first line
pub const RECOGNIZED_SHEBANGS: &[&str] = &[
    "#!/bin/bash",
    "#!/bin/sh",
    "#!/usr/bin/env bash",
    "#!/usr/bin/env sh",
];

const ELEVATORS: &[&str] = &["sudo", "doas"];

/// One problem found in a script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Issue {
    /// The first line is not a recognized interpreter directive
    MissingShebang {
        /// What the first line actually was
        found: String,
    },
    /// Nothing in the script reports progress to the user
    NoStatusOutput,
    /// A destructive or system-wide command runs without elevation
    #[serde(rename_all = "camelCase")]
    UnelevatedCommand {
        /// 1-based line number
        line: usize,
        /// The offending command name
        command: String,
    },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingShebang { found } if found.is_empty() => {
                write!(f, "missing interpreter directive (script is empty)")
            }
            Self::MissingShebang { found } => {
                write!(f, "missing interpreter directive (first line: {found})")
            }
            Self::NoStatusOutput => write!(f, "no echo/printf status output"),
            Self::UnelevatedCommand { line, command } => {
                write!(f, "line {line}: '{command}' needs sudo or doas")
            }
        }
    }
}

/// Outcome of validating one script.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    issues: Vec<Issue>,
}

impl ValidationReport {
    /// True when no issues were found
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    /// Issues in script order
    #[must_use]
    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// Issues rendered as messages
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.issues.iter().map(ToString::to_string).collect()
    }
}

/// Validate one script.
#[must_use]
pub fn validate(script: &str) -> ValidationReport {
    let mut issues = Vec::new();

    let first = script.lines().next().unwrap_or_default().trim_end();
    if !RECOGNIZED_SHEBANGS.contains(&first) {
        issues.push(Issue::MissingShebang {
            found: first.to_string(),
        });
    }

    let mut has_status = false;
    for (number, line) in ScriptLines::new(script) {
        let Line::Code(segments) = line else {
            continue;
        };
        let mut flagged = false;
        for segment in &segments {
            let Some(inv) = shell::invocation(segment, ELEVATORS) else {
                continue;
            };
            if matches!(inv.command, "echo" | "printf") {
                has_status |= inv
                    .args
                    .iter()
                    .any(|a| !a.starts_with('-') && !shell::unquote(a).is_empty());
            } else if !flagged && !inv.elevated && is_destructive(&inv) {
                issues.push(Issue::UnelevatedCommand {
                    line: number,
                    command: inv.command.to_string(),
                });
                flagged = true;
            }
        }
    }
    if !has_status {
        issues.push(Issue::NoStatusOutput);
    }

    debug!(issues = issues.len(), "Validated script");
    ValidationReport { issues }
}

/// `rm` with a recursive flag, `mv` with an `/etc` operand, or `cp`/`tee`
/// writing into `/etc`.
fn is_destructive(inv: &Invocation<'_, '_>) -> bool {
    match inv.command {
        "rm" => inv.args.iter().any(|a| is_recursive_flag(a)),
        "mv" => operands(inv.args).any(is_system_config),
        "cp" => cp_destination(inv.args).is_some_and(is_system_config),
        "tee" => operands(inv.args).any(is_system_config),
        _ => false,
    }
}

fn is_system_config(path: &str) -> bool {
    path == "/etc" || path.starts_with("/etc/")
}

/// Unquoted arguments that are neither flags nor redirections.
fn operands<'a>(args: &'a [&'a str]) -> impl Iterator<Item = &'a str> + 'a {
    let mut skip_next = false;
    args.iter().filter_map(move |arg| {
        if std::mem::take(&mut skip_next) {
            return None;
        }
        let bare = arg.trim_start_matches(|c: char| c.is_ascii_digit() || c == '&');
        if bare.starts_with('>') || bare.starts_with('<') {
            // `> file` names its target in the next word
            skip_next = bare.trim_start_matches(['>', '<', '&', '|']).is_empty();
            return None;
        }
        (!arg.starts_with('-')).then(|| shell::unquote(arg))
    })
}

/// Target of a `cp`: the `-t`/`--target-directory` value, else the last operand.
fn cp_destination<'a>(args: &'a [&'a str]) -> Option<&'a str> {
    let mut words = args.iter();
    while let Some(arg) = words.next() {
        if let Some(dir) = arg.strip_prefix("--target-directory=") {
            return Some(shell::unquote(dir));
        }
        if *arg == "-t" || *arg == "--target-directory" {
            return words.next().map(|dir| shell::unquote(dir));
        }
    }
    operands(args).last()
}

fn is_recursive_flag(arg: &str) -> bool {
    arg == "--recursive"
        || (arg.starts_with('-') && !arg.starts_with("--") && arg.contains(['r', 'R']))
}
