//! `scripts/diff-report.json`: checks that OS-sensitive tools really emit
//! different scripts per OS version.
//!
//! Header comments always name the OS version, so only the executable body
//! (non-comment lines) is compared.

use mirrorkit_registry::{OsSupport, Registry, ToolDefinition};
use serde::Serialize;
use tracing::warn;

const DIFFERS: &str = "scripts differ across OS versions";
const IDENTICAL: &str = "warning: every OS version produces the same script; check the renderer";

/// Comparison result for one mirror.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorDiff {
    /// Mirror key
    pub mirror: String,
    /// Whether any two OS versions produced different bodies
    pub differs: bool,
    /// Human-readable verdict
    pub note: String,
}

/// Report for one OS-sensitive tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDiff {
    /// Tool key
    pub tool: String,
    /// OS version keys compared, in registry order
    pub os_versions: Vec<String>,
    /// Per-mirror verdicts
    pub differences: Vec<MirrorDiff>,
}

fn body(script: &str) -> Vec<&str> {
    script
        .lines()
        .filter(|line| !line.trim_start().starts_with('#'))
        .collect()
}

fn diff_tool(tool: &ToolDefinition) -> Option<ToolDiff> {
    let OsSupport::RequiresOsVersion(versions) = tool.os_support() else {
        return None;
    };
    if versions.len() < 2 {
        return None;
    }

    let differences = tool
        .mirrors()
        .keys()
        .filter_map(|mirror| {
            let scripts: Vec<String> = versions
                .keys()
                .map(|os| tool.render_script(mirror, Some(os.as_str())))
                .collect::<Result<_, _>>()
                .inspect_err(|e| warn!(tool = tool.key(), mirror = %mirror, error = %e, "Skipping diff"))
                .ok()?;
            let first = body(&scripts[0]);
            let differs = scripts[1..].iter().any(|s| body(s) != first);
            if !differs {
                warn!(tool = tool.key(), mirror = %mirror, "Scripts identical across OS versions");
            }
            Some(MirrorDiff {
                mirror: mirror.clone(),
                differs,
                note: (if differs { DIFFERS } else { IDENTICAL }).to_string(),
            })
        })
        .collect();

    Some(ToolDiff {
        tool: tool.key().to_string(),
        os_versions: versions.keys().cloned().collect(),
        differences,
    })
}

/// Diff report for every OS-sensitive tool with at least two OS versions
#[must_use]
pub fn diff_report(registry: &Registry) -> Vec<ToolDiff> {
    registry.tools().iter().filter_map(diff_tool).collect()
}
