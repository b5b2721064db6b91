//! `list`: the registry at a glance, or one tool in detail.

use std::fmt::Write as _;

use mirrorkit_registry::{CategoryKey, MirrorDefinition, Registry, ToolDefinition};
use serde::Serialize;

use super::Context;
use crate::cli::CliError;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolSummary<'a> {
    key: &'a str,
    name: &'a str,
    category: CategoryKey,
    mirrors: usize,
    os_versions: usize,
    scripts: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CategoryListing<'a> {
    key: CategoryKey,
    label: &'a str,
    tools: Vec<ToolSummary<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MirrorListing<'a> {
    key: &'a str,
    #[serde(flatten)]
    mirror: &'a MirrorDefinition,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct OsListing<'a> {
    key: &'a str,
    label: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolListing<'a> {
    #[serde(flatten)]
    summary: ToolSummary<'a>,
    full_name: &'a str,
    config_file: Option<&'static str>,
    mirror_list: Vec<MirrorListing<'a>>,
    os_version_list: Vec<OsListing<'a>>,
}

fn summarize(tool: &ToolDefinition) -> ToolSummary<'_> {
    ToolSummary {
        key: tool.key(),
        name: tool.name(),
        category: tool.category(),
        mirrors: tool.mirrors().len(),
        os_versions: tool.os_support().len(),
        scripts: tool.script_count(),
    }
}

fn categories(registry: &Registry) -> Vec<CategoryListing<'_>> {
    registry
        .categories()
        .iter()
        .map(|category| CategoryListing {
            key: category.key,
            label: &category.label,
            tools: registry.tools_in(category.key).map(summarize).collect(),
        })
        .collect()
}

fn detail(tool: &ToolDefinition) -> ToolListing<'_> {
    ToolListing {
        summary: summarize(tool),
        full_name: tool.full_name(),
        config_file: tool.config_file_name(),
        mirror_list: tool
            .mirrors()
            .iter()
            .map(|(key, mirror)| MirrorListing { key, mirror })
            .collect(),
        os_version_list: tool
            .os_support()
            .versions()
            .map(|(key, label)| OsListing { key, label })
            .collect(),
    }
}

fn format_overview(listing: &[CategoryListing<'_>]) -> String {
    let mut out = String::new();
    for category in listing {
        let _ = writeln!(out, "{} ({})", category.label, category.key);
        for tool in &category.tools {
            let _ = write!(out, "  {:<10} {:<12} {} mirrors", tool.key, tool.name, tool.mirrors);
            if tool.os_versions > 0 {
                let _ = write!(out, ", {} OS versions", tool.os_versions);
            }
            out.push('\n');
        }
    }
    out
}

fn format_detail(listing: &ToolListing<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} ({}) [{}]",
        listing.full_name, listing.summary.key, listing.summary.category
    );
    if let Some(file) = listing.config_file {
        let _ = writeln!(out, "Config file: {file}");
    }
    out.push_str("Mirrors:\n");
    for entry in &listing.mirror_list {
        let _ = write!(out, "  {:<12} {:<20} {}", entry.key, entry.mirror.name, entry.mirror.url);
        if let Some(note) = &entry.mirror.note {
            let _ = write!(out, "  ({note})");
        }
        out.push('\n');
    }
    if !listing.os_version_list.is_empty() {
        out.push_str("OS versions:\n");
        for os in &listing.os_version_list {
            let _ = writeln!(out, "  {:<14} {}", os.key, os.label);
        }
    }
    let _ = writeln!(out, "Scripts: {}", listing.summary.scripts);
    out
}

/// Print every category with its tools, or one tool's mirrors and OS versions.
///
/// # Errors
///
/// Unknown tool keys are configuration errors.
pub fn execute(registry: &Registry, tool: Option<&str>, ctx: &Context) -> Result<(), CliError> {
    match tool {
        Some(key) => {
            let listing = detail(registry.tool(key)?);
            ctx.emit(&listing, &format_detail(&listing))
        }
        None => {
            let listing = categories(registry);
            ctx.emit(&listing, &format_overview(&listing))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_covers_every_tool_once() {
        let registry = Registry::builtin();
        let listing = categories(registry);
        let total: usize = listing.iter().map(|c| c.tools.len()).sum();
        assert_eq!(total, registry.tools().len());

        let text = format_overview(&listing);
        assert!(text.lines().any(|l| l.trim_start().starts_with("npm ")));
        assert!(text.contains("OS versions"));
    }

    #[test]
    fn test_detail_lists_mirrors_and_os_versions() {
        let tool = Registry::builtin().tool("apt").unwrap();
        let text = format_detail(&detail(tool));
        assert!(text.contains("Mirrors:\n"));
        assert!(text.contains("aliyun"));
        assert!(text.contains("ubuntu-22.04"));
        assert!(text.contains(&format!("Scripts: {}", tool.script_count())));
    }

    #[test]
    fn test_detail_json_shape() {
        let tool = Registry::builtin().tool("npm").unwrap();
        let json = serde_json::to_value(detail(tool)).unwrap();
        assert_eq!(json["key"], "npm");
        assert_eq!(json["category"], "language");
        assert_eq!(json["configFile"], ".npmrc");
        assert_eq!(json["mirrorList"][0]["key"], "aliyun");
        assert_eq!(json["osVersionList"].as_array().unwrap().len(), 0);
    }
}
