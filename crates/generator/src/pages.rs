//! Site page bodies.
//!
//! Script, manual command and config file are embedded HTML-escaped and are
//! otherwise byte-identical to the registry output.

use std::fmt::Write as _;

use mirrorkit_registry::{GeneratedArtifact, OsSupport, Registry, ToolDefinition, tool_page_path};

use crate::config::SiteConfig;
use crate::html::{Crumb, PageMeta, escape_html, layout};

const EXCERPT_CHARS: usize = 120;

fn home_crumb() -> Crumb {
    Crumb::new("Home", "/")
}

fn tools_crumb() -> Crumb {
    Crumb::new("Tools", "/tools/")
}

fn tool_crumb(tool: &ToolDefinition) -> Crumb {
    Crumb::new(tool.name(), format!("/{}", tool_page_path(tool.key())))
}

fn excerpt(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head.trim_end())
    } else {
        head
    }
}

fn code_block(id: Option<&str>, content: &str) -> String {
    let id = id.map(|id| format!(" id=\"{id}\"")).unwrap_or_default();
    format!("<pre><code{id}>{}</code></pre>\n", escape_html(content))
}

/// The one-click command for a script
#[must_use]
pub fn one_click_command(config: &SiteConfig, script_file: &str) -> String {
    format!("curl -sSL {}/scripts/{script_file} | bash", config.site_url)
}

/// Page for one `(tool, mirror, os?)` combination.
pub(crate) fn combination_page(
    config: &SiteConfig,
    tool: &ToolDefinition,
    artifact: &GeneratedArtifact,
) -> String {
    let combo = artifact.combination();
    let mirror_name = tool
        .mirrors()
        .get(&combo.mirror)
        .map_or(combo.mirror.as_str(), |m| m.name.as_str());
    let note = tool.mirrors().get(&combo.mirror).and_then(|m| m.note.as_deref());
    let os_label = combo
        .os_version
        .as_deref()
        .and_then(|os| tool.os_support().label(os));
    let os_suffix = os_label.map(|l| format!(" ({l})")).unwrap_or_default();
    let file = artifact.script_file_name();

    let meta = PageMeta {
        title: format!(
            "{} {mirror_name} mirror{os_suffix} - {}",
            tool.full_name(),
            config.site_name
        ),
        description: format!(
            "Point {} at the {mirror_name} mirror{os_suffix} with a single command, \
             or follow the manual steps.",
            tool.full_name()
        ),
        path: artifact.page_path().to_string(),
    };
    let crumbs = [
        home_crumb(),
        tools_crumb(),
        tool_crumb(tool),
        Crumb::new(mirror_name, format!("/{}", artifact.page_path())),
    ];

    let mut body = format!(
        "<h1>{} {} - {}</h1>\n",
        escape_html(tool.icon()),
        escape_html(tool.full_name()),
        escape_html(mirror_name)
    );
    if let Some(label) = os_label {
        let _ = writeln!(body, "<p class=\"subtitle\">OS version: {}</p>", escape_html(label));
    }
    if let Some(note) = note {
        let _ = writeln!(body, "<div class=\"note\">Note: {}</div>", escape_html(note));
    }

    body.push_str("<section class=\"tab-panel\" data-panel=\"oneclick\">\n<h2>One-click setup</h2>\n");
    body.push_str("<p>Run this in a terminal:</p>\n");
    body.push_str(&code_block(Some("oneClickCommand"), &one_click_command(config, file)));
    body.push_str("</section>\n");

    body.push_str("<section class=\"tab-panel\" data-panel=\"manual\">\n<h2>Manual configuration</h2>\n");
    body.push_str(&code_block(None, artifact.manual_command()));
    body.push_str("</section>\n");

    if let Some(config_file) = artifact.config_file() {
        let _ = writeln!(
            body,
            "<section class=\"tab-panel\" data-panel=\"config\">\n<h2>Configuration file: {}</h2>",
            escape_html(&config_file.file_name)
        );
        body.push_str(&code_block(None, &config_file.content));
        body.push_str("</section>\n");
    }

    body.push_str("<section class=\"tab-panel\" data-panel=\"script\">\n<h2>Full script</h2>\n");
    body.push_str(&code_block(None, artifact.script()));
    let _ = writeln!(
        body,
        "<a href=\"/scripts/{file}\" download class=\"btn-primary\">Download {file}</a>"
    );
    body.push_str("</section>\n");

    let _ = writeln!(
        body,
        "<p class=\"page-links\"><a href=\"/{}\">Choose another mirror</a> &middot; <a href=\"/\">Home</a></p>",
        tool_page_path(tool.key())
    );

    layout(config, &meta, &crumbs, &body)
}

fn tool_info(tool: &ToolDefinition) -> String {
    let Some(metadata) = tool.metadata() else {
        return String::new();
    };
    let mut html = String::from("<section class=\"tool-info\">\n<h2>About</h2>\n");
    let _ = writeln!(html, "<p>{}</p>", escape_html(&metadata.description));
    html.push_str("<dl>\n");
    for (label, url) in [
        ("Official site", &metadata.official_site),
        ("Documentation", &metadata.documentation),
    ] {
        if !url.is_empty() {
            let url = escape_html(url);
            let _ = writeln!(
                html,
                "<dt>{label}</dt><dd><a href=\"{url}\" target=\"_blank\" rel=\"noopener\">{url}</a></dd>"
            );
        }
    }
    if !metadata.platforms.is_empty() {
        let _ = writeln!(
            html,
            "<dt>Platforms</dt><dd>{}</dd>",
            escape_html(&metadata.platforms.join(" · "))
        );
    }
    html.push_str("</dl>\n</section>\n");
    html
}

/// Per-tool page listing its mirrors (and OS versions).
pub(crate) fn tool_page(config: &SiteConfig, tool: &ToolDefinition) -> String {
    let path = tool_page_path(tool.key());
    let mirror_names: Vec<&str> = tool.mirrors().values().map(|m| m.name.as_str()).collect();
    let meta = PageMeta {
        title: format!("{} mirrors - {}", tool.full_name(), config.site_name),
        description: format!(
            "Choose a {} mirror: {}.",
            tool.full_name(),
            mirror_names.join(", ")
        ),
        path: path.clone(),
    };
    let crumbs = [home_crumb(), tools_crumb(), tool_crumb(tool)];

    let mut body = format!(
        "<h1>{} {}</h1>\n",
        escape_html(tool.icon()),
        escape_html(tool.full_name())
    );

    match tool.os_support() {
        OsSupport::Any => {
            body.push_str("<h2>Choose a mirror</h2>\n<div class=\"mirror-grid\">\n");
            for (key, mirror) in tool.mirrors() {
                let _ = write!(
                    body,
                    "<a class=\"mirror-card\" href=\"/{path}{key}/\" data-tool=\"{}\" data-mirror=\"{key}\" data-url=\"{}\">\
                     <h3>{}</h3>",
                    tool.key(),
                    escape_html(&mirror.url),
                    escape_html(&mirror.name)
                );
                if let Some(note) = &mirror.note {
                    let _ = write!(body, "<div class=\"note\">{}</div>", escape_html(note));
                }
                body.push_str("</a>\n");
            }
            body.push_str("</div>\n");
        }
        OsSupport::RequiresOsVersion(versions) => {
            body.push_str("<h2>Choose your OS version, then a mirror</h2>\n<div class=\"os-grid\">\n");
            for (os, label) in versions {
                let _ = writeln!(
                    body,
                    "<div class=\"os-card\"><h3>{}</h3><div class=\"mirror-list\">",
                    escape_html(label)
                );
                for (key, mirror) in tool.mirrors() {
                    let _ = writeln!(
                        body,
                        "<a class=\"mirror-link\" href=\"/{path}{os}/{key}/\">{}</a>",
                        escape_html(&mirror.name)
                    );
                }
                body.push_str("</div></div>\n");
            }
            body.push_str("</div>\n");
        }
    }

    body.push_str(&tool_info(tool));
    layout(config, &meta, &crumbs, &body)
}

fn category_sections(registry: &Registry, with_excerpts: bool) -> String {
    let mut html = String::new();
    for category in registry.categories() {
        let _ = writeln!(
            html,
            "<section class=\"category\" id=\"{}\">\n<h2>{} <span class=\"count\">({})</span></h2>\n<div class=\"tool-grid\">",
            category.key,
            escape_html(&category.label),
            category.tools.len()
        );
        for tool in category.tools.iter().filter_map(|key| registry.tool(key).ok()) {
            let _ = write!(
                html,
                "<a class=\"tool-overview-card\" href=\"/{}\"><span class=\"icon\">{}</span><h3>{}</h3>",
                tool_page_path(tool.key()),
                escape_html(tool.icon()),
                escape_html(tool.full_name())
            );
            if with_excerpts {
                if let Some(metadata) = tool.metadata() {
                    let _ = write!(html, "<p>{}</p>", escape_html(&excerpt(&metadata.description)));
                }
            }
            let _ = writeln!(html, "<span class=\"mirror-count\">{} mirrors</span></a>", tool.mirrors().len());
        }
        html.push_str("</div>\n</section>\n");
    }
    html
}

fn stats(registry: &Registry) -> String {
    format!(
        "<ul class=\"stats\"><li><strong>{}</strong> tools</li><li><strong>{}</strong> mirrors</li><li><strong>{}</strong> ready-made scripts</li></ul>\n",
        registry.tools().len(),
        registry.mirror_count(),
        registry.expected_script_count()
    )
}

/// `/tools/` overview grouped by category.
pub(crate) fn overview_page(config: &SiteConfig, registry: &Registry) -> String {
    let meta = PageMeta {
        title: format!("Mirror configuration for developer tools - {}", config.site_name),
        description: format!(
            "Mirror setup for {} package managers and developer tools, grouped by category.",
            registry.tools().len()
        ),
        path: "tools/".to_string(),
    };
    let crumbs = [home_crumb(), tools_crumb()];
    let mut body = String::from("<h1>Developer tool mirrors</h1>\n");
    body.push_str(&stats(registry));
    body.push_str(&category_sections(registry, true));
    layout(config, &meta, &crumbs, &body)
}

/// Site home page.
pub(crate) fn home_page(config: &SiteConfig, registry: &Registry) -> String {
    let meta = PageMeta {
        title: config.site_name.clone(),
        description: "Pick a package manager and a mirror, then copy one command to configure it."
            .to_string(),
        path: String::new(),
    };
    let mut body = format!("<h1>{}</h1>\n", escape_html(&config.site_name));
    body.push_str(
        "<p class=\"subtitle\">Pick a package manager and a mirror, then copy one command to configure it.</p>\n",
    );
    body.push_str(&stats(registry));
    body.push_str(&category_sections(registry, false));
    body.push_str("<p class=\"page-links\"><a href=\"/tools/\">Browse all tools</a></p>\n");
    layout(config, &meta, &[], &body)
}
