//! HTML building blocks shared by every page.

use std::fmt::Write as _;

use serde_json::json;

use crate::config::SiteConfig;

/// Escape text for HTML element content and attribute values.
#[must_use]
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape text for XML (sitemap) content.
#[must_use]
pub fn escape_xml(raw: &str) -> String {
    escape_html(raw).replace("&#039;", "&apos;")
}

/// Stylesheet location, relative to the output root
pub const STYLESHEET_PATH: &str = "style.css";

/// Stylesheet linked from every page.
pub const STYLESHEET: &str = "\
*{box-sizing:border-box}
body{margin:0;font-family:-apple-system,BlinkMacSystemFont,\"Segoe UI\",Roboto,sans-serif;line-height:1.6;color:#1f2937;background:#f9fafb}
a{color:#2563eb;text-decoration:none}
a:hover{text-decoration:underline}
.container{max-width:960px;margin:0 auto;padding:1.5rem}
.subtitle,.note,.count,.mirror-count{color:#6b7280}
.breadcrumb{display:flex;flex-wrap:wrap;gap:.25rem;font-size:.9rem}
.breadcrumb-separator{color:#9ca3af}
.breadcrumb-item.active{color:#374151}
.tool-grid,.mirror-grid,.os-grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(200px,1fr));gap:1rem;padding:0;list-style:none}
.tool-overview-card,.mirror-card,.os-card,.tool-info{background:#fff;border:1px solid #e5e7eb;border-radius:8px;padding:1rem}
.mirror-list{padding-left:1.25rem}
.stats{display:flex;gap:1.5rem}
.category{margin-top:2rem}
.tab-panel{margin:1.5rem 0}
.page-links{display:flex;flex-wrap:wrap;gap:1rem}
.btn-primary{display:inline-block;background:#2563eb;color:#fff;border-radius:6px;padding:.5rem 1rem}
pre{background:#111827;color:#f9fafb;padding:1rem;border-radius:6px;overflow-x:auto}
code{font-family:ui-monospace,SFMono-Regular,Menlo,monospace}
.footer{border-top:1px solid #e5e7eb;margin-top:3rem;padding:1.5rem;text-align:center;color:#6b7280;font-size:.9rem}
";

/// Title, description and location of a page.
#[derive(Debug, Clone)]
pub(crate) struct PageMeta {
    pub(crate) title: String,
    pub(crate) description: String,
    /// Site-relative path, `""` for the home page
    pub(crate) path: String,
}

/// One breadcrumb link.
#[derive(Debug, Clone)]
pub(crate) struct Crumb {
    pub(crate) label: String,
    pub(crate) href: String,
}

impl Crumb {
    pub(crate) fn new(label: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            href: href.into(),
        }
    }
}

pub(crate) fn breadcrumb(crumbs: &[Crumb]) -> String {
    let mut html = String::from("<nav class=\"breadcrumb\">");
    for (i, crumb) in crumbs.iter().enumerate() {
        if i > 0 {
            html.push_str("<span class=\"breadcrumb-separator\">&gt;</span>");
        }
        let active = if i + 1 == crumbs.len() { " active" } else { "" };
        let _ = write!(
            html,
            "<a href=\"{}\" class=\"breadcrumb-item{active}\">{}</a>",
            escape_html(&crumb.href),
            escape_html(&crumb.label)
        );
    }
    html.push_str("</nav>");
    html
}

/// `application/ld+json` HowTo block. `</` is escaped so the payload cannot
/// close the script element.
fn structured_data(meta: &PageMeta, url: &str) -> String {
    let data = json!({
        "@context": "https://schema.org",
        "@type": "HowTo",
        "name": meta.title,
        "description": meta.description,
        "url": url,
    });
    format!(
        "<script type=\"application/ld+json\">{}</script>",
        data.to_string().replace("</", "<\\/")
    )
}

fn analytics(id: &str) -> String {
    let id = escape_html(id);
    format!(
        "<script async src=\"https://www.googletagmanager.com/gtag/js?id={id}\"></script>\n\
         <script>\n\
         window.dataLayer = window.dataLayer || [];\n\
         function gtag(){{dataLayer.push(arguments);}}\n\
         gtag('js', new Date());\n\
         gtag('config', '{id}');\n\
         </script>\n"
    )
}

fn footer(config: &SiteConfig) -> String {
    let mut parts = vec![format!(
        "&copy; {} {}",
        config.copyright_year(),
        escape_html(&config.site_name)
    )];
    if let Some(text) = config.footer_text() {
        parts.push(escape_html(text));
    }
    if let Some(icp) = config.icp_number() {
        parts.push(format!(
            "<a href=\"https://beian.miit.gov.cn/\" target=\"_blank\" rel=\"nofollow\">{}</a>",
            escape_html(icp)
        ));
    }
    if let Some(github) = config.contact_github() {
        parts.push(format!(
            "<a href=\"{}\" target=\"_blank\" rel=\"noopener\">Source</a>",
            escape_html(github)
        ));
    }
    if let Some(email) = config.contact_email() {
        parts.push(format!(
            "<a href=\"mailto:{}\">Contact</a>",
            escape_html(email)
        ));
    }
    format!(
        "<footer class=\"footer\"><div class=\"footer-bottom\"><p>{}</p></div></footer>",
        parts.join(" &middot; ")
    )
}

/// Wrap `content` in the site layout: head with canonical, OpenGraph and
/// structured data, optional analytics, breadcrumbs and footer.
pub(crate) fn layout(config: &SiteConfig, meta: &PageMeta, crumbs: &[Crumb], content: &str) -> String {
    let url = config.url(&meta.path);
    let title = escape_html(&meta.title);
    let description = escape_html(&meta.description);
    let canonical = escape_html(&url);

    let mut html = String::from("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"UTF-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    let _ = writeln!(html, "<title>{title}</title>");
    let _ = writeln!(html, "<meta name=\"description\" content=\"{description}\">");
    let _ = writeln!(html, "<meta property=\"og:type\" content=\"website\">");
    let _ = writeln!(html, "<meta property=\"og:title\" content=\"{title}\">");
    let _ = writeln!(html, "<meta property=\"og:description\" content=\"{description}\">");
    let _ = writeln!(html, "<meta property=\"og:url\" content=\"{canonical}\">");
    let _ = writeln!(html, "<link rel=\"canonical\" href=\"{canonical}\">");
    let _ = writeln!(html, "<link rel=\"stylesheet\" href=\"/{STYLESHEET_PATH}\">");
    html.push_str(&structured_data(meta, &url));
    html.push('\n');
    if let Some(id) = config.analytics_id() {
        html.push_str(&analytics(id));
    }
    html.push_str("</head>\n<body>\n<main class=\"main-content\">\n<div class=\"container\">\n");
    if !crumbs.is_empty() {
        html.push_str(&breadcrumb(crumbs));
        html.push('\n');
    }
    html.push_str(content);
    if !content.ends_with('\n') {
        html.push('\n');
    }
    html.push_str("</div>\n</main>\n");
    html.push_str(&footer(config));
    html.push_str("\n</body>\n</html>\n");
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> PageMeta {
        PageMeta {
            title: "npm & Alibaba Cloud".to_string(),
            description: "Configure </script> safely".to_string(),
            path: "tools/npm/aliyun/".to_string(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#039;&amp;&#039;&lt;/a&gt;"
        );
        assert_eq!(escape_xml("a'b"), "a&apos;b");
    }

    #[test]
    fn test_layout_head() {
        let html = layout(&SiteConfig::default(), &meta(), &[], "<p>x</p>");
        assert!(html.contains("<title>npm &amp; Alibaba Cloud</title>"));
        assert!(html.contains(
            "<link rel=\"canonical\" href=\"https://mirror.example.com/tools/npm/aliyun/\">"
        ));
        assert!(html.contains("application/ld+json"));
        assert!(html.contains("\"@type\":\"HowTo\""));
        assert!(!html.contains("Configure </script>"));
        assert!(!html.contains("googletagmanager"));
    }

    #[test]
    fn test_layout_footer_and_analytics() {
        let config = SiteConfig {
            icp_number: Some("ICP-42".to_string()),
            contact_email: Some("ops@example.com".to_string()),
            enable_analytics: true,
            analytics_id: Some("G-XYZ".to_string()),
            lastmod: Some("2025-01-02".to_string()),
            ..SiteConfig::default()
        };
        let html = layout(&config, &meta(), &[], "");
        assert!(html.contains("&copy; 2025 mirrorkit"));
        assert!(html.contains(">ICP-42</a>"));
        assert!(html.contains("mailto:ops@example.com"));
        assert!(html.contains("gtag('config', 'G-XYZ');"));
    }

    #[test]
    fn test_breadcrumb_marks_last_active() {
        let html = breadcrumb(&[Crumb::new("Home", "/"), Crumb::new("npm", "/tools/npm/")]);
        assert!(html.contains("<a href=\"/\" class=\"breadcrumb-item\">Home</a>"));
        assert!(html.contains("<a href=\"/tools/npm/\" class=\"breadcrumb-item active\">npm</a>"));
    }
}
