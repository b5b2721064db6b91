//! `sitemap.xml` and `robots.txt`.

use std::fmt::{self, Write as _};

use mirrorkit_registry::{Combination, Registry, tool_page_path};

use crate::config::SiteConfig;
use crate::html::escape_xml;

/// Sitemap `changefreq` values in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    /// Home page
    Daily,
    /// Tool and overview pages
    Weekly,
    /// Combination pages and scripts
    Monthly,
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        })
    }
}

/// One `<url>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SitemapUrl {
    /// Absolute URL
    pub loc: String,
    /// Change frequency hint
    pub changefreq: ChangeFreq,
    /// Priority, as written
    pub priority: &'static str,
}

impl SitemapUrl {
    fn new(loc: String, changefreq: ChangeFreq, priority: &'static str) -> Self {
        Self {
            loc,
            changefreq,
            priority,
        }
    }
}

/// Every URL of the site: home, tools overview, tool pages, combination pages
/// and scripts.
#[must_use]
pub fn sitemap_urls(config: &SiteConfig, registry: &Registry, combinations: &[Combination]) -> Vec<SitemapUrl> {
    let mut urls = vec![
        SitemapUrl::new(config.url(""), ChangeFreq::Daily, "1.0"),
        SitemapUrl::new(config.url("tools/"), ChangeFreq::Weekly, "0.9"),
    ];
    for tool in registry.tools() {
        urls.push(SitemapUrl::new(
            config.url(&tool_page_path(tool.key())),
            ChangeFreq::Weekly,
            "0.8",
        ));
        urls.extend(
            combinations
                .iter()
                .filter(|c| c.tool == tool.key())
                .map(|c| SitemapUrl::new(config.url(&c.page_path()), ChangeFreq::Monthly, "0.7")),
        );
    }
    urls.extend(combinations.iter().map(|c| {
        SitemapUrl::new(
            config.url(&format!("scripts/{}", c.script_file_name())),
            ChangeFreq::Monthly,
            "0.5",
        )
    }));
    urls
}

/// Render the sitemap XML with one `lastmod` for every entry.
#[must_use]
pub fn render_sitemap(urls: &[SitemapUrl], lastmod: &str) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n");
    for url in urls {
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{lastmod}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{}</priority>\n  </url>\n",
            escape_xml(&url.loc),
            url.changefreq,
            url.priority
        );
    }
    xml.push_str("</urlset>\n");
    xml
}

/// `robots.txt` allowing everything and pointing at the sitemap
#[must_use]
pub fn robots_txt(config: &SiteConfig) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}\n",
        config.url("sitemap.xml")
    )
}
