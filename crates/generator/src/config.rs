//! Site configuration (`site-config.json`).

use std::path::Path;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};

/// Conventional file name of the site configuration
pub const SITE_CONFIG_FILE: &str = "site-config.json";

const DEFAULT_SITE_URL: &str = "https://mirror.example.com";
const DEFAULT_SITE_NAME: &str = "mirrorkit";

/// Settings that shape the generated site. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SiteConfig {
    /// Absolute base URL the site is served from, without a trailing slash
    pub site_url: String,
    /// Site name used in titles and the footer
    pub site_name: String,
    /// Extra footer text
    pub footer_text: Option<String>,
    /// ICP filing number shown in the footer
    pub icp_number: Option<String>,
    /// Contact address shown in the footer
    pub contact_email: Option<String>,
    /// Source repository link shown in the footer
    pub contact_github: Option<String>,
    /// Whether to emit the analytics snippet
    pub enable_analytics: bool,
    /// Analytics measurement id
    pub analytics_id: Option<String>,
    /// Fixed `YYYY-MM-DD` date for the sitemap; today when unset
    pub lastmod: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site_url: DEFAULT_SITE_URL.to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
            footer_text: None,
            icp_number: None,
            contact_email: None,
            contact_github: None,
            enable_analytics: false,
            analytics_id: None,
            lastmod: None,
        }
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(|v| v.trim()).filter(|v| !v.is_empty())
}

impl SiteConfig {
    /// Load from `path`. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the file cannot be read, is not
    /// valid JSON, or holds an unusable value.
    pub fn load(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No site config, using defaults");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config: Self = serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        let config = config.normalized()?;
        debug!(path = %path.display(), site_url = %config.site_url, "Loaded site config");
        Ok(config)
    }

    /// Override the site URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigValue`] when the URL is not absolute http(s).
    pub fn with_site_url(mut self, url: impl Into<String>) -> Result<Self> {
        self.site_url = url.into();
        self.normalized()
    }

    /// Trim the trailing slash from the site URL and check the values that
    /// must be well formed.
    fn normalized(mut self) -> Result<Self> {
        let trimmed = self.site_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
            return Err(Error::ConfigValue {
                key: "siteUrl".to_string(),
                reason: format!("expected an absolute http(s) URL, got '{}'", self.site_url),
            });
        }
        self.site_url = trimmed.to_string();

        if let Some(lastmod) = non_empty(self.lastmod.as_ref()) {
            NaiveDate::parse_from_str(lastmod, "%Y-%m-%d").map_err(|e| Error::ConfigValue {
                key: "lastmod".to_string(),
                reason: format!("expected YYYY-MM-DD: {e}"),
            })?;
        }
        Ok(self)
    }

    /// Absolute URL of a site-relative path such as `tools/npm/`
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.site_url, path.trim_start_matches('/'))
    }

    /// Analytics id, only when analytics are enabled and an id is set
    #[must_use]
    pub fn analytics_id(&self) -> Option<&str> {
        if self.enable_analytics {
            non_empty(self.analytics_id.as_ref())
        } else {
            None
        }
    }

    /// Footer text, if set
    #[must_use]
    pub fn footer_text(&self) -> Option<&str> {
        non_empty(self.footer_text.as_ref())
    }

    /// ICP number, if set
    #[must_use]
    pub fn icp_number(&self) -> Option<&str> {
        non_empty(self.icp_number.as_ref())
    }

    /// Contact e-mail, if set
    #[must_use]
    pub fn contact_email(&self) -> Option<&str> {
        non_empty(self.contact_email.as_ref())
    }

    /// Repository link, if set
    #[must_use]
    pub fn contact_github(&self) -> Option<&str> {
        non_empty(self.contact_github.as_ref())
    }

    fn lastmod_date(&self) -> NaiveDate {
        non_empty(self.lastmod.as_ref())
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    /// Sitemap `lastmod` value
    #[must_use]
    pub fn lastmod(&self) -> String {
        self.lastmod_date().format("%Y-%m-%d").to_string()
    }

    /// Year shown in the footer copyright
    #[must_use]
    pub fn copyright_year(&self) -> i32 {
        self.lastmod_date().year()
    }
}
