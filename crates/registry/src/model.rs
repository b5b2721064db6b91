//! Value types shared by the registry, the renderers and the generator.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::error::Result;
use crate::paths;
use crate::url::MirrorUrl;

/// Tool category, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKey {
    /// Operating-system package managers
    System,
    /// Programming-language package managers
    Language,
    /// Container registries
    Container,
    /// Everything else
    Other,
}

impl CategoryKey {
    /// All categories in display order
    pub const ALL: [Self; 4] = [Self::System, Self::Language, Self::Container, Self::Other];

    /// Stable lowercase key
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Language => "language",
            Self::Container => "container",
            Self::Other => "other",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::System => "System package managers",
            Self::Language => "Programming languages",
            Self::Container => "Containers & virtualization",
            Self::Other => "Other tools",
        }
    }
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A category groups tools for navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    /// Category key
    pub key: CategoryKey,
    /// Human-readable label
    pub label: String,
    /// Tool keys in display order
    pub tools: Vec<String>,
}

impl Category {
    /// Create a category with the default label for `key`.
    pub fn new<I, S>(key: CategoryKey, tools: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            key,
            label: key.label().to_string(),
            tools: tools.into_iter().map(Into::into).collect(),
        }
    }
}

/// Whether a tool's output depends on the target OS release.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OsSupport {
    /// The same output works everywhere
    #[default]
    Any,
    /// Output depends on the OS version; maps OS key to display label
    RequiresOsVersion(IndexMap<String, String>),
}

impl OsSupport {
    /// Build the OS-sensitive variant from `(key, label)` pairs.
    pub fn requires<I, K, L>(versions: I) -> Self
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: Into<String>,
    {
        Self::RequiresOsVersion(
            versions
                .into_iter()
                .map(|(k, l)| (k.into(), l.into()))
                .collect(),
        )
    }

    /// True when an OS version must be supplied
    #[must_use]
    pub const fn requires_os_version(&self) -> bool {
        matches!(self, Self::RequiresOsVersion(_))
    }

    /// Ordered `(key, label)` pairs; empty for [`OsSupport::Any`]
    pub fn versions(&self) -> impl Iterator<Item = (&str, &str)> {
        let map = match self {
            Self::Any => None,
            Self::RequiresOsVersion(map) => Some(map),
        };
        map.into_iter()
            .flat_map(|m| m.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Label for an OS key
    #[must_use]
    pub fn label(&self, key: &str) -> Option<&str> {
        match self {
            Self::Any => None,
            Self::RequiresOsVersion(map) => map.get(key).map(String::as_str),
        }
    }

    /// Number of OS versions (zero for [`OsSupport::Any`])
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Any => 0,
            Self::RequiresOsVersion(map) => map.len(),
        }
    }

    /// True when no OS versions are listed
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One mirror endpoint offered for a tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorDefinition {
    /// Display name
    pub name: String,
    /// Base URL the tool is pointed at
    pub url: String,
    /// Distinct URL for latency probes, if the base URL is unsuitable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_url: Option<String>,
    /// Caveat shown alongside the mirror
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MirrorDefinition {
    /// Create a mirror with no test URL and no note.
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            test_url: None,
            note: None,
        }
    }

    /// Set a distinct probe URL
    #[must_use]
    pub fn with_test_url(mut self, url: impl Into<String>) -> Self {
        self.test_url = Some(url.into());
        self
    }

    /// Attach a note
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// URL used for latency probes: the test URL, else the base URL's origin.
    pub fn test_url(&self) -> Result<String> {
        match &self.test_url {
            Some(url) => Ok(url.clone()),
            None => Ok(MirrorUrl::parse(&self.url)?.origin()),
        }
    }

    /// Parsed base URL
    pub fn parsed_url(&self) -> Result<MirrorUrl<'_>> {
        MirrorUrl::parse(&self.url)
    }
}

/// Descriptive information shown on tool pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolMetadata {
    /// One-paragraph description
    pub description: String,
    /// Project home page
    pub official_site: String,
    /// Documentation URL
    pub documentation: String,
    /// Supported platforms
    pub platforms: Vec<String>,
}

/// A rendered configuration file together with its conventional name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
    /// Conventional file name, e.g. `.npmrc`
    pub file_name: String,
    /// File body
    pub content: String,
}

/// One `(tool, mirror, os?)` selection from the full enumeration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Combination {
    /// Tool key
    pub tool: String,
    /// Mirror key
    pub mirror: String,
    /// OS version key, present iff the tool requires one
    pub os_version: Option<String>,
}

impl Combination {
    /// Create a combination
    pub fn new(tool: impl Into<String>, mirror: impl Into<String>, os_version: Option<&str>) -> Self {
        Self {
            tool: tool.into(),
            mirror: mirror.into(),
            os_version: os_version.map(str::to_string),
        }
    }

    /// Script file name for this combination
    #[must_use]
    pub fn script_file_name(&self) -> String {
        paths::script_file_name(&self.tool, &self.mirror, self.os_version.as_deref())
    }

    /// Site-relative page path for this combination
    #[must_use]
    pub fn page_path(&self) -> String {
        paths::page_path(&self.tool, &self.mirror, self.os_version.as_deref())
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.os_version {
            Some(os) => write!(f, "{}/{}/{}", self.tool, os, self.mirror),
            None => write!(f, "{}/{}", self.tool, self.mirror),
        }
    }
}

/// Everything rendered for one selection. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedArtifact {
    combination: Combination,
    script: String,
    manual_command: String,
    config_file: Option<ConfigFile>,
    script_file_name: String,
    page_path: String,
}

impl GeneratedArtifact {
    pub(crate) fn new(
        combination: Combination,
        script: String,
        manual_command: String,
        config_file: Option<ConfigFile>,
    ) -> Self {
        let script_file_name = combination.script_file_name();
        let page_path = combination.page_path();
        Self {
            combination,
            script,
            manual_command,
            config_file,
            script_file_name,
            page_path,
        }
    }

    /// The selection this artifact was rendered for
    #[must_use]
    pub fn combination(&self) -> &Combination {
        &self.combination
    }

    /// Full shell script
    #[must_use]
    pub fn script(&self) -> &str {
        &self.script
    }

    /// Short manual snippet
    #[must_use]
    pub fn manual_command(&self) -> &str {
        &self.manual_command
    }

    /// Config file, for tools that support one
    #[must_use]
    pub fn config_file(&self) -> Option<&ConfigFile> {
        self.config_file.as_ref()
    }

    /// Script file name, e.g. `npm-aliyun.sh`
    #[must_use]
    pub fn script_file_name(&self) -> &str {
        &self.script_file_name
    }

    /// Site-relative page path, e.g. `tools/npm/aliyun/`
    #[must_use]
    pub fn page_path(&self) -> &str {
        &self.page_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_url_falls_back_to_origin() {
        let mirror = MirrorDefinition::new("USTC", "https://mirrors.ustc.edu.cn/CRAN/");
        assert_eq!(mirror.test_url().unwrap(), "https://mirrors.ustc.edu.cn");

        let mirror = mirror.with_test_url("https://mirrors.ustc.edu.cn/status");
        assert_eq!(
            mirror.test_url().unwrap(),
            "https://mirrors.ustc.edu.cn/status"
        );
    }

    #[test]
    fn test_os_support_versions_keep_order() {
        let os = OsSupport::requires([("debian-12", "Debian 12"), ("debian-11", "Debian 11")]);
        let keys: Vec<_> = os.versions().map(|(k, _)| k).collect();
        assert_eq!(keys, ["debian-12", "debian-11"]);
        assert_eq!(os.label("debian-11"), Some("Debian 11"));
        assert!(os.requires_os_version());
    }

    #[test]
    fn test_os_support_any_is_empty() {
        let os = OsSupport::Any;
        assert!(os.is_empty());
        assert_eq!(os.versions().count(), 0);
        assert!(!os.requires_os_version());
    }

    #[test]
    fn test_combination_display() {
        let combo = Combination::new("apt", "aliyun", Some("ubuntu-22.04"));
        assert_eq!(combo.to_string(), "apt/ubuntu-22.04/aliyun");
        assert_eq!(combo.script_file_name(), "apt-ubuntu2204-aliyun.sh");
    }

    #[test]
    fn test_category_key_serializes_lowercase() {
        let json = serde_json::to_string(&CategoryKey::Container).unwrap();
        assert_eq!(json, "\"container\"");
    }
}
