//! Tool definitions and the validated render context.

use indexmap::IndexMap;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::{
    CategoryKey, Combination, ConfigFile, GeneratedArtifact, MirrorDefinition, OsSupport,
    ToolMetadata,
};
use crate::render::ToolRenderer;

/// A supported package manager: its mirrors, OS support and renderer.
#[derive(Debug)]
pub struct ToolDefinition {
    key: String,
    name: String,
    full_name: String,
    icon: String,
    category: CategoryKey,
    os_support: OsSupport,
    mirrors: IndexMap<String, MirrorDefinition>,
    renderer: Box<dyn ToolRenderer>,
    metadata: Option<ToolMetadata>,
}

impl ToolDefinition {
    /// Start building a tool.
    ///
    /// The renderer is required up front so a definition can never exist
    /// without one.
    pub fn builder(
        key: impl Into<String>,
        category: CategoryKey,
        renderer: impl ToolRenderer + 'static,
    ) -> ToolDefinitionBuilder {
        let key = key.into();
        ToolDefinitionBuilder {
            tool: Self {
                name: key.clone(),
                full_name: key.clone(),
                key,
                icon: String::new(),
                category,
                os_support: OsSupport::Any,
                mirrors: IndexMap::new(),
                renderer: Box::new(renderer),
                metadata: None,
            },
        }
    }

    /// Unique key
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Long name
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Icon glyph
    #[must_use]
    pub fn icon(&self) -> &str {
        &self.icon
    }

    /// Category
    #[must_use]
    pub fn category(&self) -> CategoryKey {
        self.category
    }

    /// OS support
    #[must_use]
    pub fn os_support(&self) -> &OsSupport {
        &self.os_support
    }

    /// Mirrors in registry order
    #[must_use]
    pub fn mirrors(&self) -> &IndexMap<String, MirrorDefinition> {
        &self.mirrors
    }

    /// Metadata, if any
    #[must_use]
    pub fn metadata(&self) -> Option<&ToolMetadata> {
        self.metadata.as_ref()
    }

    /// Look up a mirror by key
    pub fn find_mirror(&self, key: &str) -> Result<&MirrorDefinition> {
        self.mirrors.get(key).ok_or_else(|| Error::UnknownMirror {
            tool: self.key.clone(),
            mirror: key.to_string(),
        })
    }

    /// True when the tool can emit a standalone config file
    #[must_use]
    pub fn has_config_file(&self) -> bool {
        self.renderer.config_file().is_some()
    }

    /// Conventional config file name, for tools that have one
    #[must_use]
    pub fn config_file_name(&self) -> Option<&'static str> {
        self.renderer.config_file().map(|cap| cap.file_name())
    }

    /// All valid selections for this tool, mirror-major then OS order.
    #[must_use]
    pub fn combinations(&self) -> Vec<Combination> {
        let mut out = Vec::with_capacity(self.script_count());
        for mirror in self.mirrors.keys() {
            match &self.os_support {
                OsSupport::Any => out.push(Combination::new(&self.key, mirror, None)),
                OsSupport::RequiresOsVersion(versions) => {
                    for os in versions.keys() {
                        out.push(Combination::new(&self.key, mirror, Some(os.as_str())));
                    }
                }
            }
        }
        out
    }

    /// `|mirrors| * max(1, |os versions|)`
    #[must_use]
    pub fn script_count(&self) -> usize {
        self.mirrors.len() * self.os_support.len().max(1)
    }

    /// Validate a selection and bind it into a [`RenderContext`].
    pub fn context<'a>(&'a self, mirror: &str, os: Option<&str>) -> Result<RenderContext<'a>> {
        let (mirror_key, mirror_def) =
            self.mirrors
                .get_key_value(mirror)
                .ok_or_else(|| Error::UnknownMirror {
                    tool: self.key.clone(),
                    mirror: mirror.to_string(),
                })?;

        let os_version = match (&self.os_support, os) {
            (OsSupport::Any, None) => None,
            (OsSupport::Any, Some(os)) => {
                return Err(Error::OsVersionNotSupported {
                    tool: self.key.clone(),
                    os: os.to_string(),
                });
            }
            (OsSupport::RequiresOsVersion(_), None) => {
                return Err(Error::OsVersionRequired {
                    tool: self.key.clone(),
                });
            }
            (OsSupport::RequiresOsVersion(versions), Some(os)) => {
                let (key, label) =
                    versions
                        .get_key_value(os)
                        .ok_or_else(|| Error::UnknownOsVersion {
                            tool: self.key.clone(),
                            os: os.to_string(),
                        })?;
                Some(OsVersion { key, label })
            }
        };

        Ok(RenderContext {
            tool: self,
            mirror_key,
            mirror: mirror_def,
            os_version,
        })
    }

    /// Render the full setup script.
    pub fn render_script(&self, mirror: &str, os: Option<&str>) -> Result<String> {
        let ctx = self.context(mirror, os)?;
        self.renderer.script(&ctx)
    }

    /// Render the short manual snippet.
    pub fn render_manual_command(&self, mirror: &str, os: Option<&str>) -> Result<String> {
        let ctx = self.context(mirror, os)?;
        self.renderer.manual_command(&ctx)
    }

    /// Render the config file body, or `None` when the tool has no config file.
    pub fn render_config_file(&self, mirror: &str, os: Option<&str>) -> Result<Option<String>> {
        let ctx = self.context(mirror, os)?;
        self.renderer
            .config_file()
            .map(|cap| cap.render_config_file(&ctx))
            .transpose()
    }

    /// Render every output for one selection.
    pub fn render(&self, mirror: &str, os: Option<&str>) -> Result<GeneratedArtifact> {
        let ctx = self.context(mirror, os)?;
        debug!(tool = %self.key, mirror, os, "Rendering artifact");

        let script = self.renderer.script(&ctx)?;
        let manual = self.renderer.manual_command(&ctx)?;
        let config_file = match self.renderer.config_file() {
            Some(cap) => Some(ConfigFile {
                file_name: cap.file_name().to_string(),
                content: cap.render_config_file(&ctx)?,
            }),
            None => None,
        };

        Ok(GeneratedArtifact::new(
            Combination::new(&self.key, mirror, os),
            script,
            manual,
            config_file,
        ))
    }
}

/// Builder for [`ToolDefinition`].
#[derive(Debug)]
pub struct ToolDefinitionBuilder {
    tool: ToolDefinition,
}

impl ToolDefinitionBuilder {
    /// Set the display name
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.tool.name = name.into();
        self
    }

    /// Set the long name
    #[must_use]
    pub fn full_name(mut self, full_name: impl Into<String>) -> Self {
        self.tool.full_name = full_name.into();
        self
    }

    /// Set the icon glyph
    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.tool.icon = icon.into();
        self
    }

    /// Add a mirror, keeping insertion order
    #[must_use]
    pub fn mirror(mut self, key: impl Into<String>, mirror: MirrorDefinition) -> Self {
        self.tool.mirrors.insert(key.into(), mirror);
        self
    }

    /// Set OS support
    #[must_use]
    pub fn os_support(mut self, os_support: OsSupport) -> Self {
        self.tool.os_support = os_support;
        self
    }

    /// Attach descriptive metadata
    #[must_use]
    pub fn metadata(mut self, metadata: ToolMetadata) -> Self {
        self.tool.metadata = Some(metadata);
        self
    }

    /// Finish building
    #[must_use]
    pub fn build(self) -> ToolDefinition {
        self.tool
    }
}

/// An OS version key together with its label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OsVersion<'a> {
    /// OS key, e.g. `ubuntu-22.04`
    pub key: &'a str,
    /// Display label
    pub label: &'a str,
}

/// A selection that has been checked against its tool definition.
///
/// Only [`ToolDefinition::context`] constructs one, so renderers can rely on
/// the mirror existing and the OS version being present exactly when the tool
/// needs it.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    tool: &'a ToolDefinition,
    mirror_key: &'a str,
    mirror: &'a MirrorDefinition,
    os_version: Option<OsVersion<'a>>,
}

impl<'a> RenderContext<'a> {
    /// Tool being rendered
    #[must_use]
    pub fn tool(&self) -> &'a ToolDefinition {
        self.tool
    }

    /// Mirror key, e.g. `aliyun`
    #[must_use]
    pub fn mirror_key(&self) -> &'a str {
        self.mirror_key
    }

    /// Mirror definition
    #[must_use]
    pub fn mirror(&self) -> &'a MirrorDefinition {
        self.mirror
    }

    /// OS version, when the tool requires one
    #[must_use]
    pub fn os_version(&self) -> Option<OsVersion<'a>> {
        self.os_version
    }

    /// OS version for renderers of OS-sensitive tools.
    pub fn require_os(&self) -> Result<OsVersion<'a>> {
        self.os_version.ok_or_else(|| Error::OsVersionRequired {
            tool: self.tool.key.clone(),
        })
    }

    /// Render error tagged with this tool's key
    #[must_use]
    pub fn render_error(&self, message: impl Into<String>) -> Error {
        Error::render(&self.tool.key, message)
    }
}
