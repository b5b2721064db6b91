//! The tool registry and its structural checks.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use tracing::debug;

use crate::builtin;
use crate::error::{Error, Result};
use crate::model::{Category, CategoryKey, Combination, GeneratedArtifact, OsSupport};
use crate::tool::ToolDefinition;
use crate::url::MirrorUrl;

static BUILTIN: LazyLock<Registry> = LazyLock::new(builtin::registry);

/// Ordered collection of tool definitions plus their category grouping.
///
/// The built-in registry is constructed once and never mutated; custom
/// registries can be assembled with [`Registry::new`] and should be checked
/// with [`Registry::validate`] before use.
#[derive(Debug)]
pub struct Registry {
    tools: Vec<ToolDefinition>,
    categories: Vec<Category>,
}

fn is_simple_key(key: &str) -> bool {
    !key.is_empty() && key.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
}

fn is_os_key(key: &str) -> bool {
    key.bytes().next().is_some_and(|b| b.is_ascii_alphanumeric())
        && key
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'.' || b == b'-')
}

impl Registry {
    /// Assemble a registry from parts without checking it.
    #[must_use]
    pub fn new(tools: Vec<ToolDefinition>, categories: Vec<Category>) -> Self {
        Self { tools, categories }
    }

    /// The process-wide built-in registry.
    #[must_use]
    pub fn builtin() -> &'static Self {
        &BUILTIN
    }

    /// Look up a tool by key.
    pub fn tool(&self, key: &str) -> Result<&ToolDefinition> {
        self.tools
            .iter()
            .find(|t| t.key() == key)
            .ok_or_else(|| Error::UnknownTool(key.to_string()))
    }

    /// All tools in registry order
    #[must_use]
    pub fn tools(&self) -> &[ToolDefinition] {
        &self.tools
    }

    /// Categories in display order
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Tools of one category, in the category's order.
    pub fn tools_in(&self, category: CategoryKey) -> impl Iterator<Item = &ToolDefinition> {
        self.categories
            .iter()
            .filter(move |c| c.key == category)
            .flat_map(|c| c.tools.iter())
            .filter_map(|key| self.tool(key).ok())
    }

    /// Every valid `(tool, mirror, os?)` selection, in registry order.
    #[must_use]
    pub fn combinations(&self) -> Vec<Combination> {
        self.tools
            .iter()
            .flat_map(ToolDefinition::combinations)
            .collect()
    }

    /// Number of scripts a full generation run must produce.
    #[must_use]
    pub fn expected_script_count(&self) -> usize {
        self.tools.iter().map(ToolDefinition::script_count).sum()
    }

    /// Total number of mirrors across all tools
    #[must_use]
    pub fn mirror_count(&self) -> usize {
        self.tools.iter().map(|t| t.mirrors().len()).sum()
    }

    /// Render one selection.
    pub fn render(&self, tool: &str, mirror: &str, os: Option<&str>) -> Result<GeneratedArtifact> {
        self.tool(tool)?.render(mirror, os)
    }

    /// Check every structural invariant, naming the first offending key.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for tool in &self.tools {
            if !seen.insert(tool.key()) {
                return Err(Error::invalid_definition(tool.key(), "duplicate tool key"));
            }
            Self::validate_tool(tool)?;
        }
        self.validate_categories()?;
        debug!(
            tools = self.tools.len(),
            scripts = self.expected_script_count(),
            "Registry validated"
        );
        Ok(())
    }

    fn validate_tool(tool: &ToolDefinition) -> Result<()> {
        let key = tool.key();
        if !is_simple_key(key) {
            return Err(Error::invalid_definition(
                key,
                "tool keys must be lowercase letters and digits",
            ));
        }
        if tool.mirrors().is_empty() {
            return Err(Error::invalid_definition(key, "tool has no mirrors"));
        }

        for (mirror_key, mirror) in tool.mirrors() {
            let qualified = format!("{key}.{mirror_key}");
            if !is_simple_key(mirror_key) {
                return Err(Error::invalid_definition(
                    qualified,
                    "mirror keys must be lowercase letters and digits",
                ));
            }
            MirrorUrl::parse(&mirror.url)
                .map_err(|e| Error::invalid_definition(&qualified, e.to_string()))?;
            if let Some(test_url) = &mirror.test_url {
                MirrorUrl::parse(test_url)
                    .map_err(|e| Error::invalid_definition(&qualified, e.to_string()))?;
            }
        }

        if let OsSupport::RequiresOsVersion(versions) = tool.os_support() {
            if versions.is_empty() {
                return Err(Error::invalid_definition(
                    key,
                    "tool requires an OS version but lists none",
                ));
            }
            if let Some(bad) = versions.keys().find(|os| !is_os_key(os)) {
                return Err(Error::invalid_definition(
                    format!("{key}.{bad}"),
                    "OS keys must be lowercase letters, digits, '.' and '-'",
                ));
            }
        }
        Ok(())
    }

    fn validate_categories(&self) -> Result<()> {
        let mut owner: HashMap<&str, CategoryKey> = HashMap::new();
        let mut keys = HashSet::new();
        for category in &self.categories {
            if !keys.insert(category.key) {
                return Err(Error::invalid_definition(
                    category.key.as_str(),
                    "category listed twice",
                ));
            }
            for tool_key in &category.tools {
                let tool = self.tool(tool_key).map_err(|_| {
                    Error::invalid_definition(
                        category.key.as_str(),
                        format!("references unknown tool '{tool_key}'"),
                    )
                })?;
                if owner.insert(tool_key, category.key).is_some() {
                    return Err(Error::invalid_definition(
                        tool_key,
                        "tool appears in more than one category",
                    ));
                }
                if tool.category() != category.key {
                    return Err(Error::invalid_definition(
                        tool_key,
                        format!(
                            "declared in category '{}' but listed under '{}'",
                            tool.category(),
                            category.key
                        ),
                    ));
                }
            }
        }
        if let Some(orphan) = self.tools.iter().find(|t| !owner.contains_key(t.key())) {
            return Err(Error::invalid_definition(
                orphan.key(),
                "tool is not listed in any category",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MirrorDefinition;
    use crate::render::GoRenderer;

    fn tool(key: &str, category: CategoryKey) -> ToolDefinition {
        ToolDefinition::builder(key, category, GoRenderer)
            .mirror("main", MirrorDefinition::new("Main", "https://example.com/"))
            .build()
    }

    #[test]
    fn test_builtin_is_valid() {
        Registry::builtin().validate().unwrap();
    }

    #[test]
    fn test_builtin_counts() {
        let registry = Registry::builtin();
        assert_eq!(registry.tools().len(), 19);
        assert_eq!(registry.categories().len(), 4);
        assert_eq!(registry.combinations().len(), registry.expected_script_count());
    }

    #[test]
    fn test_unknown_tool() {
        assert_eq!(
            Registry::builtin().tool("bogus").unwrap_err(),
            Error::UnknownTool("bogus".to_string())
        );
    }

    #[test]
    fn test_tools_in_category_order() {
        let keys: Vec<_> = Registry::builtin()
            .tools_in(CategoryKey::System)
            .map(ToolDefinition::key)
            .collect();
        assert_eq!(keys, ["apt", "yum", "homebrew"]);
    }

    #[test]
    fn test_validate_rejects_tool_without_mirrors() {
        let empty = ToolDefinition::builder("empty", CategoryKey::Other, GoRenderer).build();
        let registry = Registry::new(vec![empty], vec![Category::new(CategoryKey::Other, ["empty"])]);
        let err = registry.validate().unwrap_err();
        assert_eq!(err, Error::invalid_definition("empty", "tool has no mirrors"));
    }

    #[test]
    fn test_validate_rejects_empty_os_list() {
        let t = ToolDefinition::builder("os", CategoryKey::Other, GoRenderer)
            .mirror("main", MirrorDefinition::new("Main", "https://example.com/"))
            .os_support(OsSupport::requires(Vec::<(String, String)>::new()))
            .build();
        let registry = Registry::new(vec![t], vec![Category::new(CategoryKey::Other, ["os"])]);
        assert!(matches!(
            registry.validate(),
            Err(Error::InvalidDefinition { key, .. }) if key == "os"
        ));
    }

    #[test]
    fn test_validate_rejects_bad_url() {
        let t = ToolDefinition::builder("bad", CategoryKey::Other, GoRenderer)
            .mirror("main", MirrorDefinition::new("Main", "mirrors.example.com"))
            .build();
        let registry = Registry::new(vec![t], vec![Category::new(CategoryKey::Other, ["bad"])]);
        assert!(matches!(
            registry.validate(),
            Err(Error::InvalidDefinition { key, .. }) if key == "bad.main"
        ));
    }

    #[test]
    fn test_validate_rejects_dangling_category_entry() {
        let registry = Registry::new(
            vec![tool("one", CategoryKey::Other)],
            vec![Category::new(CategoryKey::Other, ["one", "ghost"])],
        );
        let err = registry.validate().unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }

    #[test]
    fn test_validate_rejects_tool_in_two_categories() {
        let registry = Registry::new(
            vec![tool("one", CategoryKey::Other)],
            vec![
                Category::new(CategoryKey::Other, ["one"]),
                Category::new(CategoryKey::System, ["one"]),
            ],
        );
        assert!(matches!(
            registry.validate(),
            Err(Error::InvalidDefinition { key, .. }) if key == "one"
        ));
    }

    #[test]
    fn test_validate_rejects_uncategorized_tool() {
        let registry = Registry::new(
            vec![tool("one", CategoryKey::Other), tool("two", CategoryKey::Other)],
            vec![Category::new(CategoryKey::Other, ["one"])],
        );
        assert_eq!(
            registry.validate().unwrap_err(),
            Error::invalid_definition("two", "tool is not listed in any category")
        );
    }

    #[test]
    fn test_validate_rejects_mismatched_category() {
        let registry = Registry::new(
            vec![tool("one", CategoryKey::Language)],
            vec![Category::new(CategoryKey::Other, ["one"])],
        );
        assert!(registry.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_duplicate_tool() {
        let registry = Registry::new(
            vec![tool("one", CategoryKey::Other), tool("one", CategoryKey::Other)],
            vec![Category::new(CategoryKey::Other, ["one"])],
        );
        assert_eq!(
            registry.validate().unwrap_err(),
            Error::invalid_definition("one", "duplicate tool key")
        );
    }

    #[test]
    fn test_os_key_rules() {
        assert!(is_os_key("ubuntu-22.04"));
        assert!(is_os_key("centos-stream-9"));
        assert!(!is_os_key("-leading"));
        assert!(!is_os_key("Ubuntu"));
        assert!(!is_os_key(""));
    }
}
