//! `scripts/test-matrix.json`: one row per combination for manual testing.

use mirrorkit_registry::{CategoryKey, Combination, Registry, Result};
use serde::Serialize;

/// Label used when a tool is OS-independent
const ALL_SYSTEMS: &str = "All";

/// One combination to test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs)]
pub struct MatrixRow {
    pub tool: String,
    pub tool_name: String,
    pub mirror: String,
    pub mirror_name: String,
    pub os: Option<String>,
    /// OS label, or `All` for OS-independent tools
    pub os_name: String,
    pub script_file: String,
    pub category: CategoryKey,
}

/// Build rows for `combinations`, resolving names through `registry`.
///
/// # Errors
///
/// Returns an error if a combination names a tool, mirror or OS version the
/// registry does not know.
pub fn test_matrix(registry: &Registry, combinations: &[Combination]) -> Result<Vec<MatrixRow>> {
    combinations
        .iter()
        .map(|combo| {
            let tool = registry.tool(&combo.tool)?;
            let ctx = tool.context(&combo.mirror, combo.os_version.as_deref())?;
            Ok(MatrixRow {
                tool: combo.tool.clone(),
                tool_name: tool.name().to_string(),
                mirror: combo.mirror.clone(),
                mirror_name: ctx.mirror().name.clone(),
                os: combo.os_version.clone(),
                os_name: ctx
                    .os_version()
                    .map_or(ALL_SYSTEMS, |os| os.label)
                    .to_string(),
                script_file: combo.script_file_name(),
                category: tool.category(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_carry_names_and_labels() {
        let registry = Registry::builtin();
        let rows = test_matrix(
            registry,
            &[
                Combination::new("npm", "aliyun", None),
                Combination::new("apt", "aliyun", Some("ubuntu-22.04")),
            ],
        )
        .unwrap();

        assert_eq!(rows[0].os_name, "All");
        assert_eq!(rows[0].os, None);
        assert_eq!(rows[0].mirror_name, "Alibaba Cloud");
        assert_eq!(rows[1].os.as_deref(), Some("ubuntu-22.04"));
        assert_eq!(rows[1].os_name, "Ubuntu 22.04 LTS (Jammy Jellyfish)");
        assert_eq!(rows[1].script_file, "apt-ubuntu2204-aliyun.sh");
    }

    #[test]
    fn test_unknown_combination_is_error() {
        let result = test_matrix(Registry::builtin(), &[Combination::new("npm", "moon", None)]);
        assert!(result.is_err());
    }
}
