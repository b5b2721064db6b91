//! `scripts/index.json`: the index of generated scripts.
//!
//! The manifest deliberately carries no wall-clock timestamp so that
//! unchanged inputs produce byte-identical output.

use mirrorkit_registry::{CategoryKey, Combination, Registry};
use serde::Serialize;

use crate::summary::{Failure, ValidationTally};

/// One written script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    /// Tool key
    pub tool: String,
    /// Mirror key
    pub mirror: String,
    /// OS version key, if the tool takes one
    pub os_version: Option<String>,
    /// Tool category
    pub category: CategoryKey,
    /// Script file name under `scripts/`
    pub file: String,
    /// Site-relative page path
    pub page: String,
}

impl ManifestEntry {
    /// Entry for `combination`, whose tool belongs to `category`
    #[must_use]
    pub fn new(combination: &Combination, category: CategoryKey) -> Self {
        Self {
            tool: combination.tool.clone(),
            mirror: combination.mirror.clone(),
            os_version: combination.os_version.clone(),
            category,
            file: combination.script_file_name(),
            page: combination.page_path(),
        }
    }
}

/// Aggregate counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    /// Scripts written
    pub scripts: usize,
    /// Tools in the registry
    pub tools: usize,
    /// Mirror definitions across all tools
    pub mirrors: usize,
    /// Categories in the registry
    pub categories: usize,
}

/// The full manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Aggregate counts
    pub totals: Totals,
    /// Category keys in display order
    pub categories: Vec<CategoryKey>,
    /// Written scripts in registry order
    pub scripts: Vec<ManifestEntry>,
    /// Validation counts
    pub validation: ValidationTally,
    /// Items that failed or collided
    pub failures: Vec<Failure>,
}

impl Manifest {
    /// Assemble the manifest for one scripts run
    #[must_use]
    pub fn new(
        registry: &Registry,
        scripts: Vec<ManifestEntry>,
        validation: ValidationTally,
        failures: Vec<Failure>,
    ) -> Self {
        Self {
            totals: Totals {
                scripts: scripts.len(),
                tools: registry.tools().len(),
                mirrors: registry.mirror_count(),
                categories: registry.categories().len(),
            },
            categories: registry.categories().iter().map(|c| c.key).collect(),
            scripts,
            validation,
            failures,
        }
    }
}
