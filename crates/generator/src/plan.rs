//! Enumeration of the combinations to generate, with collision detection.
//!
//! File names and page paths are derived from keys and are expected to be
//! unique across the registry. That is checked here rather than assumed:
//! every combination that shares a file name or page path with another is
//! excluded and reported, so one can never silently overwrite another.

use std::collections::HashSet;

use indexmap::IndexMap;
use mirrorkit_registry::{Combination, Registry};
use serde::Serialize;
use tracing::warn;

/// Which derived name collided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum CollisionKind {
    /// Two combinations map to the same `scripts/*.sh` file
    ScriptFileName,
    /// Two combinations map to the same page directory
    PagePath,
}

/// A derived name claimed by more than one combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Collision {
    /// Kind of name
    pub kind: CollisionKind,
    /// The contested file name or page path
    pub name: String,
    /// Every combination that claimed it, in enumeration order
    pub claimants: Vec<Combination>,
}

/// The combinations a run will generate.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    items: Vec<Combination>,
    collisions: Vec<Collision>,
    excluded: usize,
}

impl Plan {
    /// Plan every combination of `registry`
    #[must_use]
    pub fn new(registry: &Registry) -> Self {
        Self::from_combinations(registry.combinations())
    }

    /// Plan an explicit list of combinations
    #[must_use]
    pub fn from_combinations(combinations: Vec<Combination>) -> Self {
        let mut collisions = Vec::new();
        collisions.extend(find_collisions(
            &combinations,
            CollisionKind::ScriptFileName,
            Combination::script_file_name,
        ));
        collisions.extend(find_collisions(
            &combinations,
            CollisionKind::PagePath,
            Combination::page_path,
        ));

        let excluded: HashSet<&Combination> =
            collisions.iter().flat_map(|c| c.claimants.iter()).collect();
        for collision in &collisions {
            let claimants: Vec<String> = collision.claimants.iter().map(ToString::to_string).collect();
            warn!(
                name = %collision.name,
                claimants = %claimants.join(", "),
                "Derived name collision, excluding all claimants"
            );
        }

        let excluded_count = excluded.len();
        let items = combinations
            .iter()
            .filter(|c| !excluded.contains(c))
            .cloned()
            .collect();
        Self {
            items,
            collisions,
            excluded: excluded_count,
        }
    }

    /// Combinations to generate, in registry order
    #[must_use]
    pub fn items(&self) -> &[Combination] {
        &self.items
    }

    /// Detected collisions
    #[must_use]
    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    /// Number of distinct combinations excluded because of collisions
    #[must_use]
    pub const fn excluded(&self) -> usize {
        self.excluded
    }
}

fn find_collisions(
    combinations: &[Combination],
    kind: CollisionKind,
    name_of: impl Fn(&Combination) -> String,
) -> Vec<Collision> {
    let mut by_name: IndexMap<String, Vec<&Combination>> = IndexMap::new();
    for combo in combinations {
        by_name.entry(name_of(combo)).or_default().push(combo);
    }
    by_name
        .into_iter()
        .filter(|(_, claimants)| claimants.len() > 1)
        .map(|(name, claimants)| Collision {
            kind,
            name,
            claimants: claimants.into_iter().cloned().collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_plan_has_no_collisions() {
        let registry = Registry::builtin();
        let plan = Plan::new(registry);
        assert!(plan.collisions().is_empty());
        assert_eq!(plan.items().len(), registry.expected_script_count());
    }

    #[test]
    fn test_normalization_collision_excludes_every_claimant() {
        let plan = Plan::from_combinations(vec![
            Combination::new("apt", "aliyun", Some("ubuntu-22.04")),
            Combination::new("apt", "aliyun", Some("ubuntu-2-204")),
            Combination::new("apt", "aliyun", Some("debian-12")),
        ]);

        assert_eq!(plan.collisions().len(), 1);
        let collision = &plan.collisions()[0];
        assert_eq!(collision.kind, CollisionKind::ScriptFileName);
        assert_eq!(collision.name, "apt-ubuntu2204-aliyun.sh");
        assert_eq!(collision.claimants.len(), 2);
        assert_eq!(plan.excluded(), 2);
        assert_eq!(
            plan.items(),
            [Combination::new("apt", "aliyun", Some("debian-12"))]
        );
    }

    #[test]
    fn test_duplicate_combination_collides_on_both_names() {
        let combo = Combination::new("npm", "aliyun", None);
        let plan = Plan::from_combinations(vec![combo.clone(), combo]);
        let kinds: Vec<_> = plan.collisions().iter().map(|c| c.kind).collect();
        assert_eq!(kinds, [CollisionKind::ScriptFileName, CollisionKind::PagePath]);
        assert!(plan.items().is_empty());
        assert_eq!(plan.excluded(), 1);
    }

    proptest::proptest! {
        #[test]
        fn test_planned_items_never_share_names(
            os_keys in proptest::collection::vec("[a-z]{1,3}[-.]?[0-9]{1,2}[-.]?[0-9]?", 1..8),
        ) {
            let combos: Vec<Combination> = os_keys
                .iter()
                .map(|os| Combination::new("apt", "aliyun", Some(os.as_str())))
                .collect();
            let plan = Plan::from_combinations(combos.clone());

            let files: HashSet<String> =
                plan.items().iter().map(Combination::script_file_name).collect();
            let pages: HashSet<String> = plan.items().iter().map(Combination::page_path).collect();
            proptest::prop_assert_eq!(files.len(), plan.items().len());
            proptest::prop_assert_eq!(pages.len(), plan.items().len());

            let distinct: HashSet<&Combination> = combos.iter().collect();
            proptest::prop_assert_eq!(plan.items().len() + plan.excluded(), distinct.len());
        }
    }
}
