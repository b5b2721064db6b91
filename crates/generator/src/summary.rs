//! Per-stage outcome tallies.

use std::fmt;

use mirrorkit_registry::Combination;
use mirrorkit_validate::{Issue, ValidationReport};
use serde::Serialize;

use crate::plan::Collision;

/// One item that could not be generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Failure {
    /// Combination or output the failure belongs to, e.g. `apt/debian-12/ustc`
    pub item: String,
    /// Why it failed
    pub reason: String,
}

impl Failure {
    /// Failure of one combination
    pub fn new(combination: &Combination, reason: impl fmt::Display) -> Self {
        Self {
            item: combination.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Failure of a non-combination output such as a tool page
    pub fn at(item: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self {
            item: item.into(),
            reason: reason.to_string(),
        }
    }

    /// One failure per claimant of a collision
    #[must_use]
    pub fn from_collision(collision: &Collision) -> Vec<Self> {
        collision
            .claimants
            .iter()
            .map(|claimant| Self {
                item: claimant.to_string(),
                reason: format!(
                    "derived name '{}' is shared by {} combinations",
                    collision.name,
                    collision.claimants.len()
                ),
            })
            .collect()
    }
}

/// Issues of one script that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptIssues {
    /// Script file name
    pub file: String,
    /// Issues in script order
    pub issues: Vec<Issue>,
}

/// Validation counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationTally {
    /// Scripts validated
    pub total: usize,
    /// Scripts without issues
    pub valid: usize,
    /// Scripts with at least one issue
    pub with_issues: usize,
    /// Details for scripts with issues
    pub issues: Vec<ScriptIssues>,
}

impl ValidationTally {
    /// Count one report
    pub fn record(&mut self, file: &str, report: &ValidationReport) {
        self.total += 1;
        if report.is_valid() {
            self.valid += 1;
        } else {
            self.with_issues += 1;
            self.issues.push(ScriptIssues {
                file: file.to_string(),
                issues: report.issues().to_vec(),
            });
        }
    }
}

/// Outcome of one generation stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Stage name (`scripts`, `pages`, `sitemap`, `validate`)
    pub stage: &'static str,
    /// Items attempted, collided ones included
    pub total: usize,
    /// Items written
    pub succeeded: usize,
    /// Items that failed or collided
    pub failures: Vec<Failure>,
    /// Claimants excluded because of collisions
    pub collided: usize,
    /// Validation counts, for stages that validate
    pub validation: Option<ValidationTally>,
}

impl Summary {
    pub(crate) fn new(stage: &'static str) -> Self {
        Self {
            stage,
            total: 0,
            succeeded: 0,
            failures: Vec::new(),
            collided: 0,
            validation: None,
        }
    }

    pub(crate) fn record_collisions(&mut self, collisions: &[Collision], excluded: usize) {
        self.collided = excluded;
        self.total += excluded;
        self.failures
            .extend(collisions.iter().flat_map(Failure::from_collision));
    }

    pub(crate) fn succeed(&mut self) {
        self.total += 1;
        self.succeeded += 1;
    }

    pub(crate) fn fail(&mut self, failure: Failure) {
        tracing::warn!(item = %failure.item, reason = %failure.reason, "Generation failed");
        self.total += 1;
        self.failures.push(failure);
    }

    /// Items that failed to render or write, collisions excluded
    #[must_use]
    pub fn failed(&self) -> usize {
        self.total - self.succeeded - self.collided
    }

    /// True when nothing failed or collided
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.succeeded == self.total
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {}/{} succeeded, {} failed, {} collided",
            self.stage,
            self.succeeded,
            self.total,
            self.failed(),
            self.collided
        )?;
        if let Some(v) = &self.validation {
            write!(f, ", {} validated ({} with issues)", v.valid, v.with_issues)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::Plan;

    #[test]
    fn test_summary_line() {
        let mut summary = Summary::new("scripts");
        summary.succeed();
        summary.succeed();
        summary.fail(Failure::new(
            &Combination::new("npm", "aliyun", None),
            "boom",
        ));
        summary.validation = Some(ValidationTally {
            total: 2,
            valid: 1,
            with_issues: 1,
            issues: Vec::new(),
        });
        assert_eq!(
            summary.to_string(),
            "scripts: 2/3 succeeded, 1 failed, 0 collided, 1 validated (1 with issues)"
        );
        assert!(!summary.is_success());
    }

    #[test]
    fn test_collisions_count_as_failures() {
        let plan = Plan::from_combinations(vec![
            Combination::new("apt", "aliyun", Some("ubuntu-22.04")),
            Combination::new("apt", "aliyun", Some("ubuntu-2-204")),
        ]);
        let mut summary = Summary::new("scripts");
        summary.record_collisions(plan.collisions(), plan.excluded());

        assert_eq!(summary.total, 2);
        assert_eq!(summary.failed(), 0);
        assert_eq!(summary.collided, 2);
        assert_eq!(summary.failures.len(), 2);
        assert_eq!(summary.failures[0].item, "apt/ubuntu-22.04/aliyun");
        assert!(!summary.is_success());
    }

    #[test]
    fn test_tally_records_issue_details() {
        let mut tally = ValidationTally::default();
        tally.record("good.sh", &mirrorkit_validate::validate("#!/bin/sh\necho ok\n"));
        tally.record("bad.sh", &mirrorkit_validate::validate("echo ok\n"));
        assert_eq!((tally.total, tally.valid, tally.with_issues), (2, 1, 1));
        assert_eq!(tally.issues[0].file, "bad.sh");
    }
}
