//! Stage orchestration: scripts, pages, sitemap and validation.

use std::path::PathBuf;

use mirrorkit_registry::{Combination, Registry, tool_page_path};
use mirrorkit_validate::ValidationReport;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::SiteConfig;
use crate::diff::diff_report;
use crate::html::{STYLESHEET, STYLESHEET_PATH};
use crate::error::Result;
use crate::manifest::{Manifest, ManifestEntry};
use crate::matrix::test_matrix;
use crate::output::OutputDir;
use crate::pages;
use crate::plan::Plan;
use crate::sitemap::{render_sitemap, robots_txt, sitemap_urls};
use crate::summary::{Failure, Summary, ValidationTally};

/// Manifest location, relative to the output root
pub const MANIFEST_PATH: &str = "scripts/index.json";
/// Test matrix location
pub const TEST_MATRIX_PATH: &str = "scripts/test-matrix.json";
/// Diff report location
pub const DIFF_REPORT_PATH: &str = "scripts/diff-report.json";
/// Sitemap location
pub const SITEMAP_PATH: &str = "sitemap.xml";
/// robots.txt location
pub const ROBOTS_PATH: &str = "robots.txt";

/// Options for a generation run
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// Output root; scripts land in `scripts/`, pages beside it
    pub output_dir: PathBuf,
    /// Site settings
    pub site: SiteConfig,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("dist"),
            site: SiteConfig::default(),
        }
    }
}

/// Outcome of [`Generator::build`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BuildReport {
    /// Per-stage summaries in run order
    pub stages: Vec<Summary>,
}

impl BuildReport {
    /// True when every stage succeeded
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.stages.iter().all(Summary::is_success)
    }
}

/// Expands a registry into the static site.
///
/// Enumeration is planned once at construction; combinations whose derived
/// names collide are excluded from every stage.
#[derive(Debug)]
pub struct Generator<'r> {
    registry: &'r Registry,
    plan: Plan,
    site: SiteConfig,
    out: OutputDir,
}

impl<'r> Generator<'r> {
    /// Plan generation of `registry` with `options`
    #[must_use]
    pub fn new(registry: &'r Registry, options: GenerateOptions) -> Self {
        Self {
            registry,
            plan: Plan::new(registry),
            site: options.site,
            out: OutputDir::new(options.output_dir),
        }
    }

    /// The planned combinations
    #[must_use]
    pub const fn plan(&self) -> &Plan {
        &self.plan
    }

    /// The output directory
    #[must_use]
    pub const fn output(&self) -> &OutputDir {
        &self.out
    }

    fn stage(&self, name: &'static str) -> Summary {
        let mut summary = Summary::new(name);
        summary.record_collisions(self.plan.collisions(), self.plan.excluded());
        summary
    }

    fn render_and_validate(&self, combo: &Combination) -> Result<(String, ValidationReport)> {
        let tool = self.registry.tool(&combo.tool)?;
        let script = tool.render_script(&combo.mirror, combo.os_version.as_deref())?;
        let report = mirrorkit_validate::validate(&script);
        if !report.is_valid() {
            warn!(
                file = %combo.script_file_name(),
                issues = ?report.messages(),
                "Script has validation issues"
            );
        }
        Ok((script, report))
    }

    /// Write every script plus the manifest, test matrix and diff report.
    ///
    /// # Errors
    ///
    /// Per-script failures are recorded in the summary; an error is returned
    /// only when an aggregate report cannot be written.
    pub fn scripts(&self) -> Result<Summary> {
        let mut summary = self.stage("scripts");
        let mut tally = ValidationTally::default();
        let mut entries = Vec::new();

        for combo in self.plan.items() {
            let file = combo.script_file_name();
            let written = self.render_and_validate(combo).and_then(|(script, report)| {
                self.out.write(&format!("scripts/{file}"), &script)?;
                Ok(report)
            });
            match written {
                Ok(report) => {
                    tally.record(&file, &report);
                    let category = self.registry.tool(&combo.tool)?.category();
                    entries.push(ManifestEntry::new(combo, category));
                    summary.succeed();
                }
                Err(e) => summary.fail(Failure::new(combo, e)),
            }
        }

        let manifest = Manifest::new(
            self.registry,
            entries,
            tally.clone(),
            summary.failures.clone(),
        );
        self.out.write_json(MANIFEST_PATH, &manifest)?;
        self.out
            .write_json(TEST_MATRIX_PATH, &test_matrix(self.registry, self.plan.items())?)?;
        self.out
            .write_json(DIFF_REPORT_PATH, &diff_report(self.registry))?;

        summary.validation = Some(tally);
        info!("{summary}");
        Ok(summary)
    }

    /// Render and validate every script without writing anything.
    #[must_use]
    pub fn validate(&self) -> Summary {
        let mut summary = self.stage("validate");
        let mut tally = ValidationTally::default();
        for combo in self.plan.items() {
            match self.render_and_validate(combo) {
                Ok((_, report)) => {
                    tally.record(&combo.script_file_name(), &report);
                    summary.succeed();
                }
                Err(e) => summary.fail(Failure::new(combo, e)),
            }
        }
        summary.validation = Some(tally);
        info!("{summary}");
        summary
    }

    fn write_page(&self, summary: &mut Summary, path: &str, html: &str) {
        match self.out.write(&format!("{path}index.html"), html) {
            Ok(_) => summary.succeed(),
            Err(e) => summary.fail(Failure::at(path, e)),
        }
    }

    /// Write every combination page, every tool page, the tools overview,
    /// the home page and the stylesheet they link.
    #[must_use]
    pub fn pages(&self) -> Summary {
        let mut summary = self.stage("pages");

        match self.out.write(STYLESHEET_PATH, STYLESHEET) {
            Ok(_) => summary.succeed(),
            Err(e) => summary.fail(Failure::at(STYLESHEET_PATH, e)),
        }

        for combo in self.plan.items() {
            let page = self.registry.tool(&combo.tool).and_then(|tool| {
                let artifact = tool.render(&combo.mirror, combo.os_version.as_deref())?;
                Ok(pages::combination_page(&self.site, tool, &artifact))
            });
            match page {
                Ok(html) => self.write_page(&mut summary, &combo.page_path(), &html),
                Err(e) => summary.fail(Failure::new(combo, e)),
            }
        }

        for tool in self.registry.tools() {
            let html = pages::tool_page(&self.site, tool);
            self.write_page(&mut summary, &tool_page_path(tool.key()), &html);
        }
        let overview = pages::overview_page(&self.site, self.registry);
        self.write_page(&mut summary, "tools/", &overview);
        let home = pages::home_page(&self.site, self.registry);
        self.write_page(&mut summary, "", &home);

        info!("{summary}");
        summary
    }

    /// Write `sitemap.xml` and `robots.txt`.
    #[must_use]
    pub fn sitemap(&self) -> Summary {
        let mut summary = Summary::new("sitemap");
        let urls = sitemap_urls(&self.site, self.registry, self.plan.items());
        let files = [
            (SITEMAP_PATH, render_sitemap(&urls, &self.site.lastmod())),
            (ROBOTS_PATH, robots_txt(&self.site)),
        ];
        for (path, content) in files {
            match self.out.write(path, &content) {
                Ok(written) => {
                    info!("Generated: {}", written.display());
                    summary.succeed();
                }
                Err(e) => summary.fail(Failure::at(path, e)),
            }
        }
        info!(urls = urls.len(), "{summary}");
        summary
    }

    /// Run scripts, pages and sitemap in sequence. Later stages run even
    /// when earlier ones had failures; partial output is kept.
    ///
    /// # Errors
    ///
    /// Returns an error when an aggregate report cannot be written.
    pub fn build(&self) -> Result<BuildReport> {
        let stages = vec![self.scripts()?, self.pages(), self.sitemap()];
        Ok(BuildReport { stages })
    }
}
