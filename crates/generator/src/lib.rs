//! # mirrorkit-generator
//!
//! Expands the mirror registry into a static site:
//!
//! - `scripts/{file}.sh` for every tool x mirror x OS-version combination
//! - `tools/.../index.html` per combination, a page per tool, a tools
//!   overview and a home page
//! - `scripts/index.json`, `scripts/test-matrix.json`,
//!   `scripts/diff-report.json`, `sitemap.xml` and `robots.txt`
//!
//! Generation continues past individual failures and reports them in a
//! [`Summary`]. Output is deterministic: unchanged inputs (and a fixed
//! `lastmod`) produce byte-identical files.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod diff;
pub mod error;
pub mod generator;
mod html;
pub mod manifest;
pub mod matrix;
pub mod output;
mod pages;
pub mod plan;
pub mod sitemap;
pub mod summary;

pub use config::{SITE_CONFIG_FILE, SiteConfig};
pub use error::{Error, Result};
pub use generator::{BuildReport, GenerateOptions, Generator};
pub use html::{escape_html, escape_xml};
pub use manifest::{Manifest, ManifestEntry};
pub use pages::one_click_command;
pub use plan::{Collision, CollisionKind, Plan};
pub use summary::{Failure, ScriptIssues, Summary, ValidationTally};
