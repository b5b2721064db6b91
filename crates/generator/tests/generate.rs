//! End-to-end generation into temporary directories.

use std::collections::BTreeMap;
use std::path::Path;

use mirrorkit_generator::{GenerateOptions, Generator, SiteConfig, escape_html};
use mirrorkit_registry::{
    Category, CategoryKey, MirrorDefinition, OsSupport, Registry, RenderContext, ToolDefinition,
    ToolRenderer,
};
use tempfile::TempDir;

fn options(dir: &Path) -> GenerateOptions {
    GenerateOptions {
        output_dir: dir.to_path_buf(),
        site: SiteConfig {
            lastmod: Some("2024-05-01".to_string()),
            ..SiteConfig::default()
        }
        .with_site_url("https://mirrors.test/")
        .unwrap(),
    }
}

fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    fn walk(dir: &Path, root: &Path, files: &mut BTreeMap<String, Vec<u8>>) {
        for entry in std::fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, root, files);
            } else {
                let rel = path.strip_prefix(root).unwrap().to_string_lossy().into_owned();
                files.insert(rel, std::fs::read(&path).unwrap());
            }
        }
    }
    let mut files = BTreeMap::new();
    walk(root, root, &mut files);
    files
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_build_writes_every_artifact() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::builtin();
    let report = Generator::new(registry, options(dir.path())).build().unwrap();
    assert!(report.is_success(), "{:?}", report.stages);

    let expected = registry.expected_script_count();
    let scripts = std::fs::read_dir(dir.path().join("scripts"))
        .unwrap()
        .filter(|e| {
            e.as_ref()
                .unwrap()
                .path()
                .extension()
                .is_some_and(|ext| ext == "sh")
        })
        .count();
    assert_eq!(scripts, expected);

    let manifest = read_json(&dir.path().join("scripts/index.json"));
    assert_eq!(manifest["totals"]["scripts"], expected);
    assert_eq!(manifest["totals"]["tools"], registry.tools().len());
    assert_eq!(manifest["validation"]["total"], expected);
    assert_eq!(manifest["validation"]["withIssues"], 0);
    assert_eq!(manifest["failures"].as_array().unwrap().len(), 0);

    let matrix = read_json(&dir.path().join("scripts/test-matrix.json"));
    assert_eq!(matrix.as_array().unwrap().len(), expected);
    let diff = read_json(&dir.path().join("scripts/diff-report.json"));
    assert_eq!(diff.as_array().unwrap().len(), 2);

    for combo in registry.combinations() {
        let page = dir.path().join(combo.page_path()).join("index.html");
        assert!(page.is_file(), "missing page for {combo}");
    }
    assert!(dir.path().join("tools/npm/index.html").is_file());
    assert!(dir.path().join("tools/index.html").is_file());
    assert!(dir.path().join("index.html").is_file());
    assert!(dir.path().join("robots.txt").is_file());

    let home = std::fs::read_to_string(dir.path().join("index.html")).unwrap();
    assert!(home.contains("<link rel=\"stylesheet\" href=\"/style.css\">"));
    let css = std::fs::read_to_string(dir.path().join("style.css")).unwrap();
    assert!(css.contains(".breadcrumb{"));

    let sitemap = std::fs::read_to_string(dir.path().join("sitemap.xml")).unwrap();
    assert!(sitemap.contains("<loc>https://mirrors.test/scripts/npm-aliyun.sh</loc>"));
    assert!(sitemap.contains("<lastmod>2024-05-01</lastmod>"));
}

#[test]
fn test_script_and_page_match_registry_output() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::builtin();
    let generator = Generator::new(registry, options(dir.path()));
    assert!(generator.scripts().unwrap().is_success());
    assert!(generator.pages().is_success());

    let artifact = registry.render("apt", "aliyun", Some("ubuntu-22.04")).unwrap();
    let written =
        std::fs::read_to_string(dir.path().join("scripts/apt-ubuntu2204-aliyun.sh")).unwrap();
    assert_eq!(written, artifact.script());

    let page = std::fs::read_to_string(
        dir.path().join("tools/apt/ubuntu-22.04/aliyun/index.html"),
    )
    .unwrap();
    assert!(page.contains(&escape_html(artifact.script())));
    assert!(page.contains("curl -sSL https://mirrors.test/scripts/apt-ubuntu2204-aliyun.sh | bash"));
}

#[test]
fn test_output_is_byte_identical_across_runs() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();
    Generator::new(Registry::builtin(), options(first.path()))
        .build()
        .unwrap();
    Generator::new(Registry::builtin(), options(second.path()))
        .build()
        .unwrap();
    assert_eq!(snapshot(first.path()), snapshot(second.path()));
}

#[test]
fn test_rerun_overwrites_in_place() {
    let dir = TempDir::new().unwrap();
    let generator = Generator::new(Registry::builtin(), options(dir.path()));
    generator.scripts().unwrap();
    let target = dir.path().join("scripts/npm-aliyun.sh");
    std::fs::write(&target, "stale").unwrap();
    generator.scripts().unwrap();
    assert!(std::fs::read_to_string(target).unwrap().starts_with("#!/bin/bash"));
}

#[derive(Debug)]
struct FlakyRenderer;

impl ToolRenderer for FlakyRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> mirrorkit_registry::Result<String> {
        if ctx.mirror_key() == "broken" {
            return Err(ctx.render_error("upstream template missing"));
        }
        let os = ctx.os_version().map_or("any", |os| os.key);
        Ok(format!("#!/bin/bash\necho \"{} on {os}\"\n", ctx.mirror().name))
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> mirrorkit_registry::Result<String> {
        Ok(format!("echo {}", ctx.mirror().url))
    }
}

fn custom_registry(os: OsSupport) -> Registry {
    let tool = ToolDefinition::builder("demo", CategoryKey::Other, FlakyRenderer)
        .name("Demo")
        .mirror("good", MirrorDefinition::new("Good", "https://good.example.com"))
        .mirror("broken", MirrorDefinition::new("Broken", "https://broken.example.com"))
        .os_support(os)
        .build();
    Registry::new(vec![tool], vec![Category::new(CategoryKey::Other, ["demo"])])
}

#[test]
fn test_render_failure_is_recorded_and_generation_continues() {
    let dir = TempDir::new().unwrap();
    let registry = custom_registry(OsSupport::Any);
    let summary = Generator::new(&registry, options(dir.path()))
        .scripts()
        .unwrap();

    assert_eq!(summary.total, 2);
    assert_eq!(summary.succeeded, 1);
    assert_eq!(summary.failed(), 1);
    assert_eq!(summary.failures[0].item, "demo/broken");
    assert!(summary.failures[0].reason.contains("upstream template missing"));
    assert!(!summary.is_success());

    assert!(dir.path().join("scripts/demo-good.sh").is_file());
    assert!(!dir.path().join("scripts/demo-broken.sh").exists());
    let manifest = read_json(&dir.path().join("scripts/index.json"));
    assert_eq!(manifest["totals"]["scripts"], 1);
    assert_eq!(manifest["failures"][0]["item"], "demo/broken");
}

#[test]
fn test_colliding_os_keys_are_excluded_and_reported() {
    let dir = TempDir::new().unwrap();
    let registry = custom_registry(OsSupport::requires([
        ("ubuntu-22.04", "Ubuntu 22.04"),
        ("ubuntu-2-204", "Ubuntu 2.204"),
        ("debian-12", "Debian 12"),
    ]));
    let generator = Generator::new(&registry, options(dir.path()));
    assert_eq!(generator.plan().collisions().len(), 2);

    let summary = generator.scripts().unwrap();
    assert_eq!(summary.collided, 4);
    assert!(!summary.is_success());

    let names: Vec<String> = std::fs::read_dir(dir.path().join("scripts"))
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|n| n.ends_with(".sh"))
        .collect();
    assert_eq!(names, ["demo-debian12-good.sh"]);
}

#[test]
fn test_validate_stage_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let summary = Generator::new(Registry::builtin(), options(dir.path())).validate();
    assert!(summary.is_success());
    let tally = summary.validation.unwrap();
    assert_eq!(tally.total, Registry::builtin().expected_script_count());
    assert_eq!(tally.with_issues, 0);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
