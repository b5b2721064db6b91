//! End-to-end tests of the mirrorkit binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mirrorkit(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("mirrorkit").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("MIRRORKIT_CONFIG")
        .env_remove("MIRRORKIT_OUT")
        .env_remove("MIRRORKIT_SITE_URL")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_build_writes_site() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("site-config.json"),
        r#"{"siteUrl": "https://mirrors.test/", "lastmod": "2024-05-01"}"#,
    )
    .unwrap();

    mirrorkit(&dir)
        .args(["build", "--out", "site"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scripts: "))
        .stdout(predicate::str::contains("pages: "))
        .stdout(predicate::str::contains("sitemap: 2/2 succeeded"));

    let site = dir.path().join("site");
    assert!(site.join("scripts/npm-aliyun.sh").is_file());
    assert!(site.join("scripts/index.json").is_file());
    assert!(site.join("tools/npm/aliyun/index.html").is_file());
    let robots = std::fs::read_to_string(site.join("robots.txt")).unwrap();
    assert!(robots.contains("Sitemap: https://mirrors.test/sitemap.xml"));
}

#[test]
fn test_site_url_flag_overrides_config() {
    let dir = TempDir::new().unwrap();
    mirrorkit(&dir)
        .args(["sitemap", "--site-url", "https://override.test"])
        .assert()
        .success();
    let robots = std::fs::read_to_string(dir.path().join("dist/robots.txt")).unwrap();
    assert!(robots.contains("https://override.test/sitemap.xml"));
}

#[test]
fn test_out_dir_from_environment() {
    let dir = TempDir::new().unwrap();
    mirrorkit(&dir)
        .env("MIRRORKIT_OUT", "from-env")
        .arg("sitemap")
        .assert()
        .success();
    assert!(dir.path().join("from-env/sitemap.xml").is_file());
}

#[test]
fn test_validate_writes_nothing() {
    let dir = TempDir::new().unwrap();
    mirrorkit(&dir)
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("validate: "))
        .stdout(predicate::str::contains("0 failed, 0 collided"));
    assert!(!dir.path().join("dist").exists());
}

#[test]
fn test_malformed_config_exits_2() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("site-config.json"), "{ not json").unwrap();
    mirrorkit(&dir)
        .arg("scripts")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("site-config.json"));
    assert!(!dir.path().join("dist").exists());
}

#[test]
fn test_bad_site_url_exits_2() {
    let dir = TempDir::new().unwrap();
    mirrorkit(&dir)
        .args(["pages", "--site-url", "ftp://mirrors.test"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("siteUrl"));
}

#[test]
fn test_show_manual_command() {
    let dir = TempDir::new().unwrap();
    mirrorkit(&dir)
        .args(["show", "npm", "aliyun", "--part", "manual"])
        .assert()
        .success()
        .stdout("npm config set registry https://registry.npmmirror.com\n");
}

#[test]
fn test_show_os_sensitive_script() {
    let dir = TempDir::new().unwrap();
    mirrorkit(&dir)
        .args(["show", "apt", "aliyun", "--os", "ubuntu-22.04", "--part", "script"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("#!/bin/bash"))
        .stdout(predicate::str::contains("jammy"));
}

#[test]
fn test_show_json_envelope() {
    let dir = TempDir::new().unwrap();
    let output = mirrorkit(&dir)
        .args(["--json", "show", "docker", "aliyun"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["data"]["scriptFileName"], "docker-aliyun.sh");
    assert_eq!(json["data"]["configFile"]["fileName"], "daemon.json");
    assert_eq!(json["data"]["issues"].as_array().unwrap().len(), 0);
}

#[test]
fn test_show_requires_os_version() {
    let dir = TempDir::new().unwrap();
    mirrorkit(&dir)
        .args(["show", "apt", "aliyun"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires an OS version"));
}

#[test]
fn test_show_config_of_tool_without_one() {
    let dir = TempDir::new().unwrap();
    mirrorkit(&dir)
        .args(["show", "yum", "aliyun", "--os", "centos-7", "--part", "config"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("has no config file"));
}

#[test]
fn test_unknown_tool_exits_2() {
    let dir = TempDir::new().unwrap();
    mirrorkit(&dir)
        .args(["--json", "list", "nope"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains(r#""status":"error""#))
        .stdout(predicate::str::contains(r#""code":"config""#));
}

#[test]
fn test_list_overview_and_detail() {
    let dir = TempDir::new().unwrap();
    mirrorkit(&dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("(system)"))
        .stdout(predicate::str::contains("docker"));

    mirrorkit(&dir)
        .args(["list", "apt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("OS versions:"))
        .stdout(predicate::str::contains("debian-12"));
}

#[test]
fn test_missing_subcommand_exits_2() {
    let dir = TempDir::new().unwrap();
    mirrorkit(&dir)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No subcommand provided"));
}

#[test]
fn test_log_format_flag_selects_json_logs() {
    let dir = TempDir::new().unwrap();
    mirrorkit(&dir)
        .args(["--log-format", "json", "--level", "debug", "list", "npm"])
        .assert()
        .success()
        .stdout(predicate::str::contains("aliyun"))
        .stderr(predicate::str::contains(r#""level":"DEBUG""#));
}
