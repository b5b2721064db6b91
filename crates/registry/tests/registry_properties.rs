//! Properties that must hold across the whole built-in registry.

use std::collections::HashSet;

use mirrorkit_registry::{
    Error, OsSupport, Registry, normalize_os_version, page_path, script_file_name,
};
use proptest::prelude::*;

#[test]
fn test_every_combination_renders_a_script() {
    let registry = Registry::builtin();
    for combo in registry.combinations() {
        let artifact = registry
            .render(&combo.tool, &combo.mirror, combo.os_version.as_deref())
            .unwrap_or_else(|e| panic!("{combo} failed: {e}"));

        assert!(
            artifact.script().starts_with("#!/bin/bash\n"),
            "{combo} lacks a shebang"
        );
        assert!(artifact.script().lines().count() > 5, "{combo} script is too short");

        let manual_lines = artifact.manual_command().lines().count();
        assert!(
            (1..=5).contains(&manual_lines),
            "{combo} manual command has {manual_lines} lines"
        );
    }
}

#[test]
fn test_rendering_is_deterministic() {
    let registry = Registry::builtin();
    for combo in registry.combinations() {
        let os = combo.os_version.as_deref();
        let first = registry.render(&combo.tool, &combo.mirror, os).unwrap();
        let second = registry.render(&combo.tool, &combo.mirror, os).unwrap();
        assert_eq!(first, second, "{combo} is not deterministic");
    }
}

#[test]
fn test_file_names_and_page_paths_are_injective() {
    let combos = Registry::builtin().combinations();
    let names: HashSet<_> = combos.iter().map(|c| c.script_file_name()).collect();
    let pages: HashSet<_> = combos.iter().map(|c| c.page_path()).collect();
    assert_eq!(names.len(), combos.len());
    assert_eq!(pages.len(), combos.len());
}

#[test]
fn test_count_invariant() {
    let registry = Registry::builtin();
    let expected: usize = registry
        .tools()
        .iter()
        .map(|t| t.mirrors().len() * t.os_support().len().max(1))
        .sum();
    assert_eq!(registry.expected_script_count(), expected);
    assert_eq!(registry.combinations().len(), expected);
    // apt: 4 mirrors x 7 releases, yum: 4 x 4
    assert_eq!(registry.tool("apt").unwrap().script_count(), 28);
    assert_eq!(registry.tool("yum").unwrap().script_count(), 16);
}

#[test]
fn test_os_versions_change_apt_output() {
    let apt = Registry::builtin().tool("apt").unwrap();
    let ubuntu = apt.render_script("aliyun", Some("ubuntu-22.04")).unwrap();
    let debian = apt.render_script("aliyun", Some("debian-12")).unwrap();
    assert_ne!(ubuntu, debian);
    assert!(ubuntu.contains("/ubuntu/ jammy "));
    assert!(debian.contains("/debian/ bookworm "));
}

#[test]
fn test_debian_security_suite_differs_between_10_and_11() {
    let apt = Registry::builtin().tool("apt").unwrap();
    let buster = apt.render_script("tsinghua", Some("debian-10")).unwrap();
    let bullseye = apt.render_script("tsinghua", Some("debian-11")).unwrap();
    assert!(buster.contains("buster/updates"));
    assert!(!buster.contains("buster-security"));
    assert!(bullseye.contains("bullseye-security"));
    assert!(!bullseye.contains("bullseye/updates"));
}

#[test]
fn test_apt_ubuntu_2204_aliyun_uses_jammy_on_all_suites() {
    let script = Registry::builtin()
        .tool("apt")
        .unwrap()
        .render_script("aliyun", Some("ubuntu-22.04"))
        .unwrap();
    let deb_lines: Vec<_> = script.lines().filter(|l| l.starts_with("deb ")).collect();
    assert_eq!(deb_lines.len(), 4);
    for line in deb_lines {
        assert!(line.contains("mirrors.aliyun.com"), "{line}");
        assert!(line.contains(" jammy"), "{line}");
    }
}

#[test]
fn test_yum_repo_file_follows_major_version() {
    let yum = Registry::builtin().tool("yum").unwrap();
    let seven = yum.render_script("aliyun", Some("centos-7")).unwrap();
    let nine = yum.render_script("aliyun", Some("centos-stream-9")).unwrap();
    assert!(seven.contains("https://mirrors.aliyun.com/repo/Centos-7.repo"));
    assert!(seven.contains("sudo yum makecache"));
    assert!(nine.contains("https://mirrors.aliyun.com/repo/Centos-9.repo"));
    assert!(nine.contains("sudo dnf makecache"));
}

#[test]
fn test_config_file_presence() {
    let registry = Registry::builtin();
    for (tool, mirror) in [("npm", "aliyun"), ("docker", "daocloud"), ("cargo", "ustc")] {
        let config = registry
            .tool(tool)
            .unwrap()
            .render_config_file(mirror, None)
            .unwrap();
        assert!(config.is_some(), "{tool} should have a config file");
    }
    let yum = registry
        .tool("yum")
        .unwrap()
        .render_config_file("aliyun", Some("centos-7"))
        .unwrap();
    assert_eq!(yum, None);
}

#[test]
fn test_config_capable_tools() {
    let capable: Vec<_> = Registry::builtin()
        .tools()
        .iter()
        .filter(|t| t.has_config_file())
        .map(|t| t.key())
        .collect();
    assert_eq!(
        capable,
        [
            "npm", "pip", "docker", "maven", "conda", "yarn", "pnpm", "cargo", "gradle", "cran"
        ]
    );
}

#[test]
fn test_npm_aliyun() {
    let artifact = Registry::builtin().render("npm", "aliyun", None).unwrap();
    assert_eq!(
        artifact.manual_command(),
        "npm config set registry https://registry.npmmirror.com"
    );
    assert_eq!(artifact.script_file_name(), "npm-aliyun.sh");
    assert_eq!(artifact.page_path(), "tools/npm/aliyun/");
    assert_eq!(artifact.config_file().map(|c| c.file_name.as_str()), Some(".npmrc"));
}

#[test]
fn test_docker_note_is_carried_into_script() {
    let script = Registry::builtin()
        .tool("docker")
        .unwrap()
        .render_script("aliyun", None)
        .unwrap();
    assert!(script.contains("# Note: Alibaba Cloud issues a personal accelerator address"));
}

#[test]
fn test_invalid_selections_are_errors() {
    let registry = Registry::builtin();
    let apt = registry.tool("apt").unwrap();
    assert_eq!(
        apt.render_script("aliyun", None).unwrap_err(),
        Error::OsVersionRequired {
            tool: "apt".to_string()
        }
    );
    assert!(matches!(
        apt.render_script("aliyun", Some("ubuntu-14.04")),
        Err(Error::UnknownOsVersion { .. })
    ));
    assert!(matches!(
        registry.render("npm", "aliyun", Some("ubuntu-22.04")),
        Err(Error::OsVersionNotSupported { .. })
    ));
    assert!(matches!(
        registry.render("npm", "nowhere", None),
        Err(Error::UnknownMirror { .. })
    ));
    assert!(matches!(
        registry.render("nope", "aliyun", None),
        Err(Error::UnknownTool(_))
    ));
}

#[test]
fn test_mirror_test_urls_resolve() {
    for tool in Registry::builtin().tools() {
        for (key, mirror) in tool.mirrors() {
            let url = mirror
                .test_url()
                .unwrap_or_else(|e| panic!("{}.{key}: {e}", tool.key()));
            assert!(url.starts_with("https://"), "{}.{key}: {url}", tool.key());
        }
    }
}

#[test]
fn test_os_sensitive_tools_are_apt_and_yum() {
    let sensitive: Vec<_> = Registry::builtin()
        .tools()
        .iter()
        .filter(|t| matches!(t.os_support(), OsSupport::RequiresOsVersion(_)))
        .map(|t| t.key())
        .collect();
    assert_eq!(sensitive, ["apt", "yum"]);
}

fn os_key() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(-[a-z]{1,6})?-[0-9]{1,2}(\\.[0-9]{1,2})?"
}

proptest! {
    #[test]
    fn test_page_paths_distinguish_distinct_os_keys(a in os_key(), b in os_key()) {
        prop_assume!(a != b);
        prop_assert_ne!(
            page_path("apt", "aliyun", Some(&a)),
            page_path("apt", "aliyun", Some(&b))
        );
    }

    #[test]
    fn test_file_names_collide_only_on_normalization(a in os_key(), b in os_key()) {
        let same_name = script_file_name("apt", "aliyun", Some(&a))
            == script_file_name("apt", "aliyun", Some(&b));
        prop_assert_eq!(same_name, normalize_os_version(&a) == normalize_os_version(&b));
    }

    #[test]
    fn test_file_names_never_collide_across_mirrors(
        os in os_key(),
        m1 in "[a-z0-9]{1,8}",
        m2 in "[a-z0-9]{1,8}",
    ) {
        prop_assume!(m1 != m2);
        prop_assert_ne!(
            script_file_name("apt", &m1, Some(&os)),
            script_file_name("apt", &m2, Some(&os))
        );
    }

    #[test]
    fn test_any_builtin_combination_renders_identically_twice(index in 0usize..1000) {
        let registry = Registry::builtin();
        let combos = registry.combinations();
        let combo = &combos[index % combos.len()];
        let os = combo.os_version.as_deref();
        prop_assert_eq!(
            registry.render(&combo.tool, &combo.mirror, os).unwrap(),
            registry.render(&combo.tool, &combo.mirror, os).unwrap()
        );
    }
}
