//! The built-in tool and mirror catalogue.

use crate::model::{Category, CategoryKey, MirrorDefinition, OsSupport, ToolMetadata};
use crate::registry::Registry;
use crate::render::{
    AptRenderer, CargoRenderer, ComposerRenderer, CondaRenderer, CpanRenderer, CranRenderer,
    DockerRenderer, FlutterRenderer, GoRenderer, GradleRenderer, HomebrewRenderer, MavenRenderer,
    NodeCli, NodeRenderer, NugetRenderer, PipRenderer, RubyGemsRenderer, YumRenderer,
};
use crate::tool::{ToolDefinition, ToolDefinitionBuilder};

const ALIYUN: &str = "Alibaba Cloud";
const TENCENT: &str = "Tencent Cloud";
const HUAWEI: &str = "Huawei Cloud";
const TSINGHUA: &str = "Tsinghua University (TUNA)";
const USTC: &str = "USTC";
const SJTU: &str = "SJTU";

const DESKTOP: &[&str] = &["Windows", "macOS", "Linux"];

fn mirror(name: &str, url: &str) -> MirrorDefinition {
    MirrorDefinition::new(name, url)
}

fn metadata(description: &str, official_site: &str, documentation: &str, platforms: &[&str]) -> ToolMetadata {
    ToolMetadata {
        description: description.to_string(),
        official_site: official_site.to_string(),
        documentation: documentation.to_string(),
        platforms: platforms.iter().map(|p| (*p).to_string()).collect(),
    }
}

/// Mirrors of the npm registry shared by npm, Yarn and pnpm.
fn with_npm_mirrors(builder: ToolDefinitionBuilder) -> ToolDefinitionBuilder {
    builder
        .mirror(
            "aliyun",
            mirror(ALIYUN, "https://registry.npmmirror.com")
                .with_test_url("https://registry.npmmirror.com"),
        )
        .mirror("tencent", mirror(TENCENT, "https://mirrors.cloud.tencent.com/npm/"))
        .mirror("huawei", mirror(HUAWEI, "https://mirrors.huaweicloud.com/repository/npm/"))
        .mirror("tsinghua", mirror(TSINGHUA, "https://mirrors.tuna.tsinghua.edu.cn/npm/"))
}

/// Host-addressed mirrors shared by APT and YUM.
fn with_distro_mirrors(builder: ToolDefinitionBuilder) -> ToolDefinitionBuilder {
    builder
        .mirror("aliyun", mirror(ALIYUN, "https://mirrors.aliyun.com"))
        .mirror("tencent", mirror(TENCENT, "https://mirrors.cloud.tencent.com"))
        .mirror("tsinghua", mirror(TSINGHUA, "https://mirrors.tuna.tsinghua.edu.cn"))
        .mirror("huawei", mirror(HUAWEI, "https://mirrors.huaweicloud.com"))
}

/// Maven-layout mirrors shared by Maven and Gradle.
fn with_maven_mirrors(builder: ToolDefinitionBuilder) -> ToolDefinitionBuilder {
    builder
        .mirror(
            "aliyun",
            mirror(ALIYUN, "https://maven.aliyun.com/repository/public")
                .with_test_url("https://maven.aliyun.com"),
        )
        .mirror(
            "tencent",
            mirror(TENCENT, "https://mirrors.cloud.tencent.com/nexus/repository/maven-public/"),
        )
        .mirror("huawei", mirror(HUAWEI, "https://mirrors.huaweicloud.com/repository/maven/"))
}

fn apt() -> ToolDefinition {
    with_distro_mirrors(
        ToolDefinition::builder("apt", CategoryKey::System, AptRenderer)
            .name("APT")
            .full_name("APT (Debian/Ubuntu package manager)")
            .icon("🐧")
            .os_support(OsSupport::requires([
                ("ubuntu-24.04", "Ubuntu 24.04 LTS (Noble Numbat)"),
                ("ubuntu-22.04", "Ubuntu 22.04 LTS (Jammy Jellyfish)"),
                ("ubuntu-20.04", "Ubuntu 20.04 LTS (Focal Fossa)"),
                ("ubuntu-18.04", "Ubuntu 18.04 LTS (Bionic Beaver)"),
                ("debian-12", "Debian 12 (Bookworm)"),
                ("debian-11", "Debian 11 (Bullseye)"),
                ("debian-10", "Debian 10 (Buster)"),
            ]))
            .metadata(metadata(
                "APT is the package manager of Debian, Ubuntu and their derivatives. It resolves \
                 dependencies and installs .deb packages from the archives listed in sources.list; \
                 pointing those archives at a nearby mirror makes apt update and apt install fast.",
                "https://ubuntu.com/",
                "https://help.ubuntu.com/community/AptGet/Howto",
                &["Linux (Debian/Ubuntu)"],
            )),
    )
    .build()
}

fn yum() -> ToolDefinition {
    with_distro_mirrors(
        ToolDefinition::builder("yum", CategoryKey::System, YumRenderer)
            .name("YUM")
            .full_name("YUM/DNF (CentOS/RHEL package manager)")
            .icon("🎩")
            .os_support(OsSupport::requires([
                ("centos-7", "CentOS 7"),
                ("centos-8", "CentOS 8"),
                ("centos-stream-8", "CentOS Stream 8"),
                ("centos-stream-9", "CentOS Stream 9"),
            ]))
            .metadata(metadata(
                "YUM and its successor DNF manage RPM packages on CentOS, RHEL and Fedora. \
                 Repository definitions live in /etc/yum.repos.d; replacing the base repo file \
                 with a mirror's copy speeds up every install and update.",
                "https://www.redhat.com/",
                "https://dnf.readthedocs.io/",
                &["Linux (RHEL/CentOS/Fedora)"],
            )),
    )
    .build()
}

fn homebrew() -> ToolDefinition {
    ToolDefinition::builder("homebrew", CategoryKey::System, HomebrewRenderer)
        .name("Homebrew")
        .full_name("Homebrew (macOS package manager)")
        .icon("🍺")
        .mirror("tsinghua", mirror(TSINGHUA, "https://mirrors.tuna.tsinghua.edu.cn"))
        .mirror("ustc", mirror(USTC, "https://mirrors.ustc.edu.cn"))
        .mirror("aliyun", mirror(ALIYUN, "https://mirrors.aliyun.com"))
        .metadata(metadata(
            "Homebrew installs command-line tools and applications on macOS and Linux. \
             brew update pulls its formula repositories over git, so a git mirror shortens \
             every update.",
            "https://brew.sh/",
            "https://docs.brew.sh/",
            &["macOS", "Linux"],
        ))
        .build()
}

fn npm() -> ToolDefinition {
    with_npm_mirrors(
        ToolDefinition::builder("npm", CategoryKey::Language, NodeRenderer::new(NodeCli::Npm))
            .name("npm")
            .full_name("npm (Node.js package manager)")
            .icon("📦")
            .metadata(metadata(
                "npm is the package manager bundled with Node.js and the client for the largest \
                 public software registry. A registry mirror turns slow or failing installs into \
                 fast ones without changing how packages are declared.",
                "https://www.npmjs.com/",
                "https://docs.npmjs.com/",
                DESKTOP,
            )),
    )
    .build()
}

fn yarn() -> ToolDefinition {
    with_npm_mirrors(
        ToolDefinition::builder("yarn", CategoryKey::Language, NodeRenderer::new(NodeCli::Yarn))
            .name("Yarn")
            .full_name("Yarn (Node.js package manager)")
            .icon("🧶")
            .metadata(metadata(
                "Yarn is an alternative Node.js package manager focused on deterministic installs \
                 and offline caching. It reads packages from the same registry as npm.",
                "https://yarnpkg.com/",
                "https://yarnpkg.com/getting-started",
                DESKTOP,
            )),
    )
    .build()
}

fn pnpm() -> ToolDefinition {
    with_npm_mirrors(
        ToolDefinition::builder("pnpm", CategoryKey::Language, NodeRenderer::new(NodeCli::Pnpm))
            .name("pnpm")
            .full_name("pnpm (disk-efficient Node.js package manager)")
            .icon("📦")
            .metadata(metadata(
                "pnpm stores every package version once in a content-addressed store and links it \
                 into projects, which saves disk space and speeds up monorepo installs.",
                "https://pnpm.io/",
                "https://pnpm.io/motivation",
                DESKTOP,
            )),
    )
    .build()
}

fn pip() -> ToolDefinition {
    ToolDefinition::builder("pip", CategoryKey::Language, PipRenderer)
        .name("pip")
        .full_name("pip (Python package installer)")
        .icon("🐍")
        .mirror("aliyun", mirror(ALIYUN, "https://mirrors.aliyun.com/pypi/simple/"))
        .mirror("tencent", mirror(TENCENT, "https://mirrors.cloud.tencent.com/pypi/simple/"))
        .mirror("tsinghua", mirror(TSINGHUA, "https://pypi.tuna.tsinghua.edu.cn/simple"))
        .metadata(metadata(
            "pip installs Python packages from the Python Package Index. Setting a mirror index \
             avoids the timeouts that make pip install unreliable on slow links.",
            "https://pip.pypa.io/",
            "https://pip.pypa.io/en/stable/user_guide/",
            DESKTOP,
        ))
        .build()
}

fn composer() -> ToolDefinition {
    ToolDefinition::builder("composer", CategoryKey::Language, ComposerRenderer)
        .name("Composer")
        .full_name("Composer (PHP dependency manager)")
        .icon("🐘")
        .mirror("aliyun", mirror(ALIYUN, "https://mirrors.aliyun.com/composer/"))
        .mirror("tencent", mirror(TENCENT, "https://mirrors.cloud.tencent.com/composer/"))
        .mirror("huawei", mirror(HUAWEI, "https://mirrors.huaweicloud.com/repository/php/"))
        .metadata(metadata(
            "Composer manages PHP dependencies declared in composer.json and downloads them \
             from Packagist. Frameworks such as Laravel and Symfony are installed through it.",
            "https://getcomposer.org/",
            "https://getcomposer.org/doc/",
            DESKTOP,
        ))
        .build()
}

fn maven() -> ToolDefinition {
    with_maven_mirrors(
        ToolDefinition::builder("maven", CategoryKey::Language, MavenRenderer)
            .name("Maven")
            .full_name("Maven (Java build and dependency tool)")
            .icon("☕")
            .metadata(metadata(
                "Apache Maven builds Java projects and resolves their dependencies from Maven \
                 Central. A mirror of central in settings.xml applies to every project.",
                "https://maven.apache.org/",
                "https://maven.apache.org/guides/",
                DESKTOP,
            )),
    )
    .build()
}

fn go() -> ToolDefinition {
    ToolDefinition::builder("go", CategoryKey::Language, GoRenderer)
        .name("Go")
        .full_name("Go modules (GOPROXY)")
        .icon("🐹")
        .mirror("aliyun", mirror(ALIYUN, "https://mirrors.aliyun.com/goproxy/"))
        .mirror("tencent", mirror(TENCENT, "https://mirrors.cloud.tencent.com/go/"))
        .mirror("goproxy", mirror("Goproxy.cn", "https://goproxy.cn"))
        .mirror("goproxyio", mirror("Goproxy.io", "https://goproxy.io"))
        .metadata(metadata(
            "Go modules download dependencies through the proxy named in GOPROXY. A nearby \
             proxy also serves golang.org/x modules that are otherwise hard to reach.",
            "https://go.dev/",
            "https://go.dev/doc/modules/managing-dependencies",
            DESKTOP,
        ))
        .build()
}

fn rubygems() -> ToolDefinition {
    ToolDefinition::builder("rubygems", CategoryKey::Language, RubyGemsRenderer)
        .name("RubyGems")
        .full_name("RubyGems (Ruby package manager)")
        .icon("💎")
        .mirror("tsinghua", mirror(TSINGHUA, "https://mirrors.tuna.tsinghua.edu.cn/rubygems/"))
        .mirror("tencent", mirror(TENCENT, "https://mirrors.cloud.tencent.com/rubygems/"))
        .mirror("ustc", mirror(USTC, "https://mirrors.ustc.edu.cn/rubygems/"))
        .metadata(metadata(
            "RubyGems is Ruby's package manager; gem install and Bundler both fetch gems from \
             the configured sources.",
            "https://rubygems.org/",
            "https://guides.rubygems.org/",
            DESKTOP,
        ))
        .build()
}

fn cargo() -> ToolDefinition {
    ToolDefinition::builder("cargo", CategoryKey::Language, CargoRenderer)
        .name("Cargo")
        .full_name("Cargo (Rust package manager)")
        .icon("🦀")
        .mirror(
            "tsinghua",
            mirror(TSINGHUA, "https://mirrors.tuna.tsinghua.edu.cn/git/crates.io-index.git"),
        )
        .mirror("ustc", mirror(USTC, "https://mirrors.ustc.edu.cn/crates.io-index/"))
        .mirror("sjtu", mirror(SJTU, "https://mirrors.sjtug.sjtu.edu.cn/git/crates.io-index/"))
        .mirror(
            "rsproxy",
            mirror("ByteDance (RsProxy)", "https://rsproxy.cn/crates.io-index"),
        )
        .metadata(metadata(
            "Cargo builds Rust projects and downloads crates from crates.io. Source replacement \
             in ~/.cargo/config.toml redirects every crate download to a mirror.",
            "https://doc.rust-lang.org/cargo/",
            "https://doc.rust-lang.org/cargo/reference/source-replacement.html",
            DESKTOP,
        ))
        .build()
}

fn gradle() -> ToolDefinition {
    with_maven_mirrors(
        ToolDefinition::builder("gradle", CategoryKey::Language, GradleRenderer)
            .name("Gradle")
            .full_name("Gradle (JVM and Android build tool)")
            .icon("🐘")
            .metadata(metadata(
                "Gradle builds JVM and Android projects and resolves dependencies from Maven \
                 repositories. An init script adds the mirror to every build on the machine.",
                "https://gradle.org/",
                "https://docs.gradle.org/",
                DESKTOP,
            )),
    )
    .build()
}

fn docker() -> ToolDefinition {
    ToolDefinition::builder("docker", CategoryKey::Container, DockerRenderer)
        .name("Docker")
        .full_name("Docker Hub registry mirror")
        .icon("🐳")
        .mirror(
            "aliyun",
            mirror(ALIYUN, "https://registry.cn-hangzhou.aliyuncs.com")
                .with_test_url("https://mirrors.aliyun.com")
                .with_note(
                    "Alibaba Cloud issues a personal accelerator address after sign-in; \
                     replace this URL with yours",
                ),
        )
        .mirror(
            "tencent",
            mirror(TENCENT, "https://mirror.ccs.tencentyun.com")
                .with_test_url("https://mirrors.cloud.tencent.com"),
        )
        .mirror(
            "daocloud",
            mirror("DaoCloud", "https://docker.m.daocloud.io").with_test_url("https://www.daocloud.io"),
        )
        .metadata(metadata(
            "Docker pulls container images from Docker Hub by default. A registry mirror in \
             daemon.json makes docker pull reliable where Docker Hub is slow.",
            "https://www.docker.com/",
            "https://docs.docker.com/",
            DESKTOP,
        ))
        .build()
}

fn nuget() -> ToolDefinition {
    ToolDefinition::builder("nuget", CategoryKey::Other, NugetRenderer)
        .name("NuGet")
        .full_name("NuGet (.NET package manager)")
        .icon("📘")
        .mirror(
            "huawei",
            mirror(HUAWEI, "https://mirrors.huaweicloud.com/repository/nuget/v3/index.json"),
        )
        .mirror("tencent", mirror(TENCENT, "https://mirrors.cloud.tencent.com/nuget/"))
        .metadata(metadata(
            "NuGet is the package manager for .NET. dotnet restore queries every configured \
             package source, so a mirror source speeds up restores.",
            "https://www.nuget.org/",
            "https://learn.microsoft.com/nuget/",
            DESKTOP,
        ))
        .build()
}

fn conda() -> ToolDefinition {
    ToolDefinition::builder("conda", CategoryKey::Other, CondaRenderer)
        .name("Conda")
        .full_name("Conda (data-science package manager)")
        .icon("🐍")
        .mirror("tsinghua", mirror(TSINGHUA, "https://mirrors.tuna.tsinghua.edu.cn"))
        .mirror("ustc", mirror(USTC, "https://mirrors.ustc.edu.cn"))
        .mirror("aliyun", mirror(ALIYUN, "https://mirrors.aliyun.com"))
        .metadata(metadata(
            "Conda installs packages and whole environments for Python, R and native \
             libraries. Channel mirrors in .condarc serve the default and conda-forge channels.",
            "https://docs.conda.io/",
            "https://docs.conda.io/projects/conda/en/latest/user-guide/",
            DESKTOP,
        ))
        .build()
}

fn flutter() -> ToolDefinition {
    ToolDefinition::builder("flutter", CategoryKey::Other, FlutterRenderer)
        .name("Flutter")
        .full_name("Flutter (cross-platform UI toolkit)")
        .icon("🐦")
        .mirror("tsinghua", mirror(TSINGHUA, "https://mirrors.tuna.tsinghua.edu.cn"))
        .mirror("aliyun", mirror(ALIYUN, "https://mirrors.aliyun.com"))
        .mirror("shanghai", mirror(SJTU, "https://mirror.sjtu.edu.cn"))
        .metadata(metadata(
            "Flutter downloads its engine artifacts and Dart packages from Google storage and \
             pub.dev. PUB_HOSTED_URL and FLUTTER_STORAGE_BASE_URL redirect both to a mirror.",
            "https://flutter.dev/",
            "https://docs.flutter.dev/",
            DESKTOP,
        ))
        .build()
}

fn cpan() -> ToolDefinition {
    ToolDefinition::builder("cpan", CategoryKey::Other, CpanRenderer)
        .name("CPAN")
        .full_name("CPAN (Perl module archive)")
        .icon("🐪")
        .mirror("aliyun", mirror(ALIYUN, "https://mirrors.aliyun.com/CPAN/"))
        .mirror("tsinghua", mirror(TSINGHUA, "https://mirrors.tuna.tsinghua.edu.cn/CPAN/"))
        .mirror("ustc", mirror(USTC, "https://mirrors.ustc.edu.cn/CPAN/"))
        .metadata(metadata(
            "CPAN is the archive of Perl modules; the cpan client downloads from the first \
             reachable entry of its urllist.",
            "https://www.cpan.org/",
            "https://www.cpan.org/modules/INSTALL.html",
            DESKTOP,
        ))
        .build()
}

fn cran() -> ToolDefinition {
    ToolDefinition::builder("cran", CategoryKey::Other, CranRenderer)
        .name("CRAN")
        .full_name("CRAN (R package archive)")
        .icon("📊")
        .mirror("tsinghua", mirror(TSINGHUA, "https://mirrors.tuna.tsinghua.edu.cn/CRAN/"))
        .mirror("ustc", mirror(USTC, "https://mirrors.ustc.edu.cn/CRAN/"))
        .mirror("aliyun", mirror(ALIYUN, "https://mirrors.aliyun.com/CRAN/"))
        .metadata(metadata(
            "CRAN hosts R packages; install.packages reads the repository from the repos \
             option, which ~/.Rprofile can set for every session.",
            "https://cran.r-project.org/",
            "https://cran.r-project.org/doc/manuals/r-release/R-admin.html",
            DESKTOP,
        ))
        .build()
}

/// Build the catalogue. Called once by [`Registry::builtin`].
pub(crate) fn registry() -> Registry {
    let tools = vec![
        npm(),
        pip(),
        apt(),
        yum(),
        docker(),
        nuget(),
        composer(),
        maven(),
        go(),
        rubygems(),
        homebrew(),
        conda(),
        yarn(),
        pnpm(),
        cargo(),
        gradle(),
        flutter(),
        cpan(),
        cran(),
    ];
    let categories = vec![
        Category::new(CategoryKey::System, ["apt", "yum", "homebrew"]),
        Category::new(
            CategoryKey::Language,
            [
                "npm", "yarn", "pnpm", "pip", "composer", "maven", "go", "rubygems", "cargo",
                "gradle",
            ],
        ),
        Category::new(CategoryKey::Container, ["docker"]),
        Category::new(
            CategoryKey::Other,
            ["nuget", "conda", "flutter", "cpan", "cran"],
        ),
    ];
    Registry::new(tools, categories)
}
