use crate::error::{Error, Result};
use crate::tool::RenderContext;

use super::{BACKUP_SUFFIX, ScriptWriter, ToolRenderer, mirror_host};

const SOURCES_LIST: &str = "/etc/apt/sources.list";

const CODENAMES: &[(&str, &str)] = &[
    ("ubuntu-24.04", "noble"),
    ("ubuntu-22.04", "jammy"),
    ("ubuntu-20.04", "focal"),
    ("ubuntu-18.04", "bionic"),
    ("debian-12", "bookworm"),
    ("debian-11", "bullseye"),
    ("debian-10", "buster"),
];

const UBUNTU_COMPONENTS: &str = "main restricted universe multiverse";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Distro {
    Ubuntu,
    Debian { major: u32 },
}

impl Distro {
    const fn name(self) -> &'static str {
        match self {
            Self::Ubuntu => "ubuntu",
            Self::Debian { .. } => "debian",
        }
    }
}

fn parse_os(os_key: &str) -> Result<(Distro, &'static str)> {
    let codename = CODENAMES
        .iter()
        .find(|(key, _)| *key == os_key)
        .map(|(_, codename)| *codename)
        .ok_or_else(|| Error::render("apt", format!("no release codename for '{os_key}'")))?;

    let distro = match os_key.split_once('-') {
        Some(("ubuntu", _)) => Distro::Ubuntu,
        Some(("debian", version)) => Distro::Debian {
            major: version.parse().map_err(|_| {
                Error::render("apt", format!("cannot read Debian version from '{os_key}'"))
            })?,
        },
        _ => {
            return Err(Error::render(
                "apt",
                format!("unsupported distribution '{os_key}'"),
            ));
        }
    };
    Ok((distro, codename))
}

/// `sources.list` body for `host` and an OS key such as `ubuntu-22.04`.
///
/// Debian 11 moved security updates to `debian-security {codename}-security`;
/// older releases use `debian-security {codename}/updates`. Debian 12 adds the
/// `non-free-firmware` component.
pub fn sources_list(host: &str, os_key: &str) -> Result<String> {
    let (distro, codename) = parse_os(os_key)?;
    let lines = match distro {
        Distro::Ubuntu => {
            let base = format!("deb http://{host}/ubuntu/");
            vec![
                format!("{base} {codename} {UBUNTU_COMPONENTS}"),
                format!("{base} {codename}-updates {UBUNTU_COMPONENTS}"),
                format!("{base} {codename}-backports {UBUNTU_COMPONENTS}"),
                format!("{base} {codename}-security {UBUNTU_COMPONENTS}"),
            ]
        }
        Distro::Debian { major } => {
            let components = if major >= 12 {
                "main contrib non-free non-free-firmware"
            } else {
                "main contrib non-free"
            };
            let security_suite = if major >= 11 {
                format!("{codename}-security")
            } else {
                format!("{codename}/updates")
            };
            vec![
                format!("deb http://{host}/debian/ {codename} {components}"),
                format!("deb http://{host}/debian/ {codename}-updates {components}"),
                format!("deb http://{host}/debian-security {security_suite} {components}"),
            ]
        }
    };
    Ok(lines.join("\n"))
}

/// APT: rewrites `/etc/apt/sources.list` for one release.
#[derive(Debug, Default, Clone, Copy)]
pub struct AptRenderer;

impl ToolRenderer for AptRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let os = ctx.require_os()?;
        let host = mirror_host(ctx)?;
        let (distro, _) = parse_os(os.key)?;
        let sources = sources_list(host, os.key)?;
        let mirror = &ctx.mirror().name;
        let deb822 = format!("/etc/apt/sources.list.d/{}.sources", distro.name());

        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring APT mirror ({mirror}) for {}...", os.label))
            .section("Back up the current sources list (only on the first run)")
            .backup_once(SOURCES_LIST, true)
            .section("Newer releases ship deb822 sources that would shadow sources.list")
            .line(format!("if [ -f {deb822} ]; then"))
            .line(format!("    sudo mv {deb822} {deb822}{BACKUP_SUFFIX}"))
            .line(format!("    echo \"Moved {deb822} aside\""))
            .line("fi")
            .section("Write the mirror sources")
            .heredoc(&format!("sudo tee {SOURCES_LIST} > /dev/null"), &sources)
            .echo("Sources list updated")
            .section("Refresh the package index")
            .echo("Refreshing package index...")
            .line("sudo apt update")
            .section("Verify")
            .echo("Active sources:")
            .line(format!("grep -E '^deb ' {SOURCES_LIST}"))
            .line("")
            .echo(format!("Done. APT now uses {mirror}"))
            .echo(format!(
                "To undo: sudo mv {SOURCES_LIST}{BACKUP_SUFFIX} {SOURCES_LIST} && sudo apt update"
            ));
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let os = ctx.require_os()?;
        let host = mirror_host(ctx)?;
        let (distro, _) = parse_os(os.key)?;
        let name = distro.name();
        Ok(format!(
            "sudo cp {SOURCES_LIST} {SOURCES_LIST}{BACKUP_SUFFIX}\n\
             sudo sed -i -E 's#https?://[^ ]+/{name}/? #http://{host}/{name}/ #' {SOURCES_LIST}\n\
             sudo apt update"
        ))
    }
}
