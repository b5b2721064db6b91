use crate::error::Result;
use crate::tool::RenderContext;

use super::{ScriptWriter, ToolRenderer, mirror_host};

const REPO_DIR: &str = "/etc/yum.repos.d";
const BACKUP_DIR: &str = "/etc/yum.repos.d/mirrorkit-backup";

/// YUM/DNF: swaps the CentOS base repo file for the mirror's.
#[derive(Debug, Default, Clone, Copy)]
pub struct YumRenderer;

/// Major version is the last `-` segment: `centos-stream-9` is 9.
fn major_version(os_key: &str) -> &str {
    os_key.rsplit('-').next().unwrap_or(os_key)
}

/// CentOS 8 and later default to dnf.
fn package_manager(major: &str) -> &'static str {
    if major == "7" { "yum" } else { "dnf" }
}

fn repo_url(host: &str, major: &str) -> String {
    format!("https://{host}/repo/Centos-{major}.repo")
}

impl ToolRenderer for YumRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let os = ctx.require_os()?;
        let host = mirror_host(ctx)?;
        let major = major_version(os.key);
        let pm = package_manager(major);
        let mirror = &ctx.mirror().name;

        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring {pm} mirror ({mirror}) for {}...", os.label))
            .section("Move the existing repo files aside (only on the first run)")
            .line(format!("if [ ! -d {BACKUP_DIR} ]; then"))
            .line(format!("    sudo mkdir -p {BACKUP_DIR}"))
            .line(format!("    sudo mv {REPO_DIR}/*.repo {BACKUP_DIR}/ 2>/dev/null"))
            .line(format!("    echo \"Backed up repo files to {BACKUP_DIR}\""))
            .line("fi")
            .section("Download the mirror repo file")
            .line(format!(
                "sudo curl -fsSL -o {REPO_DIR}/CentOS-Base.repo {}",
                repo_url(host, major)
            ))
            .echo("Repo file updated")
            .section("Rebuild the metadata cache")
            .echo("Rebuilding cache...")
            .line(format!("sudo {pm} clean all"))
            .line(format!("sudo {pm} makecache"))
            .section("Verify")
            .line(format!("{pm} repolist"))
            .line("")
            .echo(format!("Done. {pm} now uses {mirror}"))
            .echo(format!(
                "To undo: sudo mv {BACKUP_DIR}/*.repo {REPO_DIR}/ && sudo {pm} clean all"
            ));
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let os = ctx.require_os()?;
        let host = mirror_host(ctx)?;
        let major = major_version(os.key);
        let pm = package_manager(major);
        Ok(format!(
            "sudo mkdir -p {BACKUP_DIR}\n\
             sudo mv {REPO_DIR}/*.repo {BACKUP_DIR}/\n\
             sudo curl -fsSL -o {REPO_DIR}/CentOS-Base.repo {}\n\
             sudo {pm} makecache",
            repo_url(host, major)
        ))
    }
}
