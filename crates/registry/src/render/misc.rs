//! Tools whose configuration is a single CLI call or profile line.

use crate::error::Result;
use crate::tool::RenderContext;

use super::{BACKUP_SUFFIX, ConfigFileCapability, ScriptWriter, ToolRenderer};

const RUBYGEMS_ORG: &str = "https://rubygems.org/";

/// Composer: global packagist repository.
#[derive(Debug, Default, Clone, Copy)]
pub struct ComposerRenderer;

impl ToolRenderer for ComposerRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mirror = &ctx.mirror().name;
        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring Composer repository ({mirror})..."))
            .line("PREVIOUS_REPO=\"$(composer config -g repo.packagist 2>/dev/null)\"")
            .echo("Previous repository: ${PREVIOUS_REPO:-packagist.org}")
            .section("Set the global packagist repository")
            .line(format!(
                "composer config -g repo.packagist composer {}",
                ctx.mirror().url
            ))
            .section("Verify")
            .line("composer config -g repo.packagist")
            .line("")
            .echo(format!("Done. Composer now uses {mirror}"))
            .echo("To undo: composer config -g --unset repos.packagist");
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            "composer config -g repo.packagist composer {}",
            ctx.mirror().url
        ))
    }
}

/// RubyGems: swaps rubygems.org for the mirror in the source list.
#[derive(Debug, Default, Clone, Copy)]
pub struct RubyGemsRenderer;

impl ToolRenderer for RubyGemsRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mirror = &ctx.mirror().name;
        let url = &ctx.mirror().url;
        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring RubyGems source ({mirror})..."))
            .echo("Current sources:")
            .line("gem sources -l")
            .section("Add the mirror once, then drop the default source")
            .line(format!("if ! gem sources -l | grep -qF '{url}'; then"))
            .line(format!("    gem sources --add {url}"))
            .line("fi")
            .line(format!("gem sources --remove {RUBYGEMS_ORG} 2>/dev/null || true"))
            .line("gem sources -c")
            .section("Verify")
            .line("gem sources -l")
            .line("")
            .echo(format!("Done. RubyGems now uses {mirror}"))
            .echo(format!("To undo: gem sources --add {RUBYGEMS_ORG} --remove {url}"));
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            "gem sources --add {} --remove {RUBYGEMS_ORG}",
            ctx.mirror().url
        ))
    }
}

/// NuGet: a named package source next to nuget.org.
#[derive(Debug, Default, Clone, Copy)]
pub struct NugetRenderer;

impl ToolRenderer for NugetRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mirror = &ctx.mirror().name;
        let key = ctx.mirror_key();
        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Adding NuGet source '{key}' ({mirror})..."))
            .section("Replace an earlier source of the same name")
            .line(format!("dotnet nuget remove source {key} > /dev/null 2>&1 || true"))
            .line(format!(
                "dotnet nuget add source {} -n {key}",
                ctx.mirror().url
            ))
            .section("Verify")
            .line("dotnet nuget list source")
            .line("")
            .echo(format!("Done. NuGet source '{key}' points at {mirror}"))
            .echo("nuget.org stays enabled as a fallback")
            .echo(format!("To undo: dotnet nuget remove source {key}"));
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            "dotnet nuget add source {} -n {}",
            ctx.mirror().url,
            ctx.mirror_key()
        ))
    }
}

/// Flutter: pub and storage base URLs in the shell profile.
#[derive(Debug, Default, Clone, Copy)]
pub struct FlutterRenderer;

fn flutter_env(ctx: &RenderContext<'_>) -> [(&'static str, String); 2] {
    let base = ctx.mirror().url.trim_end_matches('/');
    [
        ("PUB_HOSTED_URL", format!("{base}/dart-pub")),
        ("FLUTTER_STORAGE_BASE_URL", format!("{base}/flutter")),
    ]
}

impl ToolRenderer for FlutterRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mirror = &ctx.mirror().name;
        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring Flutter mirrors ({mirror})..."))
            .section("Export the mirror variables")
            .persist_env(&flutter_env(ctx))
            .section("Verify")
            .line("flutter doctor")
            .line("")
            .echo(format!("Done. Flutter and pub now use {mirror}"))
            .echo("Open a new terminal (or source your shell profile) to apply it everywhere")
            .echo("To undo: restore your profile from its .mirrorkit.bak copy");
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(flutter_env(ctx)
            .iter()
            .map(|(name, value)| format!("export {name}=\"{value}\""))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}

/// CPAN: prepends the mirror to `urllist`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CpanRenderer;

fn cpan_unshift(url: &str) -> String {
    format!(
        "perl -MCPAN -e 'CPAN::HandleConfig->load; CPAN::HandleConfig->edit(\"urllist\", \"unshift\", \"{url}\"); CPAN::HandleConfig->commit'"
    )
}

impl ToolRenderer for CpanRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mirror = &ctx.mirror().name;
        let url = &ctx.mirror().url;
        let my_config = "~/.cpan/CPAN/MyConfig.pm";
        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring CPAN mirror ({mirror})..."))
            .line("mkdir -p ~/.cpan/CPAN")
            .section("Back up the user config (only on the first run)")
            .backup_once(my_config, false)
            .section("Prepend the mirror unless it is already listed")
            .line(format!("if ! grep -qF '{url}' {my_config} 2>/dev/null; then"))
            .line(format!("    {}", cpan_unshift(url)))
            .line("fi")
            .section("Verify")
            .line("perl -MCPAN -e 'CPAN::HandleConfig->load; print join(\"\\n\", @{$CPAN::Config->{urllist}}), \"\\n\"'")
            .line("")
            .echo(format!("Done. CPAN now tries {mirror} first"))
            .echo(format!("To undo: mv {my_config}{BACKUP_SUFFIX} {my_config}"));
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(cpan_unshift(&ctx.mirror().url))
    }
}

/// CRAN: `options(repos = ...)` in `~/.Rprofile`.
#[derive(Debug, Default, Clone, Copy)]
pub struct CranRenderer;

fn cran_option(url: &str) -> String {
    format!("options(repos = c(CRAN = \"{url}\"))")
}

impl ToolRenderer for CranRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mirror = &ctx.mirror().name;
        let option = cran_option(&ctx.mirror().url);
        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring CRAN mirror ({mirror})..."))
            .line("touch ~/.Rprofile")
            .section("Back up the profile (only on the first run)")
            .backup_once("~/.Rprofile", false)
            .section("Replace an earlier mirrorkit line, then append the new one")
            .line("grep -v '# mirrorkit$' ~/.Rprofile > ~/.Rprofile.mirrorkit.tmp")
            .line("mv ~/.Rprofile.mirrorkit.tmp ~/.Rprofile")
            .line(format!("printf '%s\\n' '{option}  # mirrorkit' >> ~/.Rprofile"))
            .echo("Updated ~/.Rprofile")
            .section("Verify")
            .line("Rscript -e 'getOption(\"repos\")'")
            .line("")
            .echo(format!("Done. R now installs packages from {mirror}"))
            .echo(format!("To undo: mv ~/.Rprofile{BACKUP_SUFFIX} ~/.Rprofile"));
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            "# Run inside R:\n{}",
            cran_option(&ctx.mirror().url)
        ))
    }

    fn config_file(&self) -> Option<&dyn ConfigFileCapability> {
        Some(self)
    }
}

impl ConfigFileCapability for CranRenderer {
    fn file_name(&self) -> &'static str {
        ".Rprofile"
    }

    fn render_config_file(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            "# R profile (.Rprofile)\n\
             # Generated by mirrorkit\n\
             # Location: ~/.Rprofile or the project root\n\
             \n\
             # CRAN mirror - {}\n\
             {}\n",
            ctx.mirror().name,
            cran_option(&ctx.mirror().url)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cran_option() {
        assert_eq!(
            cran_option("https://mirrors.ustc.edu.cn/CRAN/"),
            "options(repos = c(CRAN = \"https://mirrors.ustc.edu.cn/CRAN/\"))"
        );
    }

    #[test]
    fn test_cpan_unshift_is_one_line() {
        assert_eq!(cpan_unshift("https://mirrors.aliyun.com/CPAN/").lines().count(), 1);
    }
}
