use crate::error::Result;
use crate::tool::RenderContext;

use super::{ConfigFileCapability, ScriptWriter, ToolRenderer, mirror_host};

/// pip: sets `global.index-url` and trusts the mirror host.
#[derive(Debug, Default, Clone, Copy)]
pub struct PipRenderer;

impl ToolRenderer for PipRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let url = &ctx.mirror().url;
        let host = mirror_host(ctx)?;
        let mirror = &ctx.mirror().name;

        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring pip index ({mirror})..."))
            .section("Back up the user config (only on the first run)")
            .backup_once("~/.config/pip/pip.conf", false)
            .backup_once("~/.pip/pip.conf", false)
            .line("PREVIOUS_INDEX=\"$(pip config get global.index-url 2>/dev/null)\"")
            .echo("Previous index: ${PREVIOUS_INDEX:-default}")
            .section("Point pip at the mirror")
            .line(format!("pip config set global.index-url {url}"))
            .line(format!("pip config set global.trusted-host {host}"))
            .section("Verify")
            .echo("Active index:")
            .line("pip config get global.index-url")
            .line("")
            .echo(format!("Done. pip now uses {mirror}"))
            .echo("To undo: pip config unset global.index-url && pip config unset global.trusted-host");
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            "pip config set global.index-url {}\npip config set global.trusted-host {}",
            ctx.mirror().url,
            mirror_host(ctx)?
        ))
    }

    fn config_file(&self) -> Option<&dyn ConfigFileCapability> {
        Some(self)
    }
}

impl ConfigFileCapability for PipRenderer {
    fn file_name(&self) -> &'static str {
        "pip.conf"
    }

    fn render_config_file(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            "# pip configuration\n\
             # Generated by mirrorkit\n\
             # Linux/macOS: ~/.config/pip/pip.conf (or ~/.pip/pip.conf)\n\
             # Windows: %APPDATA%\\pip\\pip.ini\n\
             \n\
             [global]\n\
             index-url = {}\n\
             \n\
             [install]\n\
             trusted-host = {}\n",
            ctx.mirror().url,
            mirror_host(ctx)?
        ))
    }
}

/// Conda: channel aliases under the mirror's `anaconda/` tree.
#[derive(Debug, Default, Clone, Copy)]
pub struct CondaRenderer;

fn condarc(base: &str) -> String {
    let base = base.trim_end_matches('/');
    format!(
        "channels:\n\
         \x20 - defaults\n\
         show_channel_urls: true\n\
         default_channels:\n\
         \x20 - {base}/anaconda/pkgs/main\n\
         \x20 - {base}/anaconda/pkgs/r\n\
         \x20 - {base}/anaconda/pkgs/msys2\n\
         custom_channels:\n\
         \x20 conda-forge: {base}/anaconda/cloud\n\
         \x20 pytorch: {base}/anaconda/cloud\n"
    )
}

impl ToolRenderer for CondaRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mirror = &ctx.mirror().name;
        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring conda channels ({mirror})..."))
            .section("Back up the user config (only on the first run)")
            .backup_once("~/.condarc", false)
            .section("Write the channel configuration")
            .heredoc("cat > ~/.condarc", &condarc(&ctx.mirror().url))
            .echo("Wrote ~/.condarc")
            .section("Drop the cached index")
            .line("conda clean -i -y")
            .section("Verify")
            .line("conda config --show channels default_channels")
            .line("")
            .echo(format!("Done. conda now uses {mirror}"))
            .echo("To undo: mv ~/.condarc.mirrorkit.bak ~/.condarc (or delete ~/.condarc)");
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let base = ctx.mirror().url.trim_end_matches('/');
        Ok(format!(
            "conda config --set show_channel_urls yes\n\
             conda config --add default_channels {base}/anaconda/pkgs/main\n\
             conda config --set custom_channels.conda-forge {base}/anaconda/cloud\n\
             conda clean -i -y"
        ))
    }

    fn config_file(&self) -> Option<&dyn ConfigFileCapability> {
        Some(self)
    }
}

impl ConfigFileCapability for CondaRenderer {
    fn file_name(&self) -> &'static str {
        ".condarc"
    }

    fn render_config_file(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            "# conda configuration (.condarc)\n\
             # Generated by mirrorkit\n\
             # Location: ~/.condarc\n\
             \n\
             {}",
            condarc(&ctx.mirror().url)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condarc_channels() {
        let rc = condarc("https://mirrors.tuna.tsinghua.edu.cn/");
        assert!(rc.contains("  - https://mirrors.tuna.tsinghua.edu.cn/anaconda/pkgs/main\n"));
        assert!(rc.contains("  conda-forge: https://mirrors.tuna.tsinghua.edu.cn/anaconda/cloud\n"));
        assert!(!rc.contains(".cn//"));
    }
}
