use crate::error::Result;
use crate::tool::RenderContext;

use super::{ConfigFileCapability, ScriptWriter, ToolRenderer};

/// Which Node.js package manager a [`NodeRenderer`] targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeCli {
    /// npm
    Npm,
    /// Yarn classic
    Yarn,
    /// pnpm
    Pnpm,
}

impl NodeCli {
    const fn command(self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
        }
    }

    /// Per-user rc file the CLI writes its registry setting to
    const fn rc_file(self) -> &'static str {
        match self {
            Self::Npm | Self::Pnpm => ".npmrc",
            Self::Yarn => ".yarnrc",
        }
    }
}

/// npm, Yarn and pnpm share one registry setting shape.
#[derive(Debug, Clone, Copy)]
pub struct NodeRenderer {
    cli: NodeCli,
}

impl NodeRenderer {
    /// Renderer for `cli`
    #[must_use]
    pub const fn new(cli: NodeCli) -> Self {
        Self { cli }
    }
}

impl ToolRenderer for NodeRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let cmd = self.cli.command();
        let rc = format!("~/{}", self.cli.rc_file());
        let url = &ctx.mirror().url;
        let name = ctx.tool().name();
        let mirror = &ctx.mirror().name;

        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring {name} registry ({mirror})..."))
            .section("Back up the user config (only on the first run)")
            .backup_once(&rc, false)
            .line(format!("PREVIOUS_REGISTRY=\"$({cmd} config get registry 2>/dev/null)\""))
            .echo("Previous registry: $PREVIOUS_REGISTRY")
            .section("Point the registry at the mirror")
            .line(format!("{cmd} config set registry {url}"))
            .section("Verify")
            .echo("Active registry:")
            .line(format!("{cmd} config get registry"))
            .line("")
            .echo(format!("Done. {name} now uses {mirror}"))
            .echo(format!("To undo: {cmd} config delete registry"));
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            "{} config set registry {}",
            self.cli.command(),
            ctx.mirror().url
        ))
    }

    fn config_file(&self) -> Option<&dyn ConfigFileCapability> {
        Some(self)
    }
}

impl ConfigFileCapability for NodeRenderer {
    fn file_name(&self) -> &'static str {
        self.cli.rc_file()
    }

    fn render_config_file(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let url = &ctx.mirror().url;
        let setting = match self.cli {
            NodeCli::Npm | NodeCli::Pnpm => format!("registry={url}"),
            NodeCli::Yarn => format!("registry \"{url}\""),
        };
        Ok(format!(
            "# {} configuration ({})\n\
             # Generated by mirrorkit\n\
             # Location: ~/{} or the project root\n\
             \n\
             {setting}\n",
            ctx.tool().name(),
            self.cli.rc_file(),
            self.cli.rc_file(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MirrorDefinition, OsSupport};
    use crate::render::test_support::tool_with;

    fn tool(cli: NodeCli) -> crate::tool::ToolDefinition {
        tool_with(
            cli.command(),
            NodeRenderer::new(cli),
            MirrorDefinition::new("Alibaba Cloud", "https://registry.npmmirror.com"),
            OsSupport::Any,
        )
    }

    #[test]
    fn test_manual_command_is_single_line() {
        let manual = tool(NodeCli::Pnpm).render_manual_command("test", None).unwrap();
        assert_eq!(manual, "pnpm config set registry https://registry.npmmirror.com");
    }

    #[test]
    fn test_yarnrc_quotes_url() {
        let config = tool(NodeCli::Yarn).render_config_file("test", None).unwrap().unwrap();
        assert!(config.contains("registry \"https://registry.npmmirror.com\"\n"));
    }

    #[test]
    fn test_npmrc_setting() {
        let t = tool(NodeCli::Npm);
        assert_eq!(t.config_file_name(), Some(".npmrc"));
        let config = t.render_config_file("test", None).unwrap().unwrap();
        assert!(config.contains("\nregistry=https://registry.npmmirror.com\n"));
    }

    #[test]
    fn test_script_backs_up_rc_file() {
        let script = tool(NodeCli::Npm).render_script("test", None).unwrap();
        assert!(script.contains("cp ~/.npmrc ~/.npmrc.mirrorkit.bak"));
        assert!(script.contains("npm config set registry https://registry.npmmirror.com\n"));
        assert!(script.contains("npm config delete registry"));
    }
}
