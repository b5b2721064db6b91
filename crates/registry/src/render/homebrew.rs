use crate::error::Result;
use crate::tool::RenderContext;

use super::{ScriptWriter, ToolRenderer};

/// Homebrew: git remotes for brew and homebrew-core.
#[derive(Debug, Default, Clone, Copy)]
pub struct HomebrewRenderer;

fn remotes(ctx: &RenderContext<'_>) -> [(&'static str, String); 2] {
    let base = ctx.mirror().url.trim_end_matches('/');
    [
        (
            "HOMEBREW_BREW_GIT_REMOTE",
            format!("{base}/git/homebrew/brew.git"),
        ),
        (
            "HOMEBREW_CORE_GIT_REMOTE",
            format!("{base}/git/homebrew/homebrew-core.git"),
        ),
    ]
}

impl ToolRenderer for HomebrewRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mirror = &ctx.mirror().name;
        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring Homebrew mirror ({mirror})..."))
            .section("Point brew at the mirror")
            .persist_env(&remotes(ctx))
            .section("Fetch from the new remotes")
            .line("brew update")
            .section("Verify")
            .line("brew config | grep -i 'git'")
            .line("")
            .echo(format!("Done. Homebrew now uses {mirror}"))
            .echo("Open a new terminal (or source your shell profile) to apply it everywhere")
            .echo("To undo: restore your profile from its .mirrorkit.bak copy and run brew update");
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mut lines: Vec<String> = remotes(ctx)
            .iter()
            .map(|(name, value)| format!("export {name}=\"{value}\""))
            .collect();
        lines.push("brew update".to_string());
        Ok(lines.join("\n"))
    }
}
