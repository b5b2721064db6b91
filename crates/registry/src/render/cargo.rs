use crate::error::Result;
use crate::tool::RenderContext;

use super::{ConfigFileCapability, ScriptWriter, ToolRenderer};

const CARGO_CONFIG: &str = "~/.cargo/config.toml";

/// Cargo: replaces the crates.io source.
#[derive(Debug, Default, Clone, Copy)]
pub struct CargoRenderer;

/// Source replacement keyed by the mirror. RsProxy also publishes a named
/// registry and needs git fetches through the CLI.
fn source_replacement(ctx: &RenderContext<'_>) -> String {
    let key = ctx.mirror_key();
    let url = &ctx.mirror().url;
    let mut out = format!(
        "[source.crates-io]\n\
         replace-with = '{key}'\n\
         \n\
         [source.{key}]\n\
         registry = \"{url}\"\n"
    );
    if key == "rsproxy" {
        out.push_str(&format!(
            "\n[registries.{key}]\n\
             index = \"{url}\"\n\
             \n\
             [net]\n\
             git-fetch-with-cli = true\n"
        ));
    }
    out
}

impl ToolRenderer for CargoRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mirror = &ctx.mirror().name;
        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring Cargo registry mirror ({mirror})..."))
            .line("mkdir -p ~/.cargo")
            .section("Back up the user config (only on the first run)")
            .backup_once(CARGO_CONFIG, false)
            .section("Write the source replacement")
            .heredoc(&format!("cat > {CARGO_CONFIG}"), &source_replacement(ctx))
            .echo(format!("Wrote {CARGO_CONFIG}"))
            .section("Verify")
            .line(format!("cat {CARGO_CONFIG}"))
            .line("")
            .echo(format!("Done. Cargo now uses {mirror}"))
            .echo(format!("To undo: mv {CARGO_CONFIG}.mirrorkit.bak {CARGO_CONFIG} (or delete it)"));
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let key = ctx.mirror_key();
        Ok(format!(
            "# Add to {CARGO_CONFIG}:\n\
             [source.crates-io]\n\
             replace-with = '{key}'\n\
             [source.{key}]\n\
             registry = \"{}\"",
            ctx.mirror().url
        ))
    }

    fn config_file(&self) -> Option<&dyn ConfigFileCapability> {
        Some(self)
    }
}

impl ConfigFileCapability for CargoRenderer {
    fn file_name(&self) -> &'static str {
        "config.toml"
    }

    fn render_config_file(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            "# Cargo configuration (config.toml)\n\
             # Generated by mirrorkit\n\
             # Location: {CARGO_CONFIG}\n\
             \n\
             {}",
            source_replacement(ctx)
        ))
    }
}
