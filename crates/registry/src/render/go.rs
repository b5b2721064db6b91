use crate::error::Result;
use crate::tool::RenderContext;

use super::{ScriptWriter, ToolRenderer};

/// Go modules: `GOPROXY` with a `direct` fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct GoRenderer;

fn goproxy(ctx: &RenderContext<'_>) -> String {
    format!("{},direct", ctx.mirror().url)
}

impl ToolRenderer for GoRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mirror = &ctx.mirror().name;
        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring GOPROXY ({mirror})..."))
            .line("PREVIOUS_GOPROXY=\"$(go env GOPROXY)\"")
            .echo("Previous GOPROXY: $PREVIOUS_GOPROXY")
            .section("Set the module proxy")
            .line(format!("go env -w GOPROXY={}", goproxy(ctx)))
            .section("Private modules can bypass the proxy, e.g.")
            .line("# go env -w GOPRIVATE=*.corp.example.com")
            .section("Verify")
            .line("go env GOPROXY")
            .line("")
            .echo(format!("Done. Go modules now download through {mirror}"))
            .echo("To undo: go env -u GOPROXY");
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!("go env -w GOPROXY={}", goproxy(ctx)))
    }
}
