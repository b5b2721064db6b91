use serde_json::json;

use crate::error::Result;
use crate::tool::RenderContext;

use super::{BACKUP_SUFFIX, ConfigFileCapability, ScriptWriter, ToolRenderer};

const DAEMON_JSON: &str = "/etc/docker/daemon.json";

/// Docker: registry mirror in the daemon configuration.
#[derive(Debug, Default, Clone, Copy)]
pub struct DockerRenderer;

fn daemon_json(ctx: &RenderContext<'_>) -> Result<String> {
    let body = json!({ "registry-mirrors": [ctx.mirror().url] });
    serde_json::to_string_pretty(&body).map_err(|e| ctx.render_error(e.to_string()))
}

impl ToolRenderer for DockerRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mirror = &ctx.mirror().name;
        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring Docker registry mirror ({mirror})..."))
            .line("sudo mkdir -p /etc/docker")
            .section("Back up the daemon configuration (only on the first run)")
            .backup_once(DAEMON_JSON, true)
            .section("Write daemon.json")
            .heredoc(
                &format!("sudo tee {DAEMON_JSON} > /dev/null"),
                &daemon_json(ctx)?,
            )
            .echo("daemon.json updated")
            .section("Restart the daemon")
            .echo("Restarting Docker...")
            .line("sudo systemctl daemon-reload")
            .line("sudo systemctl restart docker")
            .section("Verify")
            .line("docker info | grep -A 1 'Registry Mirrors'")
            .line("")
            .echo(format!("Done. Docker now pulls through {mirror}"))
            .echo(format!(
                "To undo: sudo mv {DAEMON_JSON}{BACKUP_SUFFIX} {DAEMON_JSON} && sudo systemctl restart docker"
            ));
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            "sudo mkdir -p /etc/docker\n\
             echo '{{\"registry-mirrors\": [\"{}\"]}}' | sudo tee {DAEMON_JSON}\n\
             sudo systemctl restart docker",
            ctx.mirror().url
        ))
    }

    fn config_file(&self) -> Option<&dyn ConfigFileCapability> {
        Some(self)
    }
}

impl ConfigFileCapability for DockerRenderer {
    fn file_name(&self) -> &'static str {
        "daemon.json"
    }

    fn render_config_file(&self, ctx: &RenderContext<'_>) -> Result<String> {
        daemon_json(ctx)
    }
}
