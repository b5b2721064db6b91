use crate::error::Result;
use crate::tool::RenderContext;

use super::{ConfigFileCapability, ScriptWriter, ToolRenderer};

const GRADLE_INIT_SCRIPT: &str = "~/.gradle/init.d/mirrorkit-mirror.gradle";

/// Maven: a `settings.xml` mirroring `central`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MavenRenderer;

fn maven_settings(id: &str, name: &str, url: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<settings xmlns="http://maven.apache.org/SETTINGS/1.0.0"
          xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
          xsi:schemaLocation="http://maven.apache.org/SETTINGS/1.0.0 http://maven.apache.org/xsd/settings-1.0.0.xsd">
  <mirrors>
    <mirror>
      <id>{id}</id>
      <name>{name}</name>
      <url>{url}</url>
      <mirrorOf>central</mirrorOf>
    </mirror>
  </mirrors>
</settings>
"#
    )
}

impl ToolRenderer for MavenRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mirror = ctx.mirror();
        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring Maven mirror ({})...", mirror.name))
            .line("mkdir -p ~/.m2")
            .section("Back up the user settings (only on the first run)")
            .backup_once("~/.m2/settings.xml", false)
            .section("Write settings.xml")
            .heredoc(
                "cat > ~/.m2/settings.xml",
                &maven_settings(ctx.mirror_key(), &mirror.name, &mirror.url),
            )
            .echo("Wrote ~/.m2/settings.xml")
            .section("Verify")
            .line("grep -A 3 '<mirror>' ~/.m2/settings.xml")
            .line("")
            .echo(format!("Done. Maven now uses {}", mirror.name))
            .echo("To undo: mv ~/.m2/settings.xml.mirrorkit.bak ~/.m2/settings.xml");
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            "# Add inside <mirrors> in ~/.m2/settings.xml:\n\
             <mirror><id>{}</id><url>{}</url><mirrorOf>central</mirrorOf></mirror>",
            ctx.mirror_key(),
            ctx.mirror().url
        ))
    }

    fn config_file(&self) -> Option<&dyn ConfigFileCapability> {
        Some(self)
    }
}

impl ConfigFileCapability for MavenRenderer {
    fn file_name(&self) -> &'static str {
        "settings.xml"
    }

    fn render_config_file(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mirror = ctx.mirror();
        Ok(maven_settings(ctx.mirror_key(), &mirror.name, &mirror.url))
    }
}

/// Gradle: an init script that adds the mirror to every build.
#[derive(Debug, Default, Clone, Copy)]
pub struct GradleRenderer;

fn gradle_init(url: &str) -> String {
    format!(
        "allprojects {{
    buildscript {{
        repositories {{
            maven {{ url '{url}' }}
        }}
    }}
    repositories {{
        maven {{ url '{url}' }}
    }}
}}
"
    )
}

impl ToolRenderer for GradleRenderer {
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
        let mirror = ctx.mirror();
        let mut w = ScriptWriter::new(ctx);
        w.line("")
            .echo(format!("Configuring Gradle mirror ({})...", mirror.name))
            .line("mkdir -p ~/.gradle/init.d")
            .section("Back up an earlier init script (only on the first run)")
            .backup_once(GRADLE_INIT_SCRIPT, false)
            .section("Write the init script applied to every build")
            .heredoc(&format!("cat > {GRADLE_INIT_SCRIPT}"), &gradle_init(&mirror.url))
            .echo(format!("Wrote {GRADLE_INIT_SCRIPT}"))
            .section("Verify")
            .line(format!("cat {GRADLE_INIT_SCRIPT}"))
            .line("")
            .echo(format!("Done. Gradle builds now resolve through {}", mirror.name))
            .echo(format!("To undo: rm {GRADLE_INIT_SCRIPT}"));
        Ok(w.finish())
    }

    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            "// In build.gradle or settings.gradle:\n\
             repositories {{\n\
             \x20   maven {{ url '{}' }}\n\
             }}",
            ctx.mirror().url
        ))
    }

    fn config_file(&self) -> Option<&dyn ConfigFileCapability> {
        Some(self)
    }
}

impl ConfigFileCapability for GradleRenderer {
    fn file_name(&self) -> &'static str {
        "mirrorkit-mirror.gradle"
    }

    fn render_config_file(&self, ctx: &RenderContext<'_>) -> Result<String> {
        Ok(format!(
            "// Gradle init script\n\
             // Generated by mirrorkit\n\
             // Location: {GRADLE_INIT_SCRIPT}\n\
             \n\
             {}",
            gradle_init(&ctx.mirror().url)
        ))
    }
}
