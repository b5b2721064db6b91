//! Renderer traits and the shared script builder.
//!
//! Every tool carries a [`ToolRenderer`]. Tools that can also emit a standalone
//! configuration file expose a [`ConfigFileCapability`] through
//! [`ToolRenderer::config_file`]; the registry discovers it there instead of
//! probing for optional functions.
//!
//! # Script shape
//!
//! Every script produced through [`ScriptWriter`] starts with a bash shebang
//! and a comment header, prints what it is doing, backs up any file it is
//! about to overwrite (once, so re-running keeps the original), applies the
//! change, prints a verification step and finishes with an undo hint.

mod apt;
mod cargo;
mod docker;
mod go;
mod homebrew;
mod jvm;
mod misc;
mod node;
mod python;
mod yum;

use std::fmt;

pub use apt::{AptRenderer, sources_list};
pub use cargo::CargoRenderer;
pub use docker::DockerRenderer;
pub use go::GoRenderer;
pub use homebrew::HomebrewRenderer;
pub use jvm::{GradleRenderer, MavenRenderer};
pub use misc::{ComposerRenderer, CpanRenderer, CranRenderer, FlutterRenderer, NugetRenderer, RubyGemsRenderer};
pub use node::{NodeCli, NodeRenderer};
pub use python::{CondaRenderer, PipRenderer};
pub use yum::YumRenderer;

use crate::error::Result;
use crate::tool::RenderContext;

/// Suffix given to backups taken by generated scripts
pub const BACKUP_SUFFIX: &str = ".mirrorkit.bak";

/// Renders the script and manual snippet for one tool.
///
/// Implementations must be pure: the same context always yields the same
/// text.
pub trait ToolRenderer: fmt::Debug + Send + Sync {
    /// Full, idempotent setup script
    fn script(&self, ctx: &RenderContext<'_>) -> Result<String>;

    /// Short snippet (one to five lines) for users who prefer to type it
    fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String>;

    /// Config-file support, if the tool has any
    fn config_file(&self) -> Option<&dyn ConfigFileCapability> {
        None
    }
}

/// Emits a ready-to-save configuration file.
pub trait ConfigFileCapability {
    /// Conventional file name, e.g. `.npmrc`
    fn file_name(&self) -> &'static str;

    /// File body
    fn render_config_file(&self, ctx: &RenderContext<'_>) -> Result<String>;
}

/// Line-oriented builder for generated shell scripts.
#[derive(Debug)]
pub(crate) struct ScriptWriter {
    buf: String,
}

impl ScriptWriter {
    /// Start a script with the standard header for `ctx`.
    pub(crate) fn new(ctx: &RenderContext<'_>) -> Self {
        let tool = ctx.tool();
        let mirror = ctx.mirror();
        let mut buf = String::from("#!/bin/bash\n");
        buf.push_str(&format!(
            "# {} mirror configuration - {}\n",
            tool.name(),
            mirror.name
        ));
        if let Some(os) = ctx.os_version() {
            buf.push_str(&format!("# OS version: {}\n", os.label));
        }
        buf.push_str("# Generated by mirrorkit\n");
        if let Some(note) = &mirror.note {
            buf.push_str(&format!("# Note: {note}\n"));
        }
        Self { buf }
    }

    /// Blank line followed by a `# comment`
    pub(crate) fn section(&mut self, comment: &str) -> &mut Self {
        self.buf.push('\n');
        self.buf.push_str("# ");
        self.buf.push_str(comment);
        self.buf.push('\n');
        self
    }

    /// Raw line
    pub(crate) fn line(&mut self, line: impl AsRef<str>) -> &mut Self {
        self.buf.push_str(line.as_ref());
        self.buf.push('\n');
        self
    }

    /// Several raw lines
    pub(crate) fn lines<I, S>(&mut self, lines: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.line(line);
        }
        self
    }

    /// `echo "..."`; the message must not contain double quotes
    pub(crate) fn echo(&mut self, message: impl AsRef<str>) -> &mut Self {
        self.line(format!("echo \"{}\"", message.as_ref()))
    }

    /// `{command} << 'EOF'` with a quoted here-document body
    pub(crate) fn heredoc(&mut self, command: &str, body: &str) -> &mut Self {
        self.line(format!("{command} << 'EOF'"));
        self.buf.push_str(body);
        if !body.ends_with('\n') {
            self.buf.push('\n');
        }
        self.line("EOF")
    }

    /// Copy `path` aside once so re-running keeps the pristine original.
    pub(crate) fn backup_once(&mut self, path: &str, sudo: bool) -> &mut Self {
        let elevate = if sudo { "sudo " } else { "" };
        self.line(format!(
            "if [ -f {path} ] && [ ! -f {path}{BACKUP_SUFFIX} ]; then"
        ))
        .line(format!("    {elevate}cp {path} {path}{BACKUP_SUFFIX}"))
        .line(format!("    echo \"Backed up {path} to {path}{BACKUP_SUFFIX}\""))
        .line("fi")
    }

    /// Export variables now and persist them in the user's shell profile,
    /// replacing earlier lines for the same variables.
    pub(crate) fn persist_env(&mut self, vars: &[(&str, String)]) -> &mut Self {
        for (name, value) in vars {
            self.line(format!("export {name}=\"{value}\""));
        }
        self.section("Persist in the shell profile")
            .line("SHELL_RC=\"\"")
            .line("if [ -f ~/.zshrc ]; then")
            .line("    SHELL_RC=~/.zshrc")
            .line("elif [ -f ~/.bash_profile ]; then")
            .line("    SHELL_RC=~/.bash_profile")
            .line("elif [ -f ~/.bashrc ]; then")
            .line("    SHELL_RC=~/.bashrc")
            .line("fi")
            .line("if [ -n \"$SHELL_RC\" ]; then")
            .line(format!(
                "    if [ ! -f \"$SHELL_RC{BACKUP_SUFFIX}\" ]; then cp \"$SHELL_RC\" \"$SHELL_RC{BACKUP_SUFFIX}\"; fi"
            ));
        let patterns: Vec<String> = vars
            .iter()
            .map(|(name, _)| format!("-e '^export {name}='"))
            .collect();
        self.line(format!(
            "    grep -v {} \"$SHELL_RC\" > \"$SHELL_RC.mirrorkit.tmp\"",
            patterns.join(" ")
        ))
        .line("    mv \"$SHELL_RC.mirrorkit.tmp\" \"$SHELL_RC\"");
        for (name, value) in vars {
            self.line(format!(
                "    printf '%s\\n' 'export {name}=\"{value}\"' >> \"$SHELL_RC\""
            ));
        }
        self.line("    echo \"Updated $SHELL_RC\"")
            .line("else")
            .line("    echo \"No shell profile found; add the exports above to your profile manually\"")
            .line("fi")
    }

    /// Finish the script
    pub(crate) fn finish(self) -> String {
        self.buf
    }
}

/// Host part of the mirror URL, for tools that address mirrors by host.
pub(crate) fn mirror_host<'a>(ctx: &RenderContext<'a>) -> Result<&'a str> {
    Ok(ctx.mirror().parsed_url()?.host())
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::model::{CategoryKey, MirrorDefinition, OsSupport};
    use crate::tool::ToolDefinition;

    use super::ToolRenderer;

    /// A single-mirror tool for exercising one renderer in isolation.
    pub(crate) fn tool_with(
        key: &str,
        renderer: impl ToolRenderer + 'static,
        mirror: MirrorDefinition,
        os: OsSupport,
    ) -> ToolDefinition {
        ToolDefinition::builder(key, CategoryKey::Other, renderer)
            .name(key.to_uppercase())
            .mirror("test", mirror)
            .os_support(os)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::tool_with;
    use super::*;
    use crate::model::{MirrorDefinition, OsSupport};

    #[derive(Debug)]
    struct EchoRenderer;

    impl ToolRenderer for EchoRenderer {
        fn script(&self, ctx: &RenderContext<'_>) -> Result<String> {
            let mut w = ScriptWriter::new(ctx);
            w.echo("hello");
            w.backup_once("~/.echorc", false);
            Ok(w.finish())
        }

        fn manual_command(&self, ctx: &RenderContext<'_>) -> Result<String> {
            Ok(format!("echo {}", ctx.mirror().url))
        }
    }

    #[test]
    fn test_header_contains_mirror_and_note() {
        let tool = tool_with(
            "echo",
            EchoRenderer,
            MirrorDefinition::new("Example", "https://example.com").with_note("be careful"),
            OsSupport::Any,
        );
        let script = tool.render_script("test", None).unwrap();
        assert!(script.starts_with("#!/bin/bash\n# ECHO mirror configuration - Example\n"));
        assert!(script.contains("# Note: be careful\n"));
        assert!(!script.contains("# OS version"));
    }

    #[test]
    fn test_header_contains_os_label() {
        let tool = tool_with(
            "echo",
            EchoRenderer,
            MirrorDefinition::new("Example", "https://example.com"),
            OsSupport::requires([("demo-1", "Demo 1")]),
        );
        let script = tool.render_script("test", Some("demo-1")).unwrap();
        assert!(script.contains("# OS version: Demo 1\n"));
    }

    #[test]
    fn test_backup_once_is_guarded() {
        let tool = tool_with(
            "echo",
            EchoRenderer,
            MirrorDefinition::new("Example", "https://example.com"),
            OsSupport::Any,
        );
        let script = tool.render_script("test", None).unwrap();
        assert!(script.contains("if [ -f ~/.echorc ] && [ ! -f ~/.echorc.mirrorkit.bak ]; then"));
        assert!(script.contains("    cp ~/.echorc ~/.echorc.mirrorkit.bak\n"));
    }

    #[test]
    fn test_tool_without_capability_has_no_config_file() {
        let tool = tool_with(
            "echo",
            EchoRenderer,
            MirrorDefinition::new("Example", "https://example.com"),
            OsSupport::Any,
        );
        assert!(!tool.has_config_file());
        assert_eq!(tool.render_config_file("test", None).unwrap(), None);
    }
}
