use clap::{Parser, Subcommand, ValueEnum};
use miette::{Diagnostic, Report};
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// CLI or configuration error exit code
pub const EXIT_CLI: i32 = 2;
/// Generation failure exit code: an item failed to render or write, or collided
pub const EXIT_GENERATION: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// CLI or configuration error (exit code 2)
    #[error("CLI/configuration error: {message}")]
    #[diagnostic(code(mirrorkit::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Generation error (exit code 3)
    #[error("Generation error: {message}")]
    #[diagnostic(code(mirrorkit::cli::generation))]
    Generation {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Other unexpected error (exit code 3)
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(mirrorkit::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new configuration error with help text
    #[must_use]
    pub fn config_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new generation error
    #[must_use]
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new generation error with help text
    #[must_use]
    pub fn generation_with_help(message: impl Into<String>, help: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
            help: Some(help.into()),
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }

}

/// Registry lookups fail on user input (unknown tool, mirror or OS version)
/// or on a broken registry; both are configuration errors. Render failures
/// are generation errors.
impl From<mirrorkit_registry::Error> for CliError {
    fn from(err: mirrorkit_registry::Error) -> Self {
        use mirrorkit_registry::Error;
        match err {
            Error::UnknownTool(_) => {
                Self::config_with_help(err.to_string(), "Run 'mirrorkit list' to see the supported tools")
            }
            Error::UnknownMirror { ref tool, .. }
            | Error::UnknownOsVersion { ref tool, .. }
            | Error::OsVersionRequired { ref tool }
            | Error::OsVersionNotSupported { ref tool, .. } => {
                let help = format!("Run 'mirrorkit list {tool}' to see its mirrors and OS versions");
                Self::config_with_help(err.to_string(), help)
            }
            Error::InvalidDefinition { .. } | Error::InvalidUrl { .. } => {
                Self::config(err.to_string())
            }
            Error::Render { .. } => Self::generation(err.to_string()),
        }
    }
}

/// Error message with its source chain appended
fn with_sources(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Site configuration problems exit with 2; everything else the generator
/// reports is a generation failure.
impl From<mirrorkit_generator::Error> for CliError {
    fn from(err: mirrorkit_generator::Error) -> Self {
        let message = with_sources(&err);
        match err {
            mirrorkit_generator::Error::Registry(inner) => inner.into(),
            _ if err.is_config() => {
                Self::config_with_help(message, "Fix site-config.json or pass --site-url")
            }
            mirrorkit_generator::Error::Write { .. } => Self::generation_with_help(
                message,
                "Check file permissions and ensure the output directory is writable",
            ),
            _ => Self::other(message),
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CLI,
        CliError::Generation { .. } | CliError::Other { .. } => EXIT_GENERATION,
    }
}

/// Render error appropriately based on JSON flag
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        let error_envelope = ErrorEnvelope::new(serde_json::json!({
            "code": match err {
                CliError::Config { .. } => "config",
                CliError::Generation { .. } => "generation",
                CliError::Other { .. } => "other",
            },
            "message": err.to_string()
        }));

        match serde_json::to_string(&error_envelope) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else {
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
        let _ = io::stderr().flush();
    }
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct OkEnvelope<T> {
    /// Status indicator - always "ok" for success
    pub status: &'static str,
    /// The actual data payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope<E> {
    /// Status indicator - always "error" for failures
    pub status: &'static str,
    /// The error details
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: E) -> Self {
        Self {
            status: "error",
            error,
        }
    }
}

/// Print `data` as a JSON success envelope on stdout.
pub fn print_json<T: Serialize>(data: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(&OkEnvelope::new(data))
        .map_err(|e| CliError::other(format!("Failed to serialize output: {e}")))?;
    println!("{json}");
    Ok(())
}

/// Main CLI entry point for mirrorkit.
///
/// Generates package-manager mirror setup scripts and the static site that
/// documents them.
#[derive(Parser, Debug)]
#[command(name = "mirrorkit")]
#[command(about = "Generate package-manager mirror setup scripts and their static site")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: crate::tracing::LogLevel,

    /// Log line format on stderr.
    #[arg(
        long,
        global = true,
        value_enum,
        value_name = "FORMAT",
        help = "Log format on stderr (defaults to json with --json, compact otherwise)"
    )]
    pub log_format: Option<crate::tracing::TracingFormat>,

    /// Emit JSON envelope instead of text.
    #[arg(long, global = true, help = "Emit JSON envelope instead of text")]
    pub json: bool,

    /// Site configuration file.
    #[arg(
        long,
        global = true,
        env = "MIRRORKIT_CONFIG",
        default_value = mirrorkit_generator::SITE_CONFIG_FILE,
        value_name = "FILE",
        help = "Site configuration file (missing file means defaults)"
    )]
    pub config: PathBuf,

    /// Output root for generated files.
    #[arg(
        long,
        short = 'o',
        global = true,
        env = "MIRRORKIT_OUT",
        default_value = "dist",
        value_name = "DIR",
        help = "Output root for generated files"
    )]
    pub out: PathBuf,

    /// Public site URL, overriding the configuration file.
    #[arg(
        long,
        global = true,
        env = "MIRRORKIT_SITE_URL",
        value_name = "URL",
        help = "Public site URL, overriding siteUrl from the configuration file"
    )]
    pub site_url: Option<String>,
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Write every setup script plus the manifest, test matrix and diff report.
    #[command(about = "Write setup scripts, manifest, test matrix and diff report")]
    Scripts,
    /// Write combination, tool, overview and home pages.
    #[command(about = "Write the static site pages")]
    Pages,
    /// Write sitemap.xml and robots.txt.
    #[command(about = "Write sitemap.xml and robots.txt")]
    Sitemap,
    /// Render and validate every script without writing.
    #[command(about = "Render and validate every script without writing anything")]
    Validate,
    /// Run scripts, pages and sitemap in sequence.
    #[command(about = "Run scripts, pages and sitemap in sequence")]
    Build,
    /// List categories and tools, or one tool's mirrors and OS versions.
    #[command(about = "List tools, or one tool's mirrors and OS versions")]
    List {
        /// Tool to describe in detail.
        #[arg(value_name = "TOOL")]
        tool: Option<String>,
    },
    /// Render one selection to stdout.
    #[command(about = "Render the script, manual command or config file for one selection")]
    Show {
        /// Tool key, e.g. npm.
        #[arg(value_name = "TOOL")]
        tool: String,
        /// Mirror key, e.g. aliyun.
        #[arg(value_name = "MIRROR")]
        mirror: String,
        /// OS version key for OS-sensitive tools, e.g. ubuntu-22.04.
        #[arg(long, value_name = "OS")]
        os: Option<String>,
        /// Which part to print.
        #[arg(long, value_enum, default_value_t = ShowPart::All)]
        part: ShowPart,
    },
    /// Measure HEAD latency to every mirror of a tool.
    #[command(about = "Measure HEAD latency to every mirror of a tool")]
    Probe {
        /// Tool key whose mirrors are probed.
        #[arg(value_name = "TOOL")]
        tool: String,
        /// One attempt per mirror with a short timeout.
        #[arg(long, help = "One attempt per mirror with a 500 ms timeout")]
        quick: bool,
    },
}

impl Commands {
    /// Subcommand name as typed on the command line
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Scripts => "scripts",
            Self::Pages => "pages",
            Self::Sitemap => "sitemap",
            Self::Validate => "validate",
            Self::Build => "build",
            Self::List { .. } => "list",
            Self::Show { .. } => "show",
            Self::Probe { .. } => "probe",
        }
    }
}

/// Part of a rendered selection printed by `show`
#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum, Default)]
pub enum ShowPart {
    /// Script, manual command and config file
    #[default]
    All,
    /// Setup script only
    Script,
    /// Manual command only
    Manual,
    /// Config file only
    Config,
}

/// Parse command line arguments
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(exit_code_for(&CliError::config("x")), EXIT_CLI);
        assert_eq!(exit_code_for(&CliError::generation("x")), EXIT_GENERATION);
        assert_eq!(exit_code_for(&CliError::other("x")), EXIT_GENERATION);
    }

    #[test]
    fn test_registry_errors_map_to_config() {
        let err: CliError = mirrorkit_registry::Error::UnknownTool("nope".into()).into();
        assert!(matches!(err, CliError::Config { help: Some(_), .. }));

        let err: CliError = mirrorkit_registry::Error::OsVersionRequired { tool: "apt".into() }.into();
        match err {
            CliError::Config { help, .. } => assert!(help.unwrap().contains("mirrorkit list apt")),
            other => panic!("unexpected {other:?}"),
        }

        let err: CliError = mirrorkit_registry::Error::render("npm", "boom").into();
        assert_eq!(exit_code_for(&err), EXIT_GENERATION);
    }

    #[test]
    fn test_generator_config_errors_map_to_config() {
        let err: CliError = mirrorkit_generator::Error::ConfigValue {
            key: "siteUrl".into(),
            reason: "must start with http:// or https://".into(),
        }
        .into();
        assert_eq!(exit_code_for(&err), EXIT_CLI);
        assert!(err.to_string().contains("siteUrl"));
    }

    #[test]
    fn test_parse_log_format() {
        use crate::tracing::TracingFormat;

        let cli = Cli::try_parse_from(["mirrorkit", "--log-format", "pretty", "list"]).unwrap();
        assert_eq!(cli.log_format, Some(TracingFormat::Pretty));
        let cli = Cli::try_parse_from(["mirrorkit", "list"]).unwrap();
        assert_eq!(cli.log_format, None);
        assert!(Cli::try_parse_from(["mirrorkit", "--log-format", "xml", "list"]).is_err());
    }

    #[test]
    fn test_parse_show() {
        let cli = Cli::try_parse_from([
            "mirrorkit", "show", "apt", "aliyun", "--os", "debian-12", "--part", "manual",
        ])
        .unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Show {
                tool: "apt".into(),
                mirror: "aliyun".into(),
                os: Some("debian-12".into()),
                part: ShowPart::Manual,
            })
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mirrorkit", "build", "--out", "site", "--site-url", "https://m.test", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.out, PathBuf::from("site"));
        assert_eq!(cli.site_url.as_deref(), Some("https://m.test"));
        assert_eq!(cli.command.unwrap().name(), "build");
    }
}
