pub mod generate;
pub mod list;
pub mod probe;
pub mod show;

use std::path::PathBuf;

use mirrorkit_generator::{GenerateOptions, SiteConfig};
use mirrorkit_registry::Registry;
use serde::Serialize;

use crate::cli::{Cli, CliError, Commands, print_json};

/// Global options shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Emit JSON envelopes instead of text
    pub json: bool,
    /// Site configuration file
    pub config: PathBuf,
    /// Output root
    pub out: PathBuf,
    /// Site URL override
    pub site_url: Option<String>,
}

impl Context {
    /// Collect the global options of a parsed command line
    #[must_use]
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            json: cli.json,
            config: cli.config.clone(),
            out: cli.out.clone(),
            site_url: cli.site_url.clone(),
        }
    }

    /// Site configuration from the config file, with the `--site-url`
    /// override applied.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the file is unreadable or malformed,
    /// or the override is not an http(s) URL.
    pub fn site_config(&self) -> Result<SiteConfig, CliError> {
        let site = SiteConfig::load(&self.config)?;
        Ok(match &self.site_url {
            Some(url) => site.with_site_url(url.as_str())?,
            None => site,
        })
    }

    /// Generation options for this invocation.
    ///
    /// # Errors
    ///
    /// See [`Context::site_config`].
    pub fn generate_options(&self) -> Result<GenerateOptions, CliError> {
        Ok(GenerateOptions {
            output_dir: self.out.clone(),
            site: self.site_config()?,
        })
    }

    /// Print `data` as JSON, or `text` otherwise
    ///
    /// # Errors
    ///
    /// Fails only when `data` cannot be serialized.
    pub fn emit<T: Serialize>(&self, data: &T, text: &str) -> Result<(), CliError> {
        if self.json {
            print_json(data)
        } else {
            print!("{text}");
            Ok(())
        }
    }
}

/// Run one command against `registry`.
///
/// The registry is checked first; a broken registry is a configuration error
/// no matter which command was requested.
///
/// # Errors
///
/// Configuration errors, lookups of unknown keys, and generation runs with
/// failed or collided items.
pub fn execute(command: Commands, registry: &Registry, ctx: &Context) -> Result<(), CliError> {
    let _span = tracing::info_span!(
        "command",
        command = command.name(),
        correlation_id = %crate::tracing::correlation_id(),
        start_time = %chrono::Utc::now().to_rfc3339(),
    )
    .entered();
    registry.validate()?;
    tracing::debug!(command = ?command, "Executing command");

    match command {
        Commands::Scripts => generate::execute(generate::Stage::Scripts, registry, ctx),
        Commands::Pages => generate::execute(generate::Stage::Pages, registry, ctx),
        Commands::Sitemap => generate::execute(generate::Stage::Sitemap, registry, ctx),
        Commands::Validate => generate::execute(generate::Stage::Validate, registry, ctx),
        Commands::Build => generate::execute(generate::Stage::Build, registry, ctx),
        Commands::List { tool } => list::execute(registry, tool.as_deref(), ctx),
        Commands::Show {
            tool,
            mirror,
            os,
            part,
        } => {
            let selection = show::Selection {
                tool: &tool,
                mirror: &mirror,
                os: os.as_deref(),
            };
            show::execute(registry, &selection, part, ctx)
        }
        Commands::Probe { tool, quick } => {
            let settings = if quick {
                probe::ProbeSettings::quick()
            } else {
                probe::ProbeSettings::default()
            };
            let http = probe::HttpHeadProbe::new(settings.timeout)?;
            probe::execute(registry, &tool, &http, &settings, ctx)
        }
    }
}
