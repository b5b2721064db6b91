//! Generator errors.
//!
//! Per-combination render or write failures are not errors: they are recorded
//! as [`Failure`](crate::Failure)s and generation continues. The variants here
//! abort a stage.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors that stop a generation stage.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The site configuration file exists but could not be read
    #[error("Failed to read site config {}", path.display())]
    #[diagnostic(code(mirrorkit::generator::config_read))]
    ConfigRead {
        /// Config file path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// The site configuration is not valid JSON of the expected shape
    #[error("Invalid site config {}: {source}", path.display())]
    #[diagnostic(
        code(mirrorkit::generator::config_parse),
        help("site-config.json holds a JSON object with camelCase keys such as \"siteUrl\"")
    )]
    ConfigParse {
        /// Config file path
        path: PathBuf,
        /// Underlying parse error
        #[source]
        source: serde_json::Error,
    },

    /// A configuration value parsed but is unusable
    #[error("Invalid site config value '{key}': {reason}")]
    #[diagnostic(code(mirrorkit::generator::config_value))]
    ConfigValue {
        /// camelCase key of the offending field
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// Writing an output file failed
    #[error("Failed to write {}", path.display())]
    #[diagnostic(code(mirrorkit::generator::write))]
    Write {
        /// Destination path
        path: PathBuf,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// Serializing a report failed
    #[error("JSON error: {0}")]
    #[diagnostic(code(mirrorkit::generator::json))]
    Json(#[from] serde_json::Error),

    /// Registry lookup or render error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Registry(#[from] mirrorkit_registry::Error),
}

impl Error {
    /// True for errors caused by configuration rather than generation
    #[must_use]
    pub const fn is_config(&self) -> bool {
        matches!(
            self,
            Self::ConfigRead { .. } | Self::ConfigParse { .. } | Self::ConfigValue { .. }
        )
    }
}

/// Result type for generator operations
pub type Result<T> = std::result::Result<T, Error>;
