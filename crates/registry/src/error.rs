//! Error types for registry lookups, rendering and configuration checks.

use miette::Diagnostic;
use thiserror::Error;

/// Errors produced by the mirror registry.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum Error {
    /// No tool is registered under the requested key
    #[error("Unknown tool: {0}")]
    #[diagnostic(
        code(mirrorkit::registry::unknown_tool),
        help("Run `mirrorkit list` to see the supported tools")
    )]
    UnknownTool(String),

    /// The tool exists but does not offer the requested mirror
    #[error("Tool '{tool}' has no mirror '{mirror}'")]
    #[diagnostic(code(mirrorkit::registry::unknown_mirror))]
    UnknownMirror {
        /// Tool key
        tool: String,
        /// Requested mirror key
        mirror: String,
    },

    /// The tool requires an OS version but the key is not one of its versions
    #[error("Tool '{tool}' does not support OS version '{os}'")]
    #[diagnostic(code(mirrorkit::registry::unknown_os_version))]
    UnknownOsVersion {
        /// Tool key
        tool: String,
        /// Requested OS version key
        os: String,
    },

    /// The tool is OS-sensitive and no OS version was given
    #[error("Tool '{tool}' requires an OS version")]
    #[diagnostic(
        code(mirrorkit::registry::os_version_required),
        help("Pass one of the OS versions listed by `mirrorkit list`")
    )]
    OsVersionRequired {
        /// Tool key
        tool: String,
    },

    /// An OS version was given for a tool that does not take one
    #[error("Tool '{tool}' does not take an OS version (got '{os}')")]
    #[diagnostic(code(mirrorkit::registry::os_version_not_supported))]
    OsVersionNotSupported {
        /// Tool key
        tool: String,
        /// OS version key that was supplied
        os: String,
    },

    /// A registry entry violates a structural invariant
    #[error("Invalid definition for '{key}': {reason}")]
    #[diagnostic(code(mirrorkit::registry::invalid_definition))]
    InvalidDefinition {
        /// Offending tool, mirror, OS or category key
        key: String,
        /// What is wrong with it
        reason: String,
    },

    /// A mirror URL is not an absolute http(s) URL
    #[error("Invalid URL '{url}': {reason}")]
    #[diagnostic(code(mirrorkit::registry::invalid_url))]
    InvalidUrl {
        /// The rejected URL
        url: String,
        /// Why it was rejected
        reason: String,
    },

    /// A renderer could not produce output for a valid selection
    #[error("Failed to render {tool}: {message}")]
    #[diagnostic(code(mirrorkit::registry::render))]
    Render {
        /// Tool key
        tool: String,
        /// Renderer message
        message: String,
    },
}

impl Error {
    /// Create an invalid-definition error
    #[must_use]
    pub fn invalid_definition(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a render error
    #[must_use]
    pub fn render(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            tool: tool.into(),
            message: message.into(),
        }
    }
}

/// Result type for registry operations
pub type Result<T> = std::result::Result<T, Error>;
