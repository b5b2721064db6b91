//! # mirrorkit-registry
//!
//! Declarative registry of package managers and the mirrors they can be
//! pointed at, together with the renderers that turn a selection into a setup
//! script, a short manual command and (for some tools) a configuration file.
//!
//! ## Example
//!
//! ```
//! use mirrorkit_registry::Registry;
//!
//! let npm = Registry::builtin().tool("npm")?;
//! let manual = npm.render_manual_command("aliyun", None)?;
//! assert_eq!(manual, "npm config set registry https://registry.npmmirror.com");
//! # Ok::<(), mirrorkit_registry::Error>(())
//! ```
//!
//! Rendering is pure: the same selection always yields byte-identical output.
//! Invalid selections (unknown mirror, missing or unexpected OS version) are
//! reported as [`Error`] values.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod builtin;
pub mod error;
pub mod model;
pub mod paths;
pub mod registry;
pub mod render;
pub mod tool;
pub mod url;

pub use error::{Error, Result};
pub use model::{
    Category, CategoryKey, Combination, ConfigFile, GeneratedArtifact, MirrorDefinition,
    OsSupport, ToolMetadata,
};
pub use paths::{normalize_os_version, page_path, script_file_name, tool_page_path};
pub use registry::Registry;
pub use render::{ConfigFileCapability, ToolRenderer};
pub use tool::{OsVersion, RenderContext, ToolDefinition, ToolDefinitionBuilder};
