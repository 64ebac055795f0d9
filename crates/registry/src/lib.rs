//! Registry crate for the host's command table.
//!
//! Holds the commands a host registers, the configuration that renames
//! them, the validation of those rename rules, and the manifest format the
//! command line host uses to declare commands.

pub mod aliases;
pub mod catalog;
pub mod config;
pub mod models;

pub use aliases::{ResolvedAliasMap, validated_name_replacements};
pub use catalog::{CommandAction, HostManifest, ManifestCommand, ManifestError};
pub use config::{ConfigError, ShellConfig, ToolkitConfig, default_config_path};
pub use models::{CommandEntry, CommandProperties, CommandRegistry};
