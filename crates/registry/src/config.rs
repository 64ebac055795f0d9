use std::{
    env, fs,
    path::{Path, PathBuf},
};

use dirs_next::config_dir;
use hostshell_util::expand_tilde;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable allowing callers to override the configuration path.
pub const CONFIG_PATH_ENV: &str = "HOSTSHELL_CONFIG_PATH";

/// Default filename inside the `hostshell` configuration directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error for {path}: {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("invalid YAML in {path}: {source}")]
    Yaml { path: PathBuf, source: serde_yaml::Error },

    #[error("invalid JSON in {path}: {source}")]
    Json { path: PathBuf, source: serde_json::Error },
}

/// Shared libraries probed for each toolkit binding, in order.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolkitConfig {
    #[serde(default)]
    pub primary: Vec<String>,
    #[serde(default)]
    pub compat: Vec<String>,
}

/// Settings the host supplies to the shell adapter.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Emit `DEBUG:` lines on the operator sink.
    #[serde(default)]
    pub debug_logging: bool,
    /// Rename rules keyed by command short name.
    #[serde(default)]
    pub command_aliases: IndexMap<String, String>,
    /// Host manifests declaring the registered commands.
    #[serde(default)]
    pub catalogs: Vec<PathBuf>,
    #[serde(default)]
    pub toolkit: ToolkitConfig,
}

impl ShellConfig {
    /// Loads the configuration from [`default_config_path`].
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&default_config_path())
    }

    /// Loads the configuration from `path`. A missing file yields defaults.
    ///
    /// Files ending in `.json` are parsed as JSON, everything else as YAML.
    /// Relative catalog paths are resolved against the file's directory.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no configuration file; using defaults");
                return Ok(ShellConfig::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut config: ShellConfig = if is_json(path) {
            serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: path.to_path_buf(),
                source,
            })?
        } else if content.trim().is_empty() {
            ShellConfig::default()
        } else {
            serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
                path: path.to_path_buf(),
                source,
            })?
        };

        let base = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.catalogs = config
            .catalogs
            .into_iter()
            .map(|catalog| {
                let expanded = expand_tilde(&catalog.to_string_lossy());
                if expanded.is_relative() { base.join(expanded) } else { expanded }
            })
            .collect();
        Ok(config)
    }
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension().and_then(|ext| ext.to_str()).is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Get the default path for the configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("hostshell")
        .join(CONFIG_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ShellConfig::load_from(&dir.path().join("absent.yaml")).expect("load");
        assert_eq!(config, ShellConfig::default());
    }

    #[test]
    fn yaml_config_with_aliases_and_relative_catalogs() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        let mut file = fs::File::create(&path).expect("create");
        writeln!(
            file,
            "debug_logging: true\ncommand_aliases:\n  katana_4.0.2: katana\n  open_log_folder: logs\ncatalogs:\n  - catalogs/site.yaml\ntoolkit:\n  primary: [libtoolkit.so]"
        )
        .expect("write");

        let config = ShellConfig::load_from(&path).expect("load");
        assert!(config.debug_logging);
        assert_eq!(config.command_aliases.get("katana_4.0.2").map(String::as_str), Some("katana"));
        assert_eq!(config.catalogs, vec![dir.path().join("catalogs/site.yaml")]);
        assert_eq!(config.toolkit.primary, vec!["libtoolkit.so"]);
        assert!(config.toolkit.compat.is_empty());
    }

    #[test]
    fn json_config_is_detected_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"command_aliases": {"mari": "m"}}"#).expect("write");
        let config = ShellConfig::load_from(&path).expect("load");
        assert!(!config.debug_logging);
        assert_eq!(config.command_aliases.len(), 1);
    }

    #[test]
    fn malformed_config_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        fs::write(&path, "command_aliases: [not, a, map]").expect("write");
        assert!(matches!(ShellConfig::load_from(&path), Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn env_override_wins() {
        temp_env::with_var(CONFIG_PATH_ENV, Some("/opt/site/hostshell.yaml"), || {
            assert_eq!(default_config_path(), PathBuf::from("/opt/site/hostshell.yaml"));
        });
    }

    #[test]
    fn load_reads_the_overridden_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("site.yaml");
        fs::write(&path, "debug_logging: true").expect("write");
        temp_env::with_var(CONFIG_PATH_ENV, Some(&path), || {
            assert!(ShellConfig::load().expect("load").debug_logging);
        });
    }
}
