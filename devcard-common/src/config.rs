//! Configuration loading and root folder resolution
//!
//! Everything the tool persists lives under one root folder: the pupil
//! database, the license key file and the activation date file. The root
//! folder is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. `DEVCARD_ROOT` environment variable
//! 3. `root_folder` in the TOML config file
//! 4. Compiled default (directory of the executable, else the platform data dir)
//!
//! A missing config file is not an error; every setting has a built-in default.
//! Relative paths in the config file are taken relative to the root folder.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable overriding the root folder
pub const ROOT_ENV_VAR: &str = "DEVCARD_ROOT";

/// Config file name looked up in the root folder and the user config dir
pub const CONFIG_FILE_NAME: &str = "devcard.toml";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TomlConfig {
    /// Root folder for the database and license files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_folder: Option<PathBuf>,

    /// Database file name or path (default `pupil_db.db`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_file: Option<PathBuf>,

    #[serde(default)]
    pub access: AccessConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// License key and activation date locations
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Default `access_key/access_key.txt`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_file: Option<PathBuf>,

    /// Default `activation_date.json`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activation_file: Option<PathBuf>,
}

/// Report filling options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Alternative recommendation table (TOML); the built-in table is used if unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<PathBuf>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    // The interactive console shares the terminal with the log output
    "warn".to_string()
}

/// Built-in fallbacks when no override is configured
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub database_file: PathBuf,
    pub key_file: PathBuf,
    pub activation_file: PathBuf,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            database_file: PathBuf::from("pupil_db.db"),
            key_file: PathBuf::from("access_key").join("access_key.txt"),
            activation_file: PathBuf::from("activation_date.json"),
            log_level: default_log_level(),
        }
    }
}

/// Directory of the running executable, else `<data_local_dir>/devcard`
fn default_root_folder() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .or_else(|| dirs::data_local_dir().map(|d| d.join("devcard")))
        .unwrap_or_else(|| PathBuf::from("./devcard_data"))
}

/// Resolves the root folder from CLI, environment, TOML and defaults
#[derive(Debug, Clone, Default)]
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Root folder given on the command line
    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    /// Root folder from a loaded TOML config
    pub fn with_toml(mut self, config: Option<&TomlConfig>) -> Self {
        self.toml_root = config.and_then(|c| c.root_folder.clone());
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            debug!("Root folder from command line: {}", path.display());
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_ENV_VAR) {
            if !path.trim().is_empty() {
                debug!("Root folder from {}: {}", ROOT_ENV_VAR, path);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_root {
            debug!("Root folder from config file: {}", path.display());
            return path.clone();
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Locate the config file: explicit path, then the root folder, then the user config dir
pub fn find_config_file(explicit: Option<&Path>, root_hint: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let in_root = root_hint.join(CONFIG_FILE_NAME);
    if in_root.exists() {
        return Some(in_root);
    }

    dirs::config_dir()
        .map(|d| d.join("devcard").join(CONFIG_FILE_NAME))
        .filter(|p| p.exists())
}

/// Load a TOML config file
///
/// Returns `Ok(None)` when the file does not exist; a file that exists but
/// cannot be read or parsed is an error.
pub fn load_toml_config(path: &Path) -> Result<Option<TomlConfig>> {
    if !path.exists() {
        debug!("No config file at {}", path.display());
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded config file {}", path.display());
    Ok(Some(config))
}

/// Concrete file locations under a resolved root folder
#[derive(Debug, Clone, PartialEq)]
pub struct AppPaths {
    pub root_folder: PathBuf,
    pub database: PathBuf,
    pub key_file: PathBuf,
    pub activation_file: PathBuf,
    pub recommendations: Option<PathBuf>,
}

impl AppPaths {
    /// Apply config overrides on top of compiled defaults
    pub fn new(root_folder: PathBuf, config: &TomlConfig) -> Self {
        let defaults = CompiledDefaults::for_current_platform();
        let under_root = |p: &Path| {
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                root_folder.join(p)
            }
        };

        Self {
            database: under_root(config.database_file.as_deref().unwrap_or(defaults.database_file.as_path())),
            key_file: under_root(config.access.key_file.as_deref().unwrap_or(defaults.key_file.as_path())),
            activation_file: under_root(
                config
                    .access
                    .activation_file
                    .as_deref()
                    .unwrap_or(defaults.activation_file.as_path()),
            ),
            recommendations: config.report.recommendations.as_deref().map(under_root),
            root_folder,
        }
    }

    /// Create the root folder if needed (idempotent)
    pub fn ensure_root_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder {}", self.root_folder.display());
        }
        Ok(())
    }
}
