//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration only: where the database lives, which port to
//! listen on and the default log level. Everything else is data.

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "NPULSE_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "npulse.db";

/// Default HTTP port for the learning-path service
pub const DEFAULT_PORT: u16 = 5780;

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Root folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            port: default_port(),
            logging: LoggingConfig::default(),
        }
    }
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Invalid TOML: {}", e)))
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load the platform config file, falling back to defaults
    ///
    /// A missing file is normal. An unreadable or invalid file also falls
    /// back, so the service always starts. Nothing is logged here: this runs
    /// before the tracing subscriber exists, so the caller reports the
    /// returned [`ConfigOrigin`] once logging is up.
    pub fn load_or_default(path: Option<&Path>) -> (Self, ConfigOrigin) {
        let Some(path) = path.map(Path::to_path_buf).or_else(default_config_path) else {
            return (Self::default(), ConfigOrigin::Defaults);
        };

        if !path.exists() {
            return (Self::default(), ConfigOrigin::Defaults);
        }

        match Self::load(&path) {
            Ok(config) => (config, ConfigOrigin::File(path)),
            Err(error) => (Self::default(), ConfigOrigin::Rejected { path, error }),
        }
    }
}

/// Where the bootstrap configuration came from
#[derive(Debug)]
pub enum ConfigOrigin {
    /// No config file; compiled defaults
    Defaults,
    /// Parsed from this file
    File(PathBuf),
    /// File exists but could not be used; defaults were substituted
    Rejected { path: PathBuf, error: Error },
}

impl ConfigOrigin {
    /// Report the outcome through tracing (call after subscriber init)
    pub fn log(&self) {
        match self {
            ConfigOrigin::Defaults => info!("No config file found, using defaults"),
            ConfigOrigin::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigOrigin::Rejected { path, error } => {
                warn!("Ignoring config file {}: {}", path.display(), error)
            }
        }
    }
}

/// Root folder resolution priority order:
/// 1. Command-line argument (highest priority)
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default (fallback)
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    get_default_root_folder()
}

/// Database file path inside a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE)
}

/// Platform configuration file path (`<config dir>/npulse/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("npulse").join("config.toml"))
}

/// Get OS-dependent default root folder path
pub fn get_default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/npulse (or /var/lib/npulse for system-wide)
        dirs::data_local_dir()
            .map(|d| d.join("npulse"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/npulse"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("npulse"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/npulse"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("npulse"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\npulse"))
    } else {
        PathBuf::from("./npulse_data")
    }
}
