//! Configuration loading and database path resolution
//!
//! Bootstrap settings come from a small TOML file. Every key is optional and
//! a missing or unreadable file never prevents startup: the compiled defaults
//! are used instead and a warning is logged.
//!
//! Resolution priority for both the config file and the database path:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file (database path only)
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "OMS_CONFIG";

/// Environment variable naming the SQLite database file
pub const DATABASE_ENV_VAR: &str = "OMS_DATABASE";

/// Default HTTP port for the movie store server
pub const DEFAULT_PORT: u16 = 3000;

/// File name of the SQLite database inside the data folder
pub const DATABASE_FILE_NAME: &str = "movie_store.db";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Path to SQLite database file
    #[serde(default)]
    pub database_path: Option<PathBuf>,

    /// Interface the HTTP server binds to
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Restrict movie create/update/delete to admin sessions
    #[serde(default)]
    pub require_admin_for_writes: bool,

    /// Minutes a login session may sit unused before it is dropped
    #[serde(default = "default_session_idle_minutes")]
    pub session_idle_minutes: u64,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Admin account created or promoted at startup (optional)
    #[serde(default)]
    pub bootstrap_admin: Option<AdminSeed>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Credentials of an account that must exist with admin rights
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    pub user_name: String,
    pub password_hash: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// Default session idle timeout in minutes
pub const DEFAULT_SESSION_IDLE_MINUTES: u64 = 120;

fn default_session_idle_minutes() -> u64 {
    DEFAULT_SESSION_IDLE_MINUTES
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
            database_path: None,
            host: default_host(),
            port: default_port(),
            require_admin_for_writes: false,
            session_idle_minutes: default_session_idle_minutes(),
            logging: LoggingConfig::default(),
            bootstrap_admin: None,
        }
    }
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse TOML config text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    /// Load the config file if one was resolved, falling back to defaults
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            info!("No config file found, using compiled defaults");
            return Self::default();
        };

        match Self::load(path) {
            Ok(config) => {
                info!("Loaded config file: {}", path.display());
                config
            }
            Err(e) => {
                warn!("Ignoring config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

/// Locate the TOML config file
///
/// Returns `None` when neither the argument, the environment variable nor the
/// platform config directory provides one.
pub fn resolve_config_path(cli_arg: Option<&Path>) -> Option<PathBuf> {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
        return Some(PathBuf::from(path));
    }

    // Priority 3: Platform config directory, only if the file is present
    dirs::config_dir()
        .map(|d| d.join("oms").join("config.toml"))
        .filter(|p| p.exists())
}

/// Resolve the database file location
pub fn resolve_database_path(cli_arg: Option<&Path>, config: &TomlConfig) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(DATABASE_ENV_VAR) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Some(path) = &config.database_path {
        return path.clone();
    }

    // Priority 4: OS-dependent compiled default
    default_data_folder().join(DATABASE_FILE_NAME)
}

/// Get OS-dependent default data folder
pub fn default_data_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("oms"))
        .unwrap_or_else(|| PathBuf::from("./oms_data"))
}
