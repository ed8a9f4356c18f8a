//! Service configuration
//!
//! Every setting resolves in the same priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)
//!
//! A missing config file is not an error: the service logs a warning and starts
//! with defaults.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{Error, Result};

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// File name of the SQLite store inside the root folder
pub const DATABASE_FILE: &str = "stellark.db";

pub const ENV_ROOT_FOLDER: &str = "STELLARK_ROOT_FOLDER";
pub const ENV_HOST: &str = "STELLARK_HOST";
pub const ENV_PORT: &str = "STELLARK_PORT";
pub const ENV_LOG_LEVEL: &str = "STELLARK_LOG_LEVEL";
pub const ENV_GROQ_API_KEY: &str = "GROQ_API_KEY";
pub const ENV_GROQ_MODEL: &str = "GROQ_MODEL";

/// On-disk TOML configuration; every key is optional
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub groq_api_key: Option<String>,
    pub groq_model: Option<String>,
    pub groq_base_url: Option<String>,
}

impl TomlConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_file: Option<PathBuf>,
    pub root_folder: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
}

/// Settings for the language-model license interpreter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Interpreter is disabled when no key is configured
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_GROQ_MODEL.to_string(),
            base_url: DEFAULT_GROQ_BASE_URL.to_string(),
        }
    }
}

/// Fully resolved service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub root_folder: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub interpreter: InterpreterConfig,
}

impl ServiceConfig {
    /// Resolve configuration from CLI overrides, environment, and TOML file
    pub fn resolve(overrides: &ConfigOverrides) -> Result<Self> {
        let toml_config = match locate_config_file(overrides.config_file.as_deref())? {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                TomlConfig::load(&path)?
            }
            None => {
                warn!("No config file found, using environment and compiled defaults");
                TomlConfig::default()
            }
        };

        Self::from_sources(overrides, &toml_config)
    }

    /// Merge already-loaded sources (no file system access)
    pub fn from_sources(overrides: &ConfigOverrides, toml_config: &TomlConfig) -> Result<Self> {
        let root_folder = overrides
            .root_folder
            .clone()
            .or_else(|| env_var(ENV_ROOT_FOLDER).map(PathBuf::from))
            .or_else(|| toml_config.root_folder.clone())
            .unwrap_or_else(default_root_folder);

        let host = overrides
            .host
            .clone()
            .or_else(|| env_var(ENV_HOST))
            .or_else(|| toml_config.host.clone())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let env_port = env_var(ENV_PORT)
            .map(|raw| {
                raw.parse::<u16>()
                    .map_err(|_| Error::Config(format!("{} is not a valid port: {}", ENV_PORT, raw)))
            })
            .transpose()?;
        let port = overrides
            .port
            .or(env_port)
            .or(toml_config.port)
            .unwrap_or(DEFAULT_PORT);

        let log_level = overrides
            .log_level
            .clone()
            .or_else(|| env_var(ENV_LOG_LEVEL))
            .or_else(|| toml_config.log_level.clone())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let interpreter = InterpreterConfig {
            api_key: env_var(ENV_GROQ_API_KEY)
                .or_else(|| toml_config.groq_api_key.clone())
                .filter(|key| !key.trim().is_empty()),
            model: env_var(ENV_GROQ_MODEL)
                .or_else(|| toml_config.groq_model.clone())
                .unwrap_or_else(|| DEFAULT_GROQ_MODEL.to_string()),
            base_url: toml_config
                .groq_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_GROQ_BASE_URL.to_string()),
        };

        Ok(Self {
            root_folder,
            host,
            port,
            log_level,
            interpreter,
        })
    }

    /// Address the HTTP listener binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }

    /// Create the root folder if it does not exist yet
    pub fn ensure_root_folder(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }
}

/// Find the config file to load
///
/// An explicitly requested file must exist. Otherwise the per-user file is
/// preferred over the system-wide one; neither being present yields `None`.
pub fn locate_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if path.exists() {
            return Ok(Some(path.to_path_buf()));
        }
        return Err(Error::Config(format!(
            "Config file not found: {}",
            path.display()
        )));
    }

    let user_config = dirs::config_dir().map(|d| d.join("stellark").join("config.toml"));
    let system_config = PathBuf::from("/etc/stellark/config.toml");

    Ok(user_config
        .into_iter()
        .chain(std::iter::once(system_config))
        .find(|path| path.exists()))
}

/// OS-dependent default data folder
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("stellark"))
        .unwrap_or_else(|| PathBuf::from("./stellark_data"))
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
