//! Configuration management for the user folder server
//!
//! Values are layered: built-in defaults, then `config.toml`, then
//! `USER_FOLDERS_*` environment variables. Everything here requires a
//! restart to take effect.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Candidate config files, checked in order
const CONFIG_PATHS: [&str; 2] = [
    "user-folder-server/config.toml", // Docker production: /app/user-folder-server/config.toml
    "config.toml",                    // Local development: ./config.toml
];

const ENV_PREFIX: &str = "USER_FOLDERS";

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 5000;
const DEFAULT_STORAGE_ROOT: &str = "user-assets-storage";

/// Upper bound for display names. The `-<uuid>` suffix adds 37 bytes and
/// most filesystems cap a single path component at 255 bytes.
pub const MAX_NAME_LENGTH_LIMIT: usize = 200;

/// How naming collisions are detected on create and rename
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NamePolicy {
    /// Create compares live display names, rename compares folder prefixes on disk
    #[default]
    Legacy,
    /// Both operations compare live display names and folder prefixes on disk
    Strict,
}

/// Complete server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// IP address to bind the HTTP listener
    pub bind_address: String,

    /// HTTP port, 0 picks an ephemeral port
    pub port: u16,

    /// Directory that holds every user folder
    pub storage_root: String,

    pub name_policy: NamePolicy,

    /// Maximum display name length in bytes
    pub max_name_length: usize,
}

impl ServerConfig {
    /// Load configuration from the first config.toml found, with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let config_file = CONFIG_PATHS
            .iter()
            .map(|path| Path::new(*path))
            .find(|path| path.is_file());

        Self::load_from(config_file)
    }

    /// Load configuration from an explicit file (or defaults only), with environment overrides
    pub fn load_from(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .set_default("bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("port", i64::from(DEFAULT_PORT))?
            .set_default("storage_root", DEFAULT_STORAGE_ROOT)?
            .set_default("name_policy", "legacy")?
            .set_default("max_name_length", MAX_NAME_LENGTH_LIMIT as i64)?;

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path));
        }

        let settings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if self.storage_root.trim().is_empty() {
            return Err(ConfigError::Message("storage_root cannot be empty".into()));
        }

        if self.max_name_length == 0 || self.max_name_length > MAX_NAME_LENGTH_LIMIT {
            return Err(ConfigError::Message(format!(
                "max_name_length must be between 1 and {MAX_NAME_LENGTH_LIMIT}"
            )));
        }

        Ok(())
    }

    /// Bind address and port as a socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }

    pub fn storage_root_path(&self) -> PathBuf {
        PathBuf::from(&self.storage_root)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
            port: DEFAULT_PORT,
            storage_root: DEFAULT_STORAGE_ROOT.to_string(),
            name_policy: NamePolicy::default(),
            max_name_length: MAX_NAME_LENGTH_LIMIT,
        }
    }
}
