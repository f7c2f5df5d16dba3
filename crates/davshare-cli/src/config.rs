//! Configuration file support for the davshare CLI.
//!
//! Configuration is read from `--config` / `DAVSHARE_CONFIG` when given,
//! otherwise from `config.toml` in the platform config directory
//! (`~/.config/davshare/` on Linux, `~/Library/Application Support/davshare/`
//! on macOS). A missing default file means an empty configuration.
//!
//! # Example configuration
//!
//! ```toml
//! root = "/srv/public"
//! bind = "0.0.0.0"
//! port = 8080
//! realm = "Public files"
//! autoindex = true
//!
//! [auth]
//! mode = "static"
//! username = "guest"
//! password = "hunter2"
//! ```
//!
//! Command-line flags override every value here.

use std::net::IpAddr;
use std::path::{Path, PathBuf};

use davshare_core::{AuthGate, StaticCredentials};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides the config directory (used by tests).
pub const CONFIG_DIR_ENV: &str = "DAVSHARE_CONFIG_DIR";

/// Configuration problems. All of them are usage errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory to share
    pub root: Option<PathBuf>,

    /// Address to listen on
    pub bind: Option<IpAddr>,

    /// Port to listen on
    pub port: Option<u16>,

    /// Realm named in authentication challenges
    pub realm: Option<String>,

    /// Serve an HTML index for collections
    pub autoindex: Option<bool>,

    /// Credential policy
    #[serde(default)]
    pub auth: AuthConfig,
}

/// How requests are authenticated.
#[derive(Debug, Default, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum AuthMode {
    /// Any credentials are accepted.
    #[default]
    AllowAll,
    /// Only the configured username and password are accepted.
    Static,
}

/// The `[auth]` table.
#[derive(Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    #[serde(default)]
    pub mode: AuthMode,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("mode", &self.mode)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl AuthConfig {
    /// Build the gate this policy describes.
    pub fn gate(&self, realm: &str) -> Result<AuthGate, ConfigError> {
        match self.mode {
            AuthMode::AllowAll => Ok(AuthGate::new(davshare_core::AllowAll, realm)),
            AuthMode::Static => {
                let username = self.username.as_deref().ok_or_else(|| {
                    ConfigError::Invalid("static authentication needs a username".to_string())
                })?;
                let password = self.password.as_deref().ok_or_else(|| {
                    ConfigError::Invalid(format!("no password given for user '{username}'"))
                })?;
                Ok(AuthGate::new(StaticCredentials::new(username, password), realm))
            }
        }
    }
}

impl Config {
    /// Load the configuration.
    ///
    /// An explicit path must exist; the default path is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match config_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Config::default()),
            },
        }
    }

    /// Parse a specific file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Get the path to the default configuration file.
///
/// Returns `None` when no home directory can be determined.
pub fn config_path() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Some(PathBuf::from(dir).join("config.toml"));
    }
    let base_dirs = directories::BaseDirs::new()?;
    Some(base_dirs.config_dir().join("davshare").join("config.toml"))
}
