//! Configuration management for the Transifex client
//!
//! Handles loading, validating, and persisting client configuration: API
//! location, request defaults and transport driver preference.

use crate::client::{Driver, Headers, HttpOptions};
use crate::error::{Result, TxError};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub mod defaults;

pub use defaults::*;

/// Main client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// API server URL
    #[serde(default = "defaults::default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::default_timeout")]
    pub timeout_secs: u64,

    /// User agent sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Transport drivers to try, in order
    #[serde(default = "defaults::default_drivers")]
    pub drivers: Vec<String>,

    /// Enable verbose logging
    #[serde(default)]
    pub verbose: bool,

    /// Headers sent with every request (e.g. `Authorization`)
    #[serde(default)]
    pub headers: Headers,
}

impl Config {
    /// Load configuration from the default location
    ///
    /// Tries in order:
    /// 1. `XDG_CONFIG_HOME/transifex/config.toml`
    /// 2. `~/.config/transifex/config.toml`
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| TxError::ConfigRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        toml::from_str(&contents).map_err(|e| TxError::InvalidConfig(e.to_string()))
    }

    /// Save configuration to the default location
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined or
    /// written.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Save configuration to a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its parent directory cannot be
    /// written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| TxError::ConfigWrite {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| TxError::SerializationError(e.to_string()))?;

        fs::write(path, contents).map_err(|e| TxError::ConfigWrite {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        // Default headers may carry credentials
        #[cfg(unix)]
        {
            use std::fs::Permissions;
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, Permissions::from_mode(0o600)).map_err(|e| {
                TxError::ConfigWrite {
                    path: path.to_path_buf(),
                    reason: format!("Failed to set permissions: {e}"),
                }
            })?;
        }

        Ok(())
    }

    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns an error if neither `XDG_CONFIG_HOME` nor a home directory is
    /// available.
    pub fn config_path() -> Result<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .ok()
            .filter(|path| !path.is_empty())
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")));

        config_home
            .ok_or_else(|| {
                TxError::Internal(
                    "Could not determine config directory: XDG_CONFIG_HOME not set and no home directory found"
                        .to_string(),
                )
            })
            .map(|path| path.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Merge another config into this one, with other taking precedence
    pub fn merge(&mut self, other: &Self) {
        if other.api_url != default_api_url() {
            self.api_url.clone_from(&other.api_url);
        }
        if other.timeout_secs != default_timeout() {
            self.timeout_secs = other.timeout_secs;
        }
        if other.user_agent.is_some() {
            self.user_agent.clone_from(&other.user_agent);
        }
        for (name, value) in &other.headers {
            let _ = self.headers.insert(name.clone(), value.clone());
        }
        if other.drivers != default_drivers() {
            self.drivers.clone_from(&other.drivers);
        }
        if other.verbose {
            self.verbose = true;
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`TxError::InvalidConfig`] describing the first problem found.
    pub fn validate(&self) -> Result<()> {
        if self.api_url.is_empty() {
            return Err(TxError::InvalidConfig("api_url cannot be empty".to_string()));
        }

        let _ = Url::parse(&self.api_url)
            .map_err(|e| TxError::InvalidConfig(format!("api_url is not a valid URL: {e}")))?;

        if self.timeout_secs == 0 {
            return Err(TxError::InvalidConfig(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.drivers.is_empty() {
            return Err(TxError::InvalidConfig("drivers cannot be empty".to_string()));
        }

        for name in &self.drivers {
            let _ = name
                .parse::<Driver>()
                .map_err(|_| TxError::InvalidConfig(format!("unknown driver '{name}'")))?;
        }

        Ok(())
    }

    /// Request timeout as a duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Options for the HTTP client built from this config
    #[must_use]
    pub fn http_options(&self) -> HttpOptions {
        HttpOptions {
            headers: self.headers.clone(),
            timeout: Some(self.timeout()),
            user_agent: self.user_agent.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout_secs: default_timeout(),
            user_agent: None,
            drivers: default_drivers(),
            verbose: false,
            headers: Headers::new(),
        }
    }
}
