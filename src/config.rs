//! Configuration management for VitalPath
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, VitalPathError};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for VitalPath
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Remote API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Session token persistence settings
    #[serde(default)]
    pub session: SessionConfig,
    /// Discovery questionnaire settings
    #[serde(default)]
    pub discovery: DiscoveryConfig,
}

/// Remote API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the VitalPath backend (scheme, host, optional path prefix)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

/// Where the access and refresh tokens are kept between runs
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum TokenStoreKind {
    /// JSON file in the data directory
    #[default]
    File,
    /// Operating system keyring
    Keyring,
    /// Process memory only; tokens are lost on exit
    Memory,
}

impl std::str::FromStr for TokenStoreKind {
    type Err = VitalPathError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "file" => Ok(Self::File),
            "keyring" => Ok(Self::Keyring),
            "memory" => Ok(Self::Memory),
            other => Err(VitalPathError::Config(format!(
                "Invalid session store: {}. Must be one of: file, keyring, memory",
                other
            ))),
        }
    }
}

/// Session persistence configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Token store backend
    #[serde(default)]
    pub store: TokenStoreKind,

    /// Directory for the session file and discovery draft.
    ///
    /// Defaults to the platform data directory when unset.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
}

/// Discovery questionnaire configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoveryConfig {
    /// Save the in-progress form after every section change
    #[serde(default = "default_autosave")]
    pub autosave_draft: bool,
}

fn default_autosave() -> bool {
    true
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            autosave_draft: default_autosave(),
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to configuration file
    /// * `cli` - CLI arguments for overrides
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| VitalPathError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| VitalPathError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("VITALPATH_API_URL") {
            tracing::debug!(base_url = %base_url, "Env override: VITALPATH_API_URL");
            self.api.base_url = base_url;
        }

        if let Ok(timeout) = std::env::var("VITALPATH_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid VITALPATH_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(store) = std::env::var("VITALPATH_SESSION_STORE") {
            match store.parse::<TokenStoreKind>() {
                Ok(kind) => self.session.store = kind,
                Err(e) => tracing::warn!("{}, keeping {:?}", e, self.session.store),
            }
        }

        if let Ok(dir) = std::env::var("VITALPATH_DATA_DIR") {
            tracing::debug!(data_dir = %dir, "Env override: VITALPATH_DATA_DIR");
            self.session.data_dir = Some(PathBuf::from(dir));
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(api_url) = &cli.api_url {
            self.api.base_url = api_url.clone();
        }
        if cli.verbose {
            tracing::debug!("Verbose mode enabled");
        }
    }

    /// Directory holding the session file and the discovery draft.
    ///
    /// # Errors
    ///
    /// Returns `VitalPathError::Config` when no override is configured and
    /// the platform data directory cannot be determined.
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.session.data_dir {
            return Ok(dir.clone());
        }
        let proj_dirs = ProjectDirs::from("org", "vitalpath", "vitalpath").ok_or_else(|| {
            VitalPathError::Config("Could not determine data directory".to_string())
        })?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns error if any validation check fails
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| {
            VitalPathError::Config(format!("Invalid api.base_url {}: {}", self.api.base_url, e))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(VitalPathError::Config(format!(
                "api.base_url must use http or https, got {}",
                url.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(VitalPathError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.api.timeout_seconds > 300 {
            return Err(VitalPathError::Config(
                "api.timeout_seconds must be less than or equal to 300".to_string(),
            )
            .into());
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiConfig::default(),
            session: SessionConfig::default(),
            discovery: DiscoveryConfig::default(),
        }
    }
}
