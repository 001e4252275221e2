mod api;
mod defaults;
mod validation;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

pub use api::{ApiConfig, LoggingConfig, StorageConfig};
pub use validation::{expand_env_var_in_string, expand_with};

use crate::storage::FilesystemStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthModeKind {
    Cookie,
    Bearer,
}

impl AuthModeKind {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "cookie" | "session" => Ok(AuthModeKind::Cookie),
            "bearer" | "token" | "jwt" => Ok(AuthModeKind::Bearer),
            other => bail!("Unknown auth mode '{}' (expected cookie or bearer)", other),
        }
    }
}

/// Values given on the command line. They beat every other source.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub auth_mode: Option<String>,
    pub storage_dir: Option<PathBuf>,
    pub verbose: bool,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub auth_mode: AuthModeKind,
    pub storage_dir: PathBuf,
    pub timeout_secs: u64,
    pub log_filter: String,
    pub verbose: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FileConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    pub fn from_env_and_args(overrides: &ConfigOverrides) -> Result<Self> {
        let file_config = FileConfig::load()?;
        Self::resolve(overrides, &file_config, |name| env::var(name).ok())
    }

    /// Merge the sources: CLI > environment > config file > defaults.
    pub fn resolve(
        overrides: &ConfigOverrides,
        file: &FileConfig,
        env_var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let api_url = overrides
            .api_url
            .clone()
            .or_else(|| env_var("TEMPSHOP_API_URL"))
            .or_else(|| file.api.base_url.as_deref().map(|u| expand_with(u, &env_var)))
            .unwrap_or_else(defaults::default_base_url)
            .trim_end_matches('/')
            .to_string();

        let auth_mode = match overrides
            .auth_mode
            .clone()
            .or_else(|| env_var("TEMPSHOP_AUTH_MODE"))
            .or_else(|| file.api.auth_mode.clone())
        {
            Some(mode) => AuthModeKind::parse(&mode)?,
            None => AuthModeKind::Bearer,
        };

        let storage_dir = overrides
            .storage_dir
            .clone()
            .or_else(|| env_var("TEMPSHOP_STORAGE_DIR").map(PathBuf::from))
            .or_else(|| {
                file.storage
                    .dir
                    .as_deref()
                    .map(|d| PathBuf::from(expand_with(d, &env_var)))
            })
            .unwrap_or_else(FilesystemStore::default_dir);

        let timeout_secs = match env_var("TEMPSHOP_TIMEOUT") {
            Some(raw) => raw
                .parse::<u64>()
                .with_context(|| format!("TEMPSHOP_TIMEOUT is not a number: {}", raw))?,
            None => file
                .api
                .timeout_secs
                .unwrap_or_else(defaults::default_timeout_secs),
        };

        let log_filter = if overrides.verbose {
            "debug".to_string()
        } else {
            env_var("TEMPSHOP_LOG")
                .or_else(|| file.logging.filter.clone())
                .unwrap_or_else(defaults::default_log_filter)
        };

        Ok(Config {
            api_url,
            auth_mode,
            storage_dir,
            timeout_secs,
            log_filter,
            verbose: overrides.verbose,
        })
    }
}

impl FileConfig {
    pub fn load() -> Result<Self> {
        for path in Self::get_config_paths() {
            if path.exists() {
                return Self::load_from(&path);
            }
        }

        // No config file found, return default
        Ok(FileConfig::default())
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str());
        if extension == Some("json") {
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config file: {}", path.display()))
        } else {
            serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config file: {}", path.display()))
        }
    }

    pub fn get_config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Current directory (local override)
        paths.push(PathBuf::from(".tempshop.yaml"));
        paths.push(PathBuf::from(".tempshop.yml"));
        paths.push(PathBuf::from(".tempshop.json"));

        // 2. User's config directory
        if let Some(home_dir) = dirs::home_dir() {
            let config_dir = home_dir.join(".config").join("tempshop");
            paths.push(config_dir.join("tempshop.yaml"));
            paths.push(config_dir.join("tempshop.yml"));
            paths.push(config_dir.join("tempshop.json"));
        }

        paths
    }
}
