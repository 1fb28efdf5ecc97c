//! JSON Configuration Management
//!
//! Handles reading and writing the application configuration file, and
//! layering environment overrides on top of it.

use std::fs;
use std::path::{Path, PathBuf};

use interview_coach_llm::parse_proxy_url;
use tracing::{debug, info};

use crate::models::settings::{AppConfig, SettingsUpdate};
use crate::utils::error::{AppError, AppResult};
use crate::utils::paths::{config_path, ensure_dir};

/// Environment variable holding the API key
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable holding the base URL
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
/// Environment variable holding the model name
pub const ENV_MODEL: &str = "INTERVIEW_COACH_MODEL";
/// Environment variable holding a proxy URL (`scheme://[user[:pass]@]host:port`)
pub const ENV_PROXY: &str = "INTERVIEW_COACH_PROXY";

/// Configuration service for managing app settings
#[derive(Debug)]
pub struct ConfigService {
    config_path: PathBuf,
    config: AppConfig,
}

impl ConfigService {
    /// Create a config service at the default location (~/.interview-coach/config.json)
    pub fn new() -> AppResult<Self> {
        Self::open(config_path()?)
    }

    /// Open the config file at `path`, creating it with defaults if missing
    pub fn open(path: impl Into<PathBuf>) -> AppResult<Self> {
        let config_path = path.into();
        if let Some(parent) = config_path.parent() {
            ensure_dir(parent)?;
        }

        let config = if config_path.exists() {
            Self::load_from_file(&config_path)?
        } else {
            let default_config = AppConfig::default();
            Self::save_to_file(&config_path, &default_config)?;
            info!(path = %config_path.display(), "created default config");
            default_config
        };

        Ok(Self {
            config_path,
            config,
        })
    }

    /// Load configuration from a file
    fn load_from_file(path: &Path) -> AppResult<AppConfig> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        config.validate().map_err(AppError::validation)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save configuration to a file with pretty formatting
    fn save_to_file(path: &Path, config: &AppConfig) -> AppResult<()> {
        config.validate().map_err(AppError::validation)?;
        let content = serde_json::to_string_pretty(config)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Get the configuration as stored on disk
    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }

    /// Get the configuration with environment overrides applied.
    ///
    /// Overrides are never written back to disk.
    pub fn effective_config(&self) -> AppResult<AppConfig> {
        let config = apply_env_overrides(self.config.clone(), |key| std::env::var(key).ok())?;
        config.validate().map_err(AppError::validation)?;
        Ok(config)
    }

    /// Update the configuration with a partial update
    pub fn update_config(&mut self, update: SettingsUpdate) -> AppResult<AppConfig> {
        let mut next = self.config.clone();
        next.apply_update(update);
        Self::save_to_file(&self.config_path, &next)?;
        self.config = next;
        Ok(self.config.clone())
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

/// Layer environment values over a loaded config. Blank values are ignored;
/// a proxy URL that does not parse is a config error.
pub fn apply_env_overrides<F>(mut config: AppConfig, lookup: F) -> AppResult<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(api_key) = get(ENV_API_KEY) {
        config.provider.api_key = Some(api_key);
    }
    if let Some(base_url) = get(ENV_BASE_URL) {
        config.provider.base_url = Some(base_url);
    }
    if let Some(model) = get(ENV_MODEL) {
        config.provider.model = model;
    }
    if let Some(raw) = get(ENV_PROXY) {
        let proxy = parse_proxy_url(&raw).map_err(|e| AppError::config(e.to_string()))?;
        proxy.validate()?;
        config.provider.proxy = Some(proxy);
    }
    Ok(config)
}
