//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the root configuration
//! from the configuration file (~/.config/lexfill/config.toml) and applies
//! environment overrides.

use crate::paths::LexfillPaths;
use lexfill_core::config::LexfillConfig;
use lexfill_core::error::{FillError, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding `phraser.api_key`.
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding `phraser.model`.
pub const ENV_MODEL_NAME: &str = "OPENAI_MODEL_NAME";

/// Loads `LexfillConfig` from TOML.
///
/// A missing file is not an error: the defaults are used instead. A file
/// that exists but does not parse is reported as `FillError::Config`.
#[derive(Debug, Clone, Default)]
pub struct ConfigService {
    /// Explicit config path; `None` means the platform default.
    path: Option<PathBuf>,
}

impl ConfigService {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// The file this service reads, if one can be determined.
    pub fn config_path(&self) -> Option<PathBuf> {
        match &self.path {
            Some(path) => Some(path.clone()),
            None => LexfillPaths::config_file().ok(),
        }
    }

    /// Loads the configuration and applies `OPENAI_*` environment overrides.
    ///
    /// # Errors
    ///
    /// - `Config` if the file exists but is not valid TOML for `LexfillConfig`
    /// - `Io` if the file exists but cannot be read
    pub async fn load(&self) -> Result<LexfillConfig> {
        let config = match self.config_path() {
            Some(path) => Self::load_file(&path).await?,
            None => {
                tracing::warn!("No config directory available, using defaults");
                LexfillConfig::default()
            }
        };
        Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
    }

    async fn load_file(path: &Path) -> Result<LexfillConfig> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "Config file not found, using defaults");
                return Ok(LexfillConfig::default());
            }
            Err(err) => return Err(err.into()),
        };

        let config: LexfillConfig = toml::from_str(&content)
            .map_err(|e| FillError::config(format!("Failed to parse {}: {}", path.display(), e)))?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }
}

/// Applies environment overrides looked up through `lookup`.
///
/// Blank values are ignored.
pub fn apply_env_overrides<F>(mut config: LexfillConfig, lookup: F) -> LexfillConfig
where
    F: Fn(&str) -> Option<String>,
{
    let non_blank = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(api_key) = non_blank(ENV_API_KEY) {
        config.phraser.api_key = Some(api_key);
    }
    if let Some(model) = non_blank(ENV_MODEL_NAME) {
        config.phraser.model = model;
    }
    config
}
