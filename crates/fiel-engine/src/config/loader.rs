use super::schema::FielConfig;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Names a config file that replaces the default search.
pub const CONFIG_ENV: &str = "FIEL_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the file named by `FIEL_CONFIG`, else the first of
    /// `./fiel.yaml` and `~/.fiel/config.yaml` that exists, else defaults.
    pub async fn load_default() -> Result<FielConfig, ConfigError> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        Self::load_with_override(explicit.as_deref()).await
    }

    /// An `explicit` path must exist; it is never silently skipped.
    pub async fn load_with_override(explicit: Option<&Path>) -> Result<FielConfig, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path).await;
        }
        for path in Self::search_paths() {
            if path.exists() {
                return Self::load_from(&path).await;
            }
        }
        Ok(FielConfig::default())
    }

    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./fiel.yaml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".fiel").join("config.yaml"));
        }
        paths
    }

    pub async fn load_from(path: &Path) -> Result<FielConfig, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: FielConfig = serde_yaml::from_str(&content)?;
        validate(&config)?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}

/// Zero poll intervals would spin; an empty final name would rename onto the directory.
fn validate(config: &FielConfig) -> Result<(), ConfigError> {
    if config.timeouts.poll_interval_ms == 0 || config.timeouts.download_poll_ms == 0 {
        return Err(ConfigError::Invalid(
            "poll intervals must be greater than zero".to_string(),
        ));
    }
    if config.download.final_name.trim().is_empty() {
        return Err(ConfigError::Invalid(
            "download.final_name must not be empty".to_string(),
        ));
    }
    Ok(())
}
