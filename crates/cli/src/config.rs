use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::errors::CliError;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = ".pr-commenter.toml";

/// Default location of the analysis report
pub const DEFAULT_RESULTS_PATH: &str = "results.json";

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Configuration for the PR commenter CLI
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Upper bound in seconds for each request to GitHub
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Path of the analysis report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_path: Option<PathBuf>,

    /// Checkout directory that prefixes the file names in the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace: Option<String>,
}

impl AppConfig {
    /// Load configuration from the specified file
    pub fn load(path: &Path) -> Result<Self, CliError> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(CliError::ConfigError(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            CliError::ConfigError(format!("Failed to read configuration file: {}", e))
        })?;

        let config: AppConfig = toml::from_str(&content).map_err(|e| {
            CliError::ConfigError(format!("Failed to parse configuration file: {}", e))
        })?;
        config.request_timeout()?;

        Ok(config)
    }

    /// Loads the given file, or the default file if it exists, or falls back to defaults.
    ///
    /// An explicitly named file must exist.
    pub fn load_or_default(config_path: Option<&str>) -> Result<Self, CliError> {
        if config_path.is_some() {
            return Self::load(&get_config_path(config_path));
        }

        let path = get_config_path(None);
        if path.exists() {
            Self::load(&path)
        } else {
            debug!("No configuration file found. Using the defaults.");
            Ok(Self::default())
        }
    }

    /// Save configuration to the specified file
    pub fn save(&self, path: &Path) -> Result<(), CliError> {
        debug!("Saving configuration to {:?}", path);

        let content = toml::to_string_pretty(self).map_err(|e| {
            CliError::ConfigError(format!("Failed to serialize configuration: {}", e))
        })?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    CliError::ConfigError(format!("Failed to create directory: {}", e))
                })?;
            }
        }

        fs::write(path, content).map_err(|e| {
            CliError::ConfigError(format!("Failed to write configuration file: {}", e))
        })?;

        info!("Configuration saved to {:?}", path);
        Ok(())
    }

    pub fn request_timeout(&self) -> Result<Duration, CliError> {
        if self.request_timeout_secs == 0 {
            return Err(CliError::ConfigError(
                "request_timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(Duration::from_secs(self.request_timeout_secs))
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout_secs(),
            results_path: None,
            workspace: None,
        }
    }
}

/// Get the path to the configuration file
pub fn get_config_path(config_path: Option<&str>) -> PathBuf {
    if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        current_dir.join(DEFAULT_CONFIG_FILENAME)
    }
}

/// Splits a repository slug of the form `owner/repo`.
pub fn split_repository(repository: &str) -> Result<(String, String), CliError> {
    let parts: Vec<&str> = repository.split('/').collect();
    match parts.as_slice() {
        [owner, repo] if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(CliError::InvalidArguments(format!(
            "Expected the repository as 'owner/repo', got '{}'",
            repository
        ))),
    }
}

fn default_request_timeout_secs() -> u64 {
    30
}
