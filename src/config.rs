//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable that overrides `api.base_url`.
pub const API_BASE_URL_ENV: &str = "API_BASE_URL";

/// Longest allowed notification lifetime.
pub const MAX_TOAST_SECONDS: u64 = 3600;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

/// REST backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
}

/// External image upload service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Multipart POST target.
    pub endpoint: String,
    /// Prefix joined onto returned keys to build a displayable URL.
    pub public_base_url: String,
}

/// UI preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// How long notifications stay on screen.
    #[serde(default = "default_toast_seconds")]
    pub toast_seconds: u64,
}

fn default_toast_seconds() -> u64 {
    4
}

impl AppConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Parse and validate config file contents.
    pub fn from_toml(content: &str) -> ConfigLoadResult {
        match toml::from_str::<AppConfig>(content) {
            Ok(config) => match config.validate() {
                Ok(()) => ConfigLoadResult::Loaded(config),
                Err(e) => ConfigLoadResult::Invalid(e),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
        }
    }

    /// Apply an explicit base URL override, if any.
    ///
    /// Empty strings are ignored so an unset-but-exported variable does not
    /// wipe the configured value.
    pub fn with_base_url_override(mut self, url: Option<String>) -> Self {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            self.api.base_url = url;
        }
        self
    }

    /// Read the `API_BASE_URL` override from the environment.
    pub fn env_base_url() -> Option<String> {
        std::env::var(API_BASE_URL_ENV).ok()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::Validation("API base URL cannot be empty".to_string()));
        }
        if !is_http_url(&self.api.base_url) {
            return Err(ConfigError::Validation(
                "API base URL must start with http:// or https://".to_string(),
            ));
        }
        if !self.upload.endpoint.is_empty() && !is_http_url(&self.upload.endpoint) {
            return Err(ConfigError::Validation(
                "Upload endpoint must start with http:// or https://".to_string(),
            ));
        }
        if !self.upload.public_base_url.is_empty() && !is_http_url(&self.upload.public_base_url) {
            return Err(ConfigError::Validation(
                "Upload public URL must start with http:// or https://".to_string(),
            ));
        }
        if self.ui.toast_seconds < 1 {
            return Err(ConfigError::Validation(
                "Notification duration must be at least 1 second".to_string(),
            ));
        }
        if self.ui.toast_seconds > MAX_TOAST_SECONDS {
            return Err(ConfigError::Validation(format!(
                "Notification duration must be at most {MAX_TOAST_SECONDS} seconds"
            )));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:3000/upload".to_string(),
            public_base_url: "http://localhost:3000/uploads".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            toast_seconds: default_toast_seconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_file_fills_defaults() {
        let result = AppConfig::from_toml("[api]\nbase_url = \"https://api.example.com\"\n");
        match result {
            ConfigLoadResult::Loaded(config) => {
                assert_eq!(config.api.base_url, "https://api.example.com");
                assert_eq!(config.ui.toast_seconds, 4);
                assert!(!config.upload.endpoint.is_empty());
            }
            other => panic!("expected loaded config, got {other:?}"),
        }
    }

    #[test]
    fn test_unparsable_file_is_invalid() {
        assert!(matches!(
            AppConfig::from_toml("api = ["),
            ConfigLoadResult::Invalid(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_empty_base_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_invalid_scheme() {
        let mut config = AppConfig::default();
        config.api.base_url = "ftp://invalid".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.upload.endpoint = "invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_toast_seconds() {
        let mut config = AppConfig::default();
        config.ui.toast_seconds = 0;
        assert!(config.validate().is_err());

        config.ui.toast_seconds = MAX_TOAST_SECONDS;
        assert!(config.validate().is_ok());

        config.ui.toast_seconds = 10_000_000_000_000_000;
        assert!(config.validate().is_err());

        config.ui.toast_seconds = u64::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_override() {
        let config = AppConfig::default().with_base_url_override(Some("https://prod.example.com".to_string()));
        assert_eq!(config.api.base_url, "https://prod.example.com");

        let config = AppConfig::default().with_base_url_override(Some("   ".to_string()));
        assert_eq!(config.api.base_url, "http://localhost:3000");

        let config = AppConfig::default().with_base_url_override(None);
        assert_eq!(config.api.base_url, "http://localhost:3000");
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("team-admin-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let mut config = AppConfig::default();
        config.api.base_url = "https://saved.example.com".to_string();
        config.save(&path).unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => assert_eq!(loaded.api.base_url, "https://saved.example.com"),
            other => panic!("expected loaded config, got {other:?}"),
        }

        std::fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Missing));
    }
}
