//! Application configuration module
//!
//! This module centralizes all persisted client state using `confy` for
//! serialization and OS-specific config directory management: the backend
//! URL, the theme preference and the login/captcha session.

use crate::constant::{API_URL_ENV, APP_NAME, APP_ORGANIZATION, APP_QUALIFIER, DEFAULT_API_URL};
use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Confy(#[from] confy::ConfyError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct Config {
    pub settings: Settings,
    path: Option<PathBuf>,
}

impl Config {
    /// Load configuration from disk, creating default if it doesn't exist
    pub fn load() -> Result<Self, ConfigError> {
        let settings: Settings = confy::load(APP_NAME, None)?;
        info!("Load config from {:?}", Self::config_path()?);
        Ok(Self {
            settings,
            path: None,
        })
    }

    /// Load configuration from an explicit file instead of the OS config dir
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let settings: Settings = confy::load_path(path)?;
        info!("Load config from {:?}", path);
        Ok(Self {
            settings,
            path: Some(path.to_path_buf()),
        })
    }

    /// Save current configuration to disk
    pub fn save(&self) -> Result<(), ConfigError> {
        match &self.path {
            Some(path) => {
                confy::store_path(path, &self.settings)?;
                info!("Save config to {:?}", path);
            }
            None => {
                confy::store(APP_NAME, None, &self.settings)?;
                info!("Save config to {:?}", Self::config_path()?);
            }
        }
        Ok(())
    }

    /// Save and log instead of failing; the UI keeps working with in-memory state
    pub fn persist(&self) {
        if let Err(e) = self.save() {
            tracing::error!("Failed to save config: {}", e);
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        Ok(confy::get_configuration_file_path(APP_NAME, None)?)
    }

    /// Backend base URL, the environment variable wins over the stored value
    pub fn api_url(&self) -> String {
        let url = std::env::var(API_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| self.settings.api_url.clone());
        url.trim_end_matches('/').to_string()
    }

    /// Directory offered first when saving images and backups.
    /// Falls back to the app data directory, then to the working directory.
    pub fn download_dir(&self) -> PathBuf {
        if let Some(user_dirs) = UserDirs::new()
            && let Some(dir) = user_dirs.download_dir()
        {
            return dir.to_path_buf();
        }
        if let Some(proj_dirs) = ProjectDirs::from(APP_QUALIFIER, APP_ORGANIZATION, APP_NAME) {
            proj_dirs.data_dir().to_path_buf()
        } else {
            PathBuf::from(".")
        }
    }

    pub fn session(&self) -> Session {
        Session {
            auth_token: self.settings.auth_token.clone(),
            captcha_token: self.settings.captcha_token.clone(),
        }
    }

    pub fn set_auth_token(&mut self, token: Option<String>) {
        self.settings.auth_token = token.filter(|t| !t.is_empty());
        self.persist();
    }

    pub fn set_captcha_token(&mut self, token: Option<String>) {
        self.settings.captcha_token = token.filter(|t| !t.is_empty());
        self.persist();
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.settings.theme = Some(theme);
        self.persist();
    }

    /// Blank input restores the default backend
    pub fn set_api_url(&mut self, url: &str) {
        let url = url.trim().trim_end_matches('/');
        self.settings.api_url = if url.is_empty() {
            default_api_url()
        } else {
            url.to_string()
        };
        self.persist();
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!("Using default config: {}", e);
            Self {
                settings: Settings::default(),
                path: None,
            }
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Backend base URL without trailing slash
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Explicit theme; `None` follows the system preference
    #[serde(default)]
    pub theme: Option<Theme>,

    /// Bearer token handed out by `/login`
    #[serde(default)]
    pub auth_token: Option<String>,

    /// Token proving a solved captcha, sent as `X-Captcha`
    #[serde(default)]
    pub captcha_token: Option<String>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            theme: None,
            auth_token: None,
            captcha_token: None,
        }
    }
}

/// Credentials attached to outgoing requests.
///
/// A snapshot of the stored tokens; background requests get their own copy so
/// the UI thread stays the only writer of [`Settings`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub auth_token: Option<String>,
    pub captcha_token: Option<String>,
}

impl Session {
    pub fn is_logged_in(&self) -> bool {
        self.auth_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use uuid::Uuid;

    fn temp_config_path() -> (PathBuf, PathBuf) {
        let test_dir = std::env::temp_dir().join(format!("test_config_{}", Uuid::new_v4()));
        fs::create_dir_all(&test_dir).unwrap();
        (test_dir.join("settings.toml"), test_dir)
    }

    #[test]
    fn test_defaults_when_file_missing() {
        let (path, test_dir) = temp_config_path();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.settings.api_url, DEFAULT_API_URL);
        assert_eq!(config.settings.theme, None);
        assert!(!config.session().is_logged_in());

        let _ = fs::remove_dir_all(test_dir);
    }

    #[test]
    fn test_session_round_trip() {
        let (path, test_dir) = temp_config_path();

        let mut config = Config::load_from(&path).unwrap();
        config.set_auth_token(Some("secret".to_string()));
        config.set_captcha_token(Some("solved".to_string()));
        config.set_theme(Theme::Dark);

        let reloaded = Config::load_from(&path).unwrap();
        let session = reloaded.session();
        assert!(session.is_logged_in());
        assert_eq!(session.auth_token.as_deref(), Some("secret"));
        assert_eq!(session.captcha_token.as_deref(), Some("solved"));
        assert_eq!(reloaded.settings.theme, Some(Theme::Dark));

        let _ = fs::remove_dir_all(test_dir);
    }

    #[test]
    fn test_clearing_tokens() {
        let (path, test_dir) = temp_config_path();

        let mut config = Config::load_from(&path).unwrap();
        config.set_auth_token(Some("secret".to_string()));
        config.set_auth_token(None);
        config.set_captcha_token(Some(String::new()));

        let reloaded = Config::load_from(&path).unwrap();
        assert_eq!(reloaded.session(), Session::default());

        let _ = fs::remove_dir_all(test_dir);
    }

    #[test]
    fn test_api_url_setter() {
        let (path, test_dir) = temp_config_path();

        let mut config = Config::load_from(&path).unwrap();
        config.set_api_url(" http://localhost:8000/api/ ");
        assert_eq!(config.settings.api_url, "http://localhost:8000/api");
        config.set_api_url("");
        assert_eq!(config.settings.api_url, DEFAULT_API_URL);

        let _ = fs::remove_dir_all(test_dir);
    }

    #[test]
    fn test_theme_toggle() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled(), Theme::Light);
    }
}
