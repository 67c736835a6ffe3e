use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::EizouError;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

/// Top-level application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub catalog: CatalogConfig,
    pub hero: HeroConfig,
    pub download: DownloadConfig,
    pub github: GitHubConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// URL (`http(s)://`) or filesystem path of the catalog JSON document.
    pub source: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeroConfig {
    pub interval_secs: u64,
    pub swipe_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadConfig {
    pub countdown_secs: u32,
}

/// Target of the admin publish. Every field except `message` and
/// `api_base` must be non-blank before a publish is attempted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubConfig {
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub path: String,
    pub token: String,
    pub message: String,
    pub api_base: String,
}

impl AppConfig {
    /// Load config: user file (if exists) or built-in defaults.
    pub fn load() -> Result<Self, EizouError> {
        let user_path = Self::config_path();
        if user_path.exists() {
            Self::load_from(&user_path)
        } else {
            Self::defaults()
        }
    }

    /// Load config from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, EizouError> {
        let user_str =
            std::fs::read_to_string(path).map_err(|e| EizouError::Config(e.to_string()))?;
        toml::from_str(&user_str).map_err(|e| EizouError::Config(e.to_string()))
    }

    fn defaults() -> Result<Self, EizouError> {
        toml::from_str(DEFAULT_CONFIG).map_err(|e| EizouError::Config(e.to_string()))
    }

    /// Save current config to the given path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), EizouError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| EizouError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save current config to the user config file.
    pub fn save(&self) -> Result<(), EizouError> {
        self.save_to(&Self::config_path())
    }

    /// Path to user config file (XDG on Linux, AppData on Windows).
    pub fn config_path() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Directory for rolling log files.
    pub fn log_dir() -> PathBuf {
        Self::project_dirs()
            .map(|d| d.data_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"))
    }

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("", "", "eizou")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("built-in default config is valid TOML")
    }
}
