use std::{fs, path::PathBuf};

use common::prelude::SeedConfig;
use serde::{Deserialize, Serialize};

pub const APP_NAME: &str = "filetree";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";
pub const CONTENT_DIR_NAME: &str = "content";
pub const LOG_DIR_NAME: &str = "logs";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the API server
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Default tracing level, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Shortest query the search endpoint will run
    #[serde(default = "default_search_min_len")]
    pub search_min_len: usize,
    /// What gets seeded into an empty top level
    #[serde(default)]
    pub seed: SeedConfig,
    #[serde(default)]
    pub content_store: ContentStoreConfig,
}

fn default_api_port() -> u16 {
    5001
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_search_min_len() -> usize {
    2
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            log_level: default_log_level(),
            search_min_len: default_search_min_len(),
            seed: SeedConfig::default(),
            content_store: ContentStoreConfig::default(),
        }
    }
}

/// Where uploaded file bodies are kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentStoreConfig {
    /// Local directory (defaults to <dir>/content/)
    Filesystem { path: Option<PathBuf> },

    /// Process memory, lost on restart
    Memory,
}

impl Default for ContentStoreConfig {
    fn default() -> Self {
        Self::Filesystem { path: None }
    }
}

#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the state directory (~/.filetree)
    pub dir: PathBuf,
    pub db_path: PathBuf,
    /// Default location of the filesystem content store
    pub content_path: PathBuf,
    pub log_path: PathBuf,
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the state directory path (custom or default ~/.filetree)
    pub fn dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let dir = Self::dir(custom_path)?;

        if dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&dir)?;

        let content_path = dir.join(CONTENT_DIR_NAME);
        fs::create_dir_all(&content_path)?;
        let log_path = dir.join(LOG_DIR_NAME);
        fs::create_dir_all(&log_path)?;

        let config = config.unwrap_or_default();
        let config_path = dir.join(CONFIG_FILE_NAME);
        fs::write(&config_path, toml::to_string_pretty(&config)?)?;

        // Touch the database, the daemon migrates it on first start
        let db_path = dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            dir,
            db_path,
            content_path,
            log_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the state directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let dir = Self::dir(custom_path)?;

        if !dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = dir.join(DB_FILE_NAME);
        let content_path = dir.join(CONTENT_DIR_NAME);
        let log_path = dir.join(LOG_DIR_NAME);
        let config_path = dir.join(CONFIG_FILE_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config: AppConfig = toml::from_str(&fs::read_to_string(&config_path)?)?;

        Ok(Self {
            dir,
            db_path,
            content_path,
            log_path,
            config_path,
            config,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("filetree directory not initialized. Run 'filetree init' first")]
    NotInitialized,

    #[error("filetree directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("state");

        let config = AppConfig {
            api_port: 6001,
            seed: SeedConfig { sample_file: true },
            ..AppConfig::default()
        };
        let created = AppState::init(Some(dir.clone()), Some(config.clone())).unwrap();
        assert!(created.db_path.exists());
        assert!(created.content_path.is_dir());

        let loaded = AppState::load(Some(dir.clone())).unwrap();
        assert_eq!(loaded.config, config);

        let again = AppState::init(Some(dir), None);
        assert!(matches!(again, Err(StateError::AlreadyInitialized)));
    }

    #[test]
    fn test_load_uninitialized() {
        let tmp = tempfile::tempdir().unwrap();
        let result = AppState::load(Some(tmp.path().join("missing")));
        assert!(matches!(result, Err(StateError::NotInitialized)));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: AppConfig = toml::from_str("api_port = 7000\n").unwrap();
        assert_eq!(config.api_port, 7000);
        assert_eq!(config.search_min_len, 2);
        assert_eq!(config.content_store, ContentStoreConfig::Filesystem { path: None });
        assert_eq!(ContentStoreConfig::default(), config.content_store);

        let config: AppConfig = toml::from_str("[content_store]\ntype = \"memory\"\n").unwrap();
        assert_eq!(config.content_store, ContentStoreConfig::Memory);
    }
}
