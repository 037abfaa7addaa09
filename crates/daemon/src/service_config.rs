use std::path::PathBuf;

use common::prelude::SeedConfig;

use crate::state::ContentStoreConfig;

#[derive(Debug, Clone)]
pub struct Config {
    /// Path to the state directory, used as the default content location
    pub dir: PathBuf,

    // http server configuration
    pub api_port: u16,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,
    pub content_store: ContentStoreConfig,

    // tree behaviour
    pub seed: SeedConfig,
    /// queries shorter than this return nothing over http
    pub search_min_len: usize,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Config {
    /// Fully in-memory configuration, nothing touches disk
    pub fn ephemeral() -> Self {
        Self {
            dir: std::env::temp_dir(),
            api_port: 0,
            sqlite_path: None,
            content_store: ContentStoreConfig::Memory,
            seed: SeedConfig::default(),
            search_min_len: 2,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
