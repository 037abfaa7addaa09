use clap::Args;

use common::prelude::SeedConfig;
use filetree_daemon::state::{AppConfig, AppState, ContentStoreConfig, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// API server port
    #[arg(long, default_value_t = 5001)]
    pub api_port: u16,

    /// Keep uploaded bytes in memory instead of under <dir>/content
    #[arg(long)]
    pub memory_content: bool,

    /// Seed a welcome.txt next to the default folder
    #[arg(long)]
    pub sample_file: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let content_store = if self.memory_content {
            ContentStoreConfig::Memory
        } else {
            ContentStoreConfig::Filesystem { path: None }
        };
        let config = AppConfig {
            api_port: self.api_port,
            seed: SeedConfig {
                sample_file: self.sample_file,
            },
            content_store,
            ..AppConfig::default()
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized filetree directory at: {}\n\
             - Database: {}\n\
             - Content: {}\n\
             - Config: {}\n\
             - API port: {}",
            state.dir.display(),
            state.db_path.display(),
            state.content_path.display(),
            state.config_path.display(),
            state.config.api_port,
        );

        Ok(output)
    }
}
