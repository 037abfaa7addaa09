use clap::Args;

use filetree_daemon::state::{AppState, StateError};
use filetree_daemon::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override API server port (default from config)
    #[arg(long)]
    pub api_port: Option<u16>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<std::path::PathBuf>,

    /// Use an in-memory database instead of db.sqlite
    #[arg(long)]
    pub ephemeral: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),

    #[error("invalid log level in config: {0}")]
    InvalidLogLevel(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let state = AppState::load(ctx.config_path.clone())?;

        let log_level = state
            .config
            .log_level
            .parse::<tracing::Level>()
            .map_err(|_| DaemonError::InvalidLogLevel(state.config.log_level.clone()))?;

        let sqlite_path = (!self.ephemeral).then(|| state.db_path.clone());

        let config = ServiceConfig {
            dir: state.dir.clone(),
            api_port: self.api_port.unwrap_or(state.config.api_port),
            sqlite_path,
            content_store: state.config.content_store.clone(),
            seed: state.config.seed.clone(),
            search_min_len: state.config.search_min_len,
            log_level,
            log_dir: self.log_dir.clone(),
        };

        spawn_service(&config).await;
        Ok("daemon ended".to_string())
    }
}
