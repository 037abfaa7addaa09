pub mod utils;

use std::net::SocketAddr;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// How long the API task gets to drain after shutdown is signalled
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);
const LOG_FILE_NAME: &str = "filetree.log";

use crate::http_server;
use crate::{ServiceConfig, ServiceState};

/// Running daemon: the signal watcher plus the API server task.
pub struct ShutdownHandle {
    signal_watcher: JoinHandle<()>,
    api: JoinHandle<()>,
    shutdown_tx: watch::Sender<()>,
}

impl ShutdownHandle {
    /// Block until a signal or [`ShutdownHandle::shutdown`] stops the API.
    pub async fn wait(self) {
        let _ = self.signal_watcher.await;
        if timeout(DRAIN_TIMEOUT, self.api).await.is_err() {
            tracing::error!(
                "API did not drain within {} seconds",
                DRAIN_TIMEOUT.as_secs()
            );
            std::process::exit(4);
        }
    }

    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Stdout logging, plus a daily rolling file when `log_dir` is set.
///
/// RUST_LOG overrides the configured level for both outputs. The returned
///  guards flush the non-blocking writers when dropped.
fn init_logging(config: &ServiceConfig) -> Vec<WorkerGuard> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.log_level.into())
        .from_env_lossy();

    let (stdout, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let mut guards = vec![stdout_guard];

    let file_layer = config.log_dir.as_ref().and_then(|dir| {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Warning: cannot create log directory {:?}: {}", dir, e);
            return None;
        }
        let (writer, guard) =
            tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE_NAME));
        guards.push(guard);
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_span_events(FmtSpan::CLOSE),
        )
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().compact().with_writer(stdout))
        .with(file_layer)
        .init();

    utils::register_panic_logger();
    utils::report_build_info();

    guards
}

/// Build state and spawn the API server.
///
/// Exits the process if the database or content store cannot be opened.
///  Dropping the returned handle does not stop the service.
pub async fn start_service(config: &ServiceConfig) -> (ServiceState, ShutdownHandle) {
    let (signal_watcher, shutdown_tx, shutdown_rx) = utils::graceful_shutdown_blocker();

    let state = match ServiceState::from_config(config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("error creating server state: {}", e);
            std::process::exit(3);
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.api_port));
    let api_config = http_server::Config::new(addr).with_log_level(config.log_level);
    let api_state = state.clone();
    let api = tokio::spawn(async move {
        if let Err(e) = http_server::run_api(api_config, api_state, shutdown_rx).await {
            tracing::error!("API server error: {}", e);
        }
    });
    tracing::info!(port = config.api_port, "API listening");

    let handle = ShutdownHandle {
        signal_watcher,
        api,
        shutdown_tx,
    };
    (state, handle)
}

/// Run the daemon until a shutdown signal arrives.
pub async fn spawn_service(config: &ServiceConfig) {
    let _guards = init_logging(config);
    let (_, handle) = start_service(config).await;
    handle.wait().await;
}
