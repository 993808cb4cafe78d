//! Process startup and teardown shared by the HTTP server and the sync job.

use sqlx::PgPool;
use tracing_subscriber::EnvFilter;

use crate::config::{get_config, init_config, Config, LogFormat};
use crate::database::pool::{create_pool, run_migrations};
use crate::error::Result;
use crate::storage::MediaStorage;
use crate::AppState;

const DEFAULT_LOG_FILTER: &str = "devprofile_backend=info,sync_developers=info,tower_http=info";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget {
    Stdout,
    /// Keeps stdout free for a job's own report lines.
    Stderr,
}

pub struct AppContext {
    pub config: &'static Config,
    pub pool: PgPool,
}

/// Loads configuration, installs logging, connects and migrates the database.
/// Call once at process entry and pair with [`AppContext::shutdown`].
pub async fn start(target: LogTarget) -> Result<AppContext> {
    init_config()?;
    let config = get_config();
    init_tracing(config.log_format, target);

    let pool = create_pool(config).await?;
    run_migrations(&pool).await?;
    tracing::info!("Database ready");

    Ok(AppContext { config, pool })
}

impl AppContext {
    pub fn media(&self) -> MediaStorage {
        MediaStorage::from_config(self.config)
    }

    pub fn state(&self) -> AppState {
        AppState::new(self.pool.clone(), self.media())
    }

    pub async fn shutdown(self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

pub fn init_tracing(format: LogFormat, target: LogTarget) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let installed = match (format, target) {
        (LogFormat::Json, LogTarget::Stdout) => builder.json().try_init(),
        (LogFormat::Json, LogTarget::Stderr) => builder.json().with_writer(std::io::stderr).try_init(),
        (LogFormat::Text, LogTarget::Stdout) => builder.try_init(),
        (LogFormat::Text, LogTarget::Stderr) => builder.with_writer(std::io::stderr).try_init(),
    };
    if installed.is_err() {
        tracing::debug!("Tracing subscriber was already installed");
    }
}
