//! One-shot retention sweep over stored contact submissions.
//!
//! Deletes every submission older than the retention window and exits.
//! Intended to run from cron:
//!
//! ```text
//! 0 0 * * * cleanup
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::io;
use std::sync::Arc;

use clap::Parser;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use contact_backend::domain::{ContactService, RetentionPolicy, RetentionWindow};
use contact_backend::outbound::persistence::{DbPool, DieselSubmissionRepository, PoolSettings};
use contact_backend::server::{AppConfig, ProcessEnv};

/// `cleanup` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "cleanup",
    about = "Delete contact submissions older than the retention window",
    version
)]
struct CliArgs {
    /// Retention window in months. Falls back to `DATA_RETENTION_MONTHS`
    /// (default 6) when omitted.
    #[arg(long = "retention-months", value_name = "months")]
    retention_months: Option<u32>,
    /// Database connection URL. Falls back to the environment when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> io::Result<()> {
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let mut config = AppConfig::from_env(&ProcessEnv).map_err(io::Error::other)?;

    if let Some(url) = args.database_url {
        config.database_url = url;
    }
    if let Some(months) = args.retention_months {
        config.retention = RetentionWindow::new(months).map_err(io::Error::other)?;
    }

    let pool = DbPool::connect(PoolSettings::new(config.database_url.clone()))
        .await
        .map_err(io::Error::other)?;
    let repository = DieselSubmissionRepository::new(pool);
    let service = ContactService::new(
        Arc::new(repository),
        RetentionPolicy::new(config.retention),
    );

    let report = service
        .purge_expired()
        .await
        .map_err(|error| io::Error::other(format!("retention sweep failed: {error}")))?;

    info!(
        deleted = report.deleted,
        retention = %report.window,
        "cleanup completed"
    );
    Ok(())
}
