//! Backend entry-point: wires the HTTP surface over the submission store.

use std::io;

use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use contact_backend::outbound::persistence::{DbPool, PoolSettings, run_pending};
use contact_backend::server::{self, AppConfig, ProcessEnv};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env(&ProcessEnv).map_err(io::Error::other)?;

    // Schema first: the pool and the server only exist once the store is
    // in the expected shape.
    run_pending(&config.database_url).map_err(io::Error::other)?;

    let pool = DbPool::connect(PoolSettings::new(config.database_url.clone()))
        .await
        .map_err(io::Error::other)?;

    info!(
        port = config.listen_port,
        retention = %config.retention,
        "contact backend starting"
    );

    server::run(&config, pool)?.await
}
