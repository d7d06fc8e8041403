//! # sociogram-server
//!
//! Provisioning and account-sync backend for the sociogram app, which
//! stores its data on a managed backend-as-a-service platform.
//!
//! This binary provides:
//! - **Schema provisioning** on boot: idempotently creates the users /
//!   posts / saves / likes collections with their attributes, indexes and
//!   relationship links through the platform's administrative API
//! - **Account sync**: pages through the platform's account records and
//!   creates a profile document for every account not yet represented
//! - **REST API** (axum) exposing the sync operation

mod api;
mod config;
mod error;
mod profile;
mod schema;
mod sync;

#[cfg(test)]
mod mock;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use sociogram_remote::RemoteClient;

use crate::api::AppState;
use crate::config::Config;
use crate::schema::ReadinessPoll;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sociogram_server=debug")),
        )
        .init();

    info!("Starting sociogram server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration (missing platform credentials are fatal)
    // -----------------------------------------------------------------------
    let config = Config::from_env()?;
    info!(
        endpoint = %config.remote.endpoint,
        database = %config.remote.database_id,
        http_addr = %config.http_addr,
        "Loaded configuration"
    );

    let remote = Arc::new(RemoteClient::new(config.remote.clone())?);

    // -----------------------------------------------------------------------
    // 3. Provision the schema. On failure the server still starts, in a
    //    degraded state where sync fails until provisioning is rerun.
    // -----------------------------------------------------------------------
    match schema::ensure_schema(remote.as_ref(), &ReadinessPoll::default()).await {
        Ok(()) => info!("schema provisioned"),
        Err(e) => error!(
            error = %e,
            "schema provisioning failed; sync will fail until an operator reruns provisioning"
        ),
    }

    // -----------------------------------------------------------------------
    // 4. Run the HTTP server (blocks until shutdown)
    // -----------------------------------------------------------------------
    let state = AppState { remote };

    tokio::select! {
        result = api::serve(state, config.http_addr) => {
            if let Err(e) = result {
                error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
