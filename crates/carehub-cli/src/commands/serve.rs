//! `carehub serve` - start the dashboard.

use anyhow::{Result, bail};
use carehub_core::{CarehubConfig, StoreBackend};
use carehub_dashboard::{AppState, DashboardServer};
use tracing::{info, warn};

/// Validate the configuration, then serve until interrupted.
pub async fn run(mut config: CarehubConfig, port: Option<u16>) -> Result<()> {
    if let Some(port) = port {
        config.dashboard.port = port;
    }
    if let Err(e) = config.validate() {
        bail!("Invalid configuration: {}. Run `carehub check` for details.", e);
    }

    match config.session_store.backend {
        StoreBackend::Memory => {
            warn!(
                accounts = config.session_store.seed_users.len(),
                "Using the in-memory session store; accounts and sessions are lost on restart"
            );
        }
        StoreBackend::Supabase => {
            info!(url = ?config.session_store.url, "Using the hosted session store");
        }
    }

    let state = AppState::from_config(&config);
    let server = DashboardServer::new(state);
    println!("CareHub dashboard listening on http://{}", server.bind_addr());

    tokio::select! {
        result = server.run() => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }
    Ok(())
}
