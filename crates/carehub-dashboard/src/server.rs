//! Dashboard server implementation.

use crate::error::DashboardError;
use crate::routes;
use crate::state::AppState;
use tokio::net::TcpListener;

/// The dashboard server.
pub struct DashboardServer {
    state: AppState,
}

impl DashboardServer {
    /// Create a server around prepared application state.
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Bind the configured address and serve until the process stops.
    pub async fn run(&self) -> Result<(), DashboardError> {
        let addr = self.bind_addr();
        tracing::info!(address = %addr, "Starting CareHub dashboard");

        let app = routes::create_router(self.state.clone());

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| DashboardError::StartupFailed(e.to_string()))?;

        axum::serve(listener, app)
            .await
            .map_err(|e| DashboardError::StartupFailed(e.to_string()))?;

        Ok(())
    }

    /// Address the server listens on.
    pub fn bind_addr(&self) -> String {
        self.state.config().bind_addr()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::StoreFactory;
    use carehub_core::DashboardConfig;
    use carehub_session::{InMemoryBackend, StaticIp};
    use std::sync::Arc;

    #[test]
    fn test_server_creation() {
        let config = DashboardConfig {
            port: 9090,
            ..Default::default()
        };
        let state = AppState::new(
            config,
            StoreFactory::Memory(InMemoryBackend::new()),
            Arc::new(StaticIp::unknown()),
            "tests",
        );
        let server = DashboardServer::new(state);
        assert_eq!(server.bind_addr(), "127.0.0.1:9090");
    }
}
