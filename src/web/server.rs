use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use super::{create_app, AppState};

pub struct ResearchServer {
    address: String,
    state: AppState,
}

impl ResearchServer {
    pub fn new(address: impl Into<String>, state: AppState) -> Self {
        Self {
            address: address.into(),
            state,
        }
    }

    /// Serves until Ctrl-C.
    pub async fn start(self) -> Result<()> {
        let providers: Vec<String> = self
            .state
            .assistant
            .available_providers()
            .iter()
            .map(ToString::to_string)
            .collect();
        info!(providers = %providers.join(","), "Starting research server");

        let listener = TcpListener::bind(&self.address)
            .await
            .with_context(|| format!("Failed to bind {}", self.address))?;
        info!("Server listening on http://{}", self.address);

        axum::serve(listener, create_app(self.state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
