use crate::auth::{ClientCredentialsProvider, TokenCache};
use crate::config::Config;
use crate::opensky::OpenSkyClient;
use crate::radar::{self, RadarService};
use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

pub struct RelayDaemon {
    config: Config,
    service: RadarService,
}

impl RelayDaemon {
    /// Wire up the token cache and upstream client. Fails if credentials are missing.
    pub fn new(config: Config) -> Result<Self> {
        let credentials = config.credentials()?;
        let timeout = config.opensky.request_timeout();

        let provider = ClientCredentialsProvider::new(config.opensky.token_url.clone(), credentials, timeout)
            .context("Failed to create token client")?;
        let tokens = Arc::new(TokenCache::new(
            Arc::new(provider),
            config.opensky.token_refresh_margin(),
        ));

        let source = OpenSkyClient::new(config.opensky.states_url.clone(), timeout)
            .context("Failed to create OpenSky client")?;

        let service = RadarService::new(tokens, Arc::new(source));

        Ok(Self { config, service })
    }

    pub fn app(&self) -> Router {
        radar::router(self.service.clone())
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
    }

    pub async fn run(self) -> Result<()> {
        let addr = self.config.bind_addr()?;
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind {}", addr))?;

        info!("📡 Serving GET /radar/aircraft on http://{}", listener.local_addr()?);

        axum::serve(listener, self.app())
            .await
            .context("HTTP server error")?;

        Ok(())
    }
}
