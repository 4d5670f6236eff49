mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::sync::RwLock;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::models::DomainSettings;
use crate::pipeline::Pipeline;
use crate::publisher::WordPressClient;
use crate::traits::PageFetcher;
use crate::utils::HttpClient;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    /// Editable at runtime through `/api/domain-settings`.
    pub domains: Arc<RwLock<DomainSettings>>,
    pub pipeline: Pipeline,
    pub publisher: WordPressClient,
}

impl AppState {
    pub fn new(config: Config, fetcher: Arc<dyn PageFetcher>, publisher: WordPressClient) -> Self {
        let domains = config.site.domain_settings();
        let pipeline = Pipeline::from_config(&config, fetcher);
        Self {
            config: Arc::new(config),
            domains: Arc::new(RwLock::new(domains)),
            pipeline,
            publisher,
        }
    }

    pub fn from_config(config: Config) -> crate::error::Result<Self> {
        let http = HttpClient::new(&config.http)?;
        let publisher = WordPressClient::new(http.inner().clone(), config.content.max_screenshots);
        Ok(Self::new(config, Arc::new(http), publisher))
    }
}

/// Start the web server.
///
/// # Errors
///
/// Returns an error if the address is invalid or the listener fails.
pub async fn serve(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid web server address")?;

    let state = AppState::from_config(config).context("Failed to initialize HTTP client")?;
    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app).await.context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
