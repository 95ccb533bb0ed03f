//! HTTP surface for the kaede scrape pipeline.
//!
//! Every route fetches its upstream page on demand and answers with the JSON
//! envelope from [`kaede_core::Envelope`].

pub mod config;
pub mod handlers;
pub mod routes;

use std::sync::Arc;

use anyhow::Context;
use kaede_core::HttpCatalog;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub use config::ServerConfig;
pub use routes::router;

const DEFAULT_FILTER: &str = "kaede_server=info,kaede_core=info,tower_http=info";

/// Installs the global fmt subscriber. `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry().with(filter).with(tracing_subscriber::fmt::layer()).init();
}

/// Binds the configured address and serves until the process exits.
pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let catalog = HttpCatalog::new(config.catalog_config()).context("invalid upstream configuration")?;
    tracing::info!(base_url = catalog.base_url(), "scraping upstream");

    let app = router(Arc::new(catalog));
    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;

    tracing::info!("listening on http://{}", config.bind);
    axum::serve(listener, app).await?;

    Ok(())
}
