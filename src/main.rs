use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use cinescope_api::api::{create_router, AppState};
use cinescope_api::catalog::{CatalogService, CatalogUpstream, ResponseCache, TmdbClient};
use cinescope_api::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // Upstream hangs surface as client errors instead of waiting forever
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let upstream: Arc<dyn CatalogUpstream> = Arc::new(TmdbClient::new(
        http_client,
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
    ));
    let cache = ResponseCache::new(
        config.cache_capacity,
        Duration::from_secs(config.cache_ttl_secs),
    );
    let catalog = CatalogService::new(upstream, cache, &config.tmdb_image_url);

    let state = AppState::new(catalog);
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
