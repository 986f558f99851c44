use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use moodreel_api::{
    config::Config,
    db::{create_redis_client, Cache},
    routes::{create_router, AppState},
    services::{OpenAiOracle, SuggestionService, VideoCatalog, YouTubeCatalog},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodreel_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    // Cache is optional; without REDIS_URL every catalog call goes upstream
    let (cache, cache_handle) = match config.redis_url.as_deref() {
        Some(url) => {
            let client = create_redis_client(url)?;
            let (cache, handle) = Cache::new(client).await;
            tracing::info!("Redis cache enabled");
            (Some(cache), Some(handle))
        }
        None => {
            tracing::info!("REDIS_URL not set, running without cache");
            (None, None)
        }
    };

    let catalog: Arc<dyn VideoCatalog> = Arc::new(YouTubeCatalog::new(
        cache,
        config.youtube_api_key.clone(),
        config.youtube_api_url.clone(),
    ));
    let oracle = Arc::new(OpenAiOracle::new(
        config.oracle_api_key.clone(),
        config.oracle_api_url.clone(),
        config.oracle_model.clone(),
    ));
    let suggestions = Arc::new(SuggestionService::new(Arc::clone(&catalog), oracle));

    let state = Arc::new(AppState::new(catalog, suggestions));
    let app = create_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(address = %address, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
