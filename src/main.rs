mod analysis;
mod cache;
mod config;
mod error;
mod prompts;
mod provider;
mod web;

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const CACHE_PURGE_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roborder_reply=info,tower_http=info".into()),
        )
        .init();

    info!("Loading configuration...");
    let config = config::AppConfig::load()?;

    if config.web.api_keys.is_empty() {
        warn!("API_KEYS is empty - every non-empty X-API-Key will be accepted");
    }

    let cache = cache::from_config(&config.cache);
    info!("Cache backend: {:?} ({})", config.cache.backend, cache.health().await);

    let provider: Arc<dyn provider::CompletionProvider> =
        Arc::new(provider::OpenRouterProvider::new(&config.provider)?);
    info!("Generation provider: {} via {}", config.provider.model, config.provider.base_url);

    let generator = analysis::ReplyGenerator::new(provider.clone(), config.provider.max_tokens_per_reply);
    let summarizer = analysis::PostSummarizer::new(
        provider,
        cache.clone(),
        config.provider.max_tokens_per_summary,
    );

    // Expired entries are never served; this only reclaims memory.
    let purge_cache = cache.clone();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(CACHE_PURGE_INTERVAL);
        loop {
            ticker.tick().await;
            purge_cache.purge_expired().await;
        }
    });

    let app_state = web::state::AppState::new(generator, summarizer, cache, config.web.api_keys.clone());
    let router = web::create_router(app_state, &config.web.allowed_origins);

    let addr = format!("{}:{}", config.web.host, config.web.port);
    info!("Starting reply service at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {:#}", e);
    }
    info!("Shutting down...");
}
