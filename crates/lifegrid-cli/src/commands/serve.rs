//! Serve command implementation.
//!
//! Builds the repository tiers (LRU -> in-memory shared cache -> JSON file
//! store), wires the API router, and serves it until ctrl-c.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use lifegrid_api::{create_api_state, create_router};
use lifegrid_store::{BoardRepository, JsonFileStore, LruTier, MemoryCache, SharedCache};
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;

/// Capacity of the per-process LRU tier.
const LRU_CAPACITY: usize = 256;

/// Execute the serve command.
pub async fn execute(config: &Config, port: u16) -> Result<()> {
    let store = Arc::new(JsonFileStore::new(&config.data_dir));
    let shared: Arc<dyn SharedCache> = Arc::new(MemoryCache::new());
    let cache: Arc<dyn SharedCache> = Arc::new(LruTier::new(shared, LRU_CAPACITY));

    let repository = Arc::new(BoardRepository::new(store, cache, config.cache_ttls()));
    let state = create_api_state(repository);
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!(
        %addr,
        data_dir = %config.data_dir.display(),
        "lifegrid_listening"
    );
    println!("🚀 lifegrid server");
    println!("   URL: http://localhost:{port}");
    println!("   Boards: POST /boards, GET /boards/{{id}}/next");
    println!("   Streaming: GET /ws?boardId=<uuid>&maxAttempts=<n>");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("lifegrid_stopped");
    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    info!("shutdown_requested");
}
