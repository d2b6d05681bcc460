mod assessment;
mod config;
mod errors;
mod interview;
mod llm_client;
mod models;
mod resume;
mod routes;
mod sessions;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::NimClient;
use crate::resume::pdf::PdfSettings;
use crate::routes::build_router;
use crate::sessions::{MemorySessionStore, RedisSessionStore, SessionLocks, SessionStore};
use crate::state::AppState;

const PRUNE_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Reflexion Interviewer v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = NimClient::new(config.nim.clone()).context("Failed to build HTTP client")?;
    info!(
        "LLM client initialized (chat: {}, vision: {})",
        config.nim.chat_model, config.nim.vision_model
    );

    // Initialize session store
    let sessions = build_session_store(&config).await?;
    info!("Session store: {}", sessions.backend_name());

    let state = AppState {
        llm: Arc::new(llm),
        sessions,
        session_locks: Arc::new(SessionLocks::default()),
        pdf_settings: PdfSettings {
            pdftoppm_path: config.pdftoppm_path.clone(),
            dpi: config.pdf_render_dpi,
        },
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down Reflexion Interviewer");
    Ok(())
}

/// Redis when `REDIS_URL` is set, otherwise an in-memory map with a pruning task.
async fn build_session_store(config: &Config) -> Result<Arc<dyn SessionStore>> {
    if let Some(url) = &config.redis_url {
        let store = RedisSessionStore::connect(url, config.session_ttl_secs)
            .await
            .context("Failed to connect to Redis")?;
        return Ok(Arc::new(store));
    }

    let store = Arc::new(MemorySessionStore::new());
    let ttl = Duration::from_secs(config.session_ttl_secs);
    let pruner = store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            let removed = pruner.prune_expired(ttl).await;
            if removed > 0 {
                info!("Pruned {removed} idle interview session(s)");
            }
        }
    });
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {e}");
        std::future::pending::<()>().await;
    }
}
