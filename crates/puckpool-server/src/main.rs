// Stats proxy entry point.
//
// Startup sequence:
// 1. Initialize tracing (stdout)
// 2. Load config (copies defaults/ on first run)
// 3. Build the upstream client and shared state
// 4. Serve until Ctrl+C

use std::sync::Arc;

use anyhow::Context;
use puckpool_server::config;
use puckpool_server::routes::create_router;
use puckpool_server::state::AppState;
use puckpool_server::upstream::NhlClient;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    info!("Puckpool server starting up");

    let config = config::load_config().context("failed to load configuration")?;
    info!(
        bind = %config.bind_addr(),
        static_dir = %config.static_dir.display(),
        cache_ttl_secs = config.cache.ttl_secs,
        "configuration loaded"
    );

    let provider = NhlClient::new(config.upstream.clone()).context("failed to build HTTP client")?;
    let state = Arc::new(AppState::new(Arc::new(provider), &config.cache));
    let app = create_router(state, &config.static_dir);

    let listener = tokio::net::TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("server stopped");
    Ok(())
}

/// Initialize tracing to stdout. `RUST_LOG` overrides the default filter.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("puckpool_server=info,tower_http=info,warn")),
        )
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
