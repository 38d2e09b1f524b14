// Pool client entry point.
//
// Startup sequence:
// 1. Initialize tracing (log to file, not terminal)
// 2. Load config (copies defaults/ on first run)
// 3. Open local storage and restore the saved pool
// 4. Create mpsc channels and the server client
// 5. Spawn app logic task
// 6. Run the TUI until the user quits
// 7. Cleanup on exit

use std::sync::Arc;

use anyhow::Context;
use puckpool_core::db::Database;
use puckpool_tui::api::HttpPoolApi;
use puckpool_tui::app;
use puckpool_tui::config;
use puckpool_tui::tui;
use tokio::sync::mpsc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;
    info!("Puckpool client starting up");

    // 2. Load config
    let config = config::load_config().context("failed to load configuration")?;
    info!("Config loaded: server={}", config.server_url);

    // 3. Open local storage
    let db = Database::open(&config.db_path).context("failed to open database")?;
    info!("Database opened at {}", config.db_path);

    // 4. Channels and server client
    let (cmd_tx, cmd_rx) = mpsc::channel(64);
    let (ui_tx, ui_rx) = mpsc::channel(256);
    let (search_tx, search_rx) = mpsc::channel(16);

    let api = HttpPoolApi::new(&config).context("failed to build HTTP client")?;
    let mut app_state = app::AppState::new(config, db, Arc::new(api), search_tx);

    match app::recover_from_db(&mut app_state) {
        Ok(true) => info!("Pool restored from previous session"),
        Ok(false) => info!("Starting with an empty pool"),
        Err(e) => {
            error!("Restoring the saved pool failed: {}", e);
            return Err(e.context("failed to restore saved pool"));
        }
    }

    // 5. Spawn app logic task
    let app_handle = tokio::spawn(async move {
        if let Err(e) = app::run(cmd_rx, search_rx, ui_tx, app_state).await {
            error!("Application loop error: {}", e);
        }
    });

    // 6. TUI blocks until 'q' or Ctrl+C
    if let Err(e) = tui::run(ui_rx, cmd_tx).await {
        error!("TUI error: {}", e);
    }

    // 7. Give the app task a moment to finish a pending save
    let _ = tokio::time::timeout(std::time::Duration::from_secs(5), async {
        let _ = app_handle.await;
    })
    .await;

    info!("Puckpool client shut down cleanly");
    Ok(())
}

/// Initialize tracing to log to a file (the terminal belongs to the TUI).
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("puckpool.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("puckpool_tui=info,puckpool_core=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
