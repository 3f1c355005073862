//! Lineage Flow host
//!
//! Serves one lineage session over HTTP: the renderer posts its edit intents
//! and reads back the projected view, history and outbound messages.

use lineage_flow::config::Settings;
use lineage_flow::routes::create_router;
use lineage_flow::state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber for structured logging
    init_tracing();

    info!("🚀 Starting Lineage Flow...");

    // Load configuration
    let settings = Settings::load()?;
    info!("📋 Configuration loaded successfully");

    let state = Arc::new(AppState::from_settings(&settings));
    open_initial_document(&state, &settings).await?;

    // Build the router
    let app = create_router(state, &settings);

    // Create socket address
    let addr = SocketAddr::from((settings.server.host, settings.server.port));

    info!("🌐 Server listening on http://{}", addr);
    info!("   GET  /api/view             - Projected graph view");
    info!("   GET  /api/history          - Undo/redo history");
    info!("   POST /api/messages         - Deliver a renderer message");
    info!("   POST /api/import/csv       - Import tables from CSV");
    info!("   POST /api/document/save    - Save lineage data");
    info!("   POST /api/document/load    - Load lineage data");

    // Create TCP listener and serve
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("👋 Server shutdown complete");
    Ok(())
}

/// Initialize tracing with structured logging
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,lineage_flow=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .compact(),
        )
        .init();
}

/// Load LINEAGE_DOCUMENT if it exists, otherwise remember it as the save target
async fn open_initial_document(state: &AppState, settings: &Settings) -> anyhow::Result<()> {
    let Some(path) = settings.lineage.document_path.as_deref() else {
        return Ok(());
    };

    let mut controller = state.controller.lock().await;
    if tokio::fs::try_exists(path).await? {
        controller.load_document(path).await?;
        info!("📂 Loaded lineage data from {}", path.display());
    } else {
        warn!("⚠️  {} does not exist yet, it will be created on save", path.display());
        controller.remember_document_path(path);
    }
    // Nobody is listening before the server starts
    controller.renderer_mut().drain();
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("📴 Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            info!("📴 Received terminate signal, initiating graceful shutdown...");
        },
    }
}
