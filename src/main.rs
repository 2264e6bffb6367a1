// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tokio::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::application::polling_controller::DashboardController;
use crate::application::random_source::random_source;
use crate::application::reading_service::ReadingService;
use crate::infrastructure::config::load_config;
use crate::infrastructure::http_reading_source::HttpReadingSource;
use crate::infrastructure::memory_repository::MemoryReadingRepository;
use crate::infrastructure::tokio_ticker::TokioTickerFactory;
use crate::presentation::app_state::AppState;
use crate::presentation::router::router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_config()?;

    // Create reading store (infrastructure layer)
    let repository = Arc::new(MemoryReadingRepository::new());

    // Create services (application layer)
    let reading_service = ReadingService::new(repository);

    let dashboard = if config.dashboard.enabled {
        let source = HttpReadingSource::new(
            config.dashboard.source_url.clone(),
            config.dashboard.request_timeout(),
        )?;
        let controller = DashboardController::new(
            Arc::new(source),
            Arc::new(TokioTickerFactory),
            random_source(config.dashboard.random_seed),
            config.dashboard.timing(),
        );
        Some(Arc::new(Mutex::new(controller)))
    } else {
        None
    };

    // Create application state
    let state = Arc::new(AppState {
        reading_service,
        dashboard: dashboard.clone(),
    });

    // Build router (presentation layer)
    let router = router(state);

    // Bind before the dashboard starts polling so its first fetch can connect
    let addr: SocketAddr = config
        .server
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid server.bind_addr {:?}", config.server.bind_addr))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Starting power-console service on {}", addr);

    if let Some(dashboard) = &dashboard {
        dashboard.lock().await.start().await;
    }

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(dashboard) = &dashboard {
        dashboard.lock().await.stop();
    }
    tracing::info!("power-console stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
