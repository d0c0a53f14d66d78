//! HTTP server startup

use std::sync::Arc;

use helpdesk_core::{AppError, AppResult};

use crate::routes::create_router;
use crate::state::AppState;

/// Bind `bind` and serve until Ctrl+C.
pub async fn serve(state: Arc<AppState>, bind: &str) -> AppResult<()> {
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|e| AppError::Server(format!("Failed to bind {}: {}", bind, e)))?;

    let addr = listener.local_addr()?;
    tracing::info!("Helpdesk listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::Server(format!("Server error: {}", e)))?;

    tracing::info!("Helpdesk server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            // Without a signal handler, keep serving until the process is killed
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
