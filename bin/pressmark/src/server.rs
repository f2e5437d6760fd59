//! Local static file server for watch mode

use std::path::Path;

use axum::Router;
use tower_http::{services::ServeDir, trace::TraceLayer};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8000;

/// Router serving `output_dir`; directory requests resolve to `index.html`.
pub fn create_router(output_dir: &Path) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(output_dir))
        .layer(TraceLayer::new_for_http())
}

/// Resolves when Ctrl-C is received.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
