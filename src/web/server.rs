//! Web server setup

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::config::Settings;
use crate::pipeline::Processor;
use crate::web::handlers;

/// Build the application router.
pub fn router(processor: Arc<Processor>, max_upload_bytes: usize) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/process", post(handlers::process))
        .route("/download", post(handlers::download))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(processor)
}

/// Run the web UI until the process is stopped.
pub async fn serve(settings: Settings) -> Result<()> {
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let max_upload_bytes = settings.server.max_upload_mb * 1024 * 1024;

    if settings.resolve_api_key().is_none() {
        tracing::warn!(
            "No summarizer API key configured; summaries will fall back to extracts"
        );
    }

    let processor = Arc::new(Processor::new(settings));
    let app = router(processor, max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
