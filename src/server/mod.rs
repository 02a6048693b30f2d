//! HTTP server
//!
//! REST API over the model store: upload, sample creation, inspection,
//! deletion and inference.

mod error;
mod handlers;
mod routes;

use std::sync::Arc;

use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::engine::ModelStore;

pub use error::{ApiError, ErrorDetail, ErrorResponse};
pub use handlers::{
    AppState, InferRequest, InferResponse, LayersResponse, ModelsResponse, RegisteredResponse,
    WeightsResponse,
};
pub use routes::api_routes;

/// Build the application router with its middleware stack
pub fn router(store: Arc<ModelStore>, config: &ServerConfig) -> Router {
    let state = Arc::new(AppState::new(store));

    let mut app = Router::new().merge(api_routes()).with_state(state);

    if config.cors_enabled {
        app = app.layer(cors_layer(config));
    }
    if config.request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.layer(DefaultBodyLimit::max(config.max_body_size))
        .layer(GlobalConcurrencyLimitLayer::new(
            config.max_concurrent_requests.max(1),
        ))
}

fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Start the HTTP server and run until ctrl+c
pub async fn start(store: Arc<ModelStore>, config: ServerConfig) -> Result<()> {
    let app = router(store, &config);

    let addr = config.addr();
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("Server listening on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  GET    /health - Health check");
    tracing::info!("  GET    /api/models - List models");
    tracing::info!("  POST   /api/models - Upload model (multipart 'file')");
    tracing::info!("  POST   /api/models/sample - Create sample model");
    tracing::info!("  GET    /api/models/:id/meta - Model metadata");
    tracing::info!("  GET    /api/models/:id/layers - Layer structure");
    tracing::info!("  GET    /api/models/:id/weights - Weight statistics");
    tracing::info!("  DELETE /api/models/:id - Remove model");
    tracing::info!("  POST   /api/models/:id/infer - Run inference");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received, stopping server"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to install ctrl+c handler");
            std::future::pending::<()>().await;
        }
    }
}
