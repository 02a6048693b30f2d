//! Route definitions

use std::sync::Arc;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};

use super::error::{ErrorDetail, ErrorResponse};
use super::handlers::{
    create_sample, delete_model, get_layers, get_meta, get_weights, health, infer, list_models,
    upload_model, AppState,
};

/// Create the API router
pub fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Health check
        .route("/health", get(health))
        // Registry
        .route("/api/models", get(list_models).post(upload_model))
        .route("/api/models/sample", post(create_sample))
        .route("/api/models/:id", delete(delete_model))
        // Inspection
        .route("/api/models/:id/meta", get(get_meta))
        .route("/api/models/:id/layers", get(get_layers))
        .route("/api/models/:id/weights", get(get_weights))
        // Inference
        .route("/api/models/:id/infer", post(infer))
        .fallback(handle_404)
}

async fn handle_404() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse {
            error: ErrorDetail {
                message: "Not found. See /api/models for registered models.".to_string(),
                r#type: "not_found_error".to_string(),
            },
        }),
    )
}
