//! HTTP request handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Json, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, Result};
use crate::engine::ModelStore;
use crate::model::{LayerSummary, ModelMeta, WeightStats};

/// Multipart part carrying the model bytes
const UPLOAD_FIELD: &str = "file";

/// Shared application state
pub struct AppState {
    pub store: Arc<ModelStore>,
}

impl AppState {
    pub fn new(store: Arc<ModelStore>) -> Self {
        Self { store }
    }
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// List registered models
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: state.store.list(),
    })
}

/// Register an uploaded model (multipart, part `file`)
pub async fn upload_model(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<RegisteredResponse>> {
    let mut bytes = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(UPLOAD_FIELD) {
            bytes = Some(field.bytes().await?);
            break;
        }
    }
    let bytes = bytes.ok_or_else(|| {
        ApiError::BadRequest(format!("missing multipart part '{}'", UPLOAD_FIELD))
    })?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("uploaded model is empty".to_string()));
    }

    tracing::info!(size_bytes = bytes.len(), "Loading uploaded model");
    let store = Arc::clone(&state.store);
    let model = tokio::task::spawn_blocking(move || store.load(&bytes)).await??;

    Ok(Json(RegisteredResponse {
        id: model.id().to_string(),
        meta: model.meta(),
    }))
}

/// Register the built-in untrained sample network
pub async fn create_sample(State(state): State<Arc<AppState>>) -> Json<RegisteredResponse> {
    let model = state.store.create_sample();
    Json(RegisteredResponse {
        id: model.id().to_string(),
        meta: model.meta(),
    })
}

/// Model metadata
pub async fn get_meta(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ModelMeta>> {
    let model = state.store.get(&id)?;
    Ok(Json(state.store.meta(&model)))
}

/// Layer-by-layer structure
pub async fn get_layers(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<LayersResponse>> {
    let model = state.store.get(&id)?;
    Ok(Json(LayersResponse {
        id,
        layers: model.layers(),
    }))
}

/// Parameter distributions
pub async fn get_weights(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WeightsResponse>> {
    let model = state.store.get(&id)?;
    Ok(Json(WeightsResponse {
        id,
        stats: model.weight_stats(),
    }))
}

/// Remove a model. Succeeds whether or not the id was registered.
pub async fn delete_model(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> StatusCode {
    state.store.remove(&id);
    StatusCode::NO_CONTENT
}

/// Run inference on a registered model
pub async fn infer(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: std::result::Result<Json<InferRequest>, JsonRejection>,
) -> Result<Json<InferResponse>> {
    let Json(request) = body?;
    if request.inputs.is_empty() {
        return Err(ApiError::BadRequest("inputs must not be empty".to_string()));
    }

    let model = state.store.get(&id)?;
    let executor = *state.store.executor();
    let output = tokio::task::spawn_blocking(move || executor.infer(&model, &request.inputs))
        .await?
        .map_err(crate::error::RegistryError::from)?;

    Ok(Json(InferResponse { output }))
}

// Request/Response types

#[derive(Deserialize)]
pub struct InferRequest {
    #[serde(default)]
    pub inputs: HashMap<String, Vec<f64>>,
}

#[derive(Serialize, Deserialize)]
pub struct InferResponse {
    pub output: Vec<f64>,
}

#[derive(Serialize, Deserialize)]
pub struct RegisteredResponse {
    pub id: String,
    pub meta: ModelMeta,
}

#[derive(Serialize, Deserialize)]
pub struct ModelsResponse {
    pub models: Vec<ModelMeta>,
}

#[derive(Serialize, Deserialize)]
pub struct LayersResponse {
    pub id: String,
    pub layers: Vec<LayerSummary>,
}

#[derive(Serialize, Deserialize)]
pub struct WeightsResponse {
    pub id: String,
    pub stats: Vec<WeightStats>,
}
