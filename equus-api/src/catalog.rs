use crate::error::AppError;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use equus_catalog::{HorseRecord, JourneyRecord, ServiceRecord};
use equus_core::load_service;
use serde_json::{json, Value};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/v1/services/{id}", get(get_service))
        .route("/v1/users/{user_id}/horses", get(list_user_horses))
        .route("/v1/journeys", get(list_journeys))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /v1/services/{id}
async fn get_service(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ServiceRecord>, AppError> {
    let service = load_service(state.catalog.as_ref(), &id).await?;
    Ok(Json(service))
}

/// GET /v1/users/{user_id}/horses
/// Horses the user can pick in the booking flow
async fn list_user_horses(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<HorseRecord>>, AppError> {
    let horses = state
        .catalog
        .list_user_horses(&user_id)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Horse lookup failed: {}", e)))?;
    Ok(Json(horses))
}

async fn list_journeys(State(state): State<AppState>) -> Result<Json<Vec<JourneyRecord>>, AppError> {
    let journeys = state
        .catalog
        .list_journeys()
        .await
        .map_err(|e| AppError::InternalServerError(format!("Journey lookup failed: {}", e)))?;
    Ok(Json(journeys))
}
