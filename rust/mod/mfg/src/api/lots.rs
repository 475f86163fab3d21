//! Production lot endpoints, including progress recording.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};

use factoryerp_core::{ListParams, ServiceError};

use crate::api::AppState;
use crate::model::RecordProduction;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/factories/{id}/lots", get(list_lots))
        .route("/lots/{id}", get(get_lot))
        .route("/lots/{id}/operations", get(lot_operations))
        .route("/lots/{id}/logs", get(lot_logs))
        .route("/lots/{id}/production", post(record_production))
}

async fn list_lots(
    State(state): State<AppState>,
    Path(factory_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = state
        .service
        .list_lots(&factory_id, &params)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}

async fn get_lot(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let lot = state.service.get_lot(&id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(lot).unwrap()))
}

async fn lot_operations(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let ops = state
        .service
        .list_lot_operations(&id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"items": ops})))
}

async fn lot_logs(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let logs = state
        .service
        .list_production_logs(&id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"items": logs})))
}

async fn record_production(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<RecordProduction>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let entry = state
        .service
        .record_production(&id, input)
        .map_err(ServiceError::from)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(entry).unwrap()),
    ))
}
