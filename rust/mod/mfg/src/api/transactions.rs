use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use factoryerp_core::{ListParams, ServiceError};

use crate::api::AppState;
use crate::model::CreateTransaction;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/factories/{id}/transactions",
            get(list_transactions).post(create_transaction),
        )
        .route("/transactions/{id}", get(get_transaction))
}

async fn list_transactions(
    State(state): State<AppState>,
    Path(factory_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = state
        .service
        .list_transactions(&factory_id, &params)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}

async fn create_transaction(
    State(state): State<AppState>,
    Path(factory_id): Path<String>,
    Json(input): Json<CreateTransaction>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let txn = state
        .service
        .create_transaction(&factory_id, input)
        .map_err(ServiceError::from)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(txn).unwrap()),
    ))
}

async fn get_transaction(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let txn = state.service.get_transaction(&id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(txn).unwrap()))
}
