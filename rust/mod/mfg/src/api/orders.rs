//! Order queries and lifecycle endpoints. Order creation happens only
//! through `/orders/intake`.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use factoryerp_core::{ListParams, ServiceError};

use crate::api::AppState;
use crate::model::OrderStatus;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/factories/{id}/orders", get(list_orders))
        .route("/orders/{id}", get(get_order))
        .route("/orders/{id}/status", post(update_status))
        .route("/orders/{id}/cancel", post(cancel_order))
        .route("/orders/{id}/transactions", get(order_transactions))
}

#[derive(Debug, Deserialize)]
struct OrderFilter {
    status: Option<OrderStatus>,
}

async fn list_orders(
    State(state): State<AppState>,
    Path(factory_id): Path<String>,
    Query(params): Query<ListParams>,
    Query(filter): Query<OrderFilter>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = match filter.status {
        Some(status) => state
            .service
            .list_orders_by_status(&factory_id, status, &params),
        None => state.service.list_orders(&factory_id, &params),
    }
    .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}

async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let order = state.service.get_order(&id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(order).unwrap()))
}

#[derive(Debug, Deserialize)]
struct StatusUpdate {
    status: OrderStatus,
}

async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<StatusUpdate>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let order = state
        .service
        .update_order_status(&id, input.status)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(order).unwrap()))
}

async fn cancel_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let order = state.service.cancel_order(&id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(order).unwrap()))
}

async fn order_transactions(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let items = state
        .service
        .list_transactions_for_order(&id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"items": items})))
}
