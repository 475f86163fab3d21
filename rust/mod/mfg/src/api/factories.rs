use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use factoryerp_core::{ListParams, ServiceError};

use crate::api::AppState;
use crate::model::CreateFactory;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/factories", get(list_factories).post(create_factory))
        .route(
            "/factories/{id}",
            get(get_factory).patch(update_factory).delete(delete_factory),
        )
}

async fn list_factories(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = state.service.list_factories(&params).map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}

async fn create_factory(
    State(state): State<AppState>,
    Json(input): Json<CreateFactory>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let factory = state.service.create_factory(input).map_err(ServiceError::from)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(factory).unwrap()),
    ))
}

async fn get_factory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let factory = state.service.get_factory(&id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(factory).unwrap()))
}

async fn update_factory(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let factory = state
        .service
        .update_factory(&id, patch)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(factory).unwrap()))
}

async fn delete_factory(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<axum::http::StatusCode, ServiceError> {
    state.service.delete_factory(&id).map_err(ServiceError::from)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
