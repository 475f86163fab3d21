//! Catalog endpoints: product models, materials, operation templates.

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use factoryerp_core::{ListParams, ServiceError};

use crate::api::AppState;
use crate::model::{CreateMaterial, CreateOperationTemplate, CreateProductModel};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/factories/{id}/models",
            get(list_models).post(create_model),
        )
        .route(
            "/models/{id}",
            get(get_model).patch(update_model).delete(delete_model),
        )
        .route(
            "/factories/{id}/materials",
            get(list_materials).post(create_material),
        )
        .route("/materials/{id}", get(get_material).delete(delete_material))
        .route("/materials/{id}/adjust", post(adjust_material))
        .route(
            "/factories/{id}/templates",
            get(list_templates).post(create_template),
        )
        .route("/templates/{id}", get(get_template).delete(delete_template))
}

// ── Product models ──

async fn list_models(
    State(state): State<AppState>,
    Path(factory_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = state
        .service
        .list_product_models(&factory_id, &params)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}

async fn create_model(
    State(state): State<AppState>,
    Path(factory_id): Path<String>,
    Json(input): Json<CreateProductModel>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let model = state
        .service
        .create_product_model(&factory_id, input)
        .map_err(ServiceError::from)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(model).unwrap()),
    ))
}

async fn get_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let model = state.service.get_product_model(&id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(model).unwrap()))
}

async fn update_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<serde_json::Value>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let model = state
        .service
        .update_product_model(&id, patch)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(model).unwrap()))
}

async fn delete_model(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<axum::http::StatusCode, ServiceError> {
    state.service.delete_product_model(&id).map_err(ServiceError::from)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

// ── Materials ──

async fn list_materials(
    State(state): State<AppState>,
    Path(factory_id): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let result = state
        .service
        .list_materials(&factory_id, &params)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({
        "items": result.items,
        "total": result.total,
    })))
}

async fn create_material(
    State(state): State<AppState>,
    Path(factory_id): Path<String>,
    Json(input): Json<CreateMaterial>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let material = state
        .service
        .create_material(&factory_id, input)
        .map_err(ServiceError::from)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(material).unwrap()),
    ))
}

async fn get_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let material = state.service.get_material(&id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(material).unwrap()))
}

#[derive(Debug, Deserialize)]
struct AdjustStock {
    delta: f64,
}

async fn adjust_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<AdjustStock>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let material = state
        .service
        .adjust_material_stock(&id, input.delta)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(material).unwrap()))
}

async fn delete_material(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<axum::http::StatusCode, ServiceError> {
    state.service.delete_material(&id).map_err(ServiceError::from)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}

// ── Operation templates ──

async fn list_templates(
    State(state): State<AppState>,
    Path(factory_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let templates = state
        .service
        .list_operation_templates(&factory_id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::json!({"items": templates})))
}

async fn create_template(
    State(state): State<AppState>,
    Path(factory_id): Path<String>,
    Json(input): Json<CreateOperationTemplate>,
) -> Result<(axum::http::StatusCode, Json<serde_json::Value>), ServiceError> {
    let template = state
        .service
        .create_operation_template(&factory_id, input)
        .map_err(ServiceError::from)?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(serde_json::to_value(template).unwrap()),
    ))
}

async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let template = state
        .service
        .get_operation_template(&id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(template).unwrap()))
}

async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<axum::http::StatusCode, ServiceError> {
    state
        .service
        .delete_operation_template(&id)
        .map_err(ServiceError::from)?;
    Ok(axum::http::StatusCode::NO_CONTENT)
}
