use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use factoryerp_core::ServiceError;

use crate::api::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/factories/{id}/stats", get(dashboard_stats))
}

async fn dashboard_stats(
    State(state): State<AppState>,
    Path(factory_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let stats = state
        .service
        .dashboard_stats(&factory_id)
        .map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(stats).unwrap()))
}
