use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use factoryerp_core::ServiceError;

use crate::api::AppState;
use crate::model::SetProfile;

pub fn routes() -> Router<AppState> {
    Router::new().route("/users/{id}/profile", get(get_profile).put(set_profile))
}

/// GET /auth/users/:id/profile — a user's factory membership.
async fn get_profile(
    State(svc): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let profile = svc.get_profile(&id).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(profile).unwrap()))
}

/// PUT /auth/users/:id/profile — attach a user to a factory.
async fn set_profile(
    State(svc): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<SetProfile>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let profile = svc.set_profile(&id, input).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(profile).unwrap()))
}
