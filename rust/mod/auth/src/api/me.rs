use axum::extract::{Extension, State};
use axum::routing::get;
use axum::{Json, Router};

use factoryerp_core::ServiceError;

use crate::api::AppState;
use crate::model::Claims;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me))
        .route("/me/profile", get(my_profile))
}

/// GET /auth/me — current user info from JWT claims.
async fn me(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = svc.get_user(&claims.sub).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(user).unwrap()))
}

/// GET /auth/me/profile — the current user's factory membership.
async fn my_profile(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let profile = svc.get_profile(&claims.sub).map_err(ServiceError::from)?;
    Ok(Json(serde_json::to_value(profile).unwrap()))
}
