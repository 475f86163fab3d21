use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use factoryerp_core::ServiceError;

use crate::api::AppState;
use crate::model::{LoginRequest, TokenResponse};

pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// POST /auth/login — verify credentials, issue a JWT.
async fn login(
    State(svc): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ServiceError> {
    let token = svc
        .login(&body.email, &body.password)
        .map_err(ServiceError::from)?;
    Ok(Json(token))
}
