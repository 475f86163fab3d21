mod login;
mod me;
mod middleware;
mod profiles;
mod users;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::service::AuthService;

/// Shared application state.
pub type AppState = Arc<AuthService>;

/// Build the complete auth API router.
///
/// All routes are relative — the binary nests them under `/auth`.
/// The module carries its own JWT middleware (`/login` is the only
/// public path) and its own permissive CORS layer, so browser
/// preflights are answered before the middleware sees them.
pub fn build_router(svc: Arc<AuthService>) -> Router {
    Router::new()
        .merge(login::routes())
        .merge(me::routes())
        .merge(users::routes())
        .merge(profiles::routes())
        .layer(axum::middleware::from_fn_with_state(
            svc.clone(),
            middleware::auth_middleware,
        ))
        .layer(CorsLayer::permissive())
        .with_state(svc)
}
