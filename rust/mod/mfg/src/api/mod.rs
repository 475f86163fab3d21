mod catalog;
mod factories;
mod intake;
mod lots;
mod orders;
mod stats;
mod transactions;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;

use factoryerp_core::{IdentityResolver, TenantStore};

use crate::service::MfgService;

/// Shared application state: the service plus the collaborators the
/// intake endpoint resolves callers with.
pub struct MfgState {
    pub service: Arc<MfgService>,
    pub identity: Arc<dyn IdentityResolver>,
    pub tenants: Arc<dyn TenantStore>,
}

pub type AppState = Arc<MfgState>;

/// Build the complete mfg API router.
///
/// All routes are relative — the binary nests them under `/mfg`. The
/// intake route does its own token resolution and writes its own CORS
/// headers, so it stays outside the permissive CORS layer the other
/// routes get; a response must never carry the same CORS header twice.
/// Everything else relies on the binary's JWT middleware.
pub fn build_router(state: AppState) -> Router {
    let general = Router::new()
        .merge(factories::routes())
        .merge(catalog::routes())
        .merge(orders::routes())
        .merge(lots::routes())
        .merge(transactions::routes())
        .merge(stats::routes())
        .layer(CorsLayer::permissive());

    Router::new()
        .merge(general)
        .merge(intake::routes())
        .with_state(state)
}
