pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;
use factoryerp_core::{IdentityResolver, Module, TenantStore};

use api::MfgState;
use service::MfgService;

/// Mfg module — factories, orders, production lots, materials, and the
/// order intake & production initiation workflow.
pub struct MfgModule {
    state: api::AppState,
}

impl MfgModule {
    /// The identity resolver and tenant store are injected so that this
    /// module stays independent of any specific auth implementation.
    pub fn new(
        service: Arc<MfgService>,
        identity: Arc<dyn IdentityResolver>,
        tenants: Arc<dyn TenantStore>,
    ) -> Self {
        Self {
            state: Arc::new(MfgState {
                service,
                identity,
                tenants,
            }),
        }
    }
}

impl Module for MfgModule {
    fn name(&self) -> &str {
        "mfg"
    }

    fn routes(&self) -> Router {
        api::build_router(self.state.clone())
    }
}
