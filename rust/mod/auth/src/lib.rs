pub mod api;
pub mod collaborators;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;
use factoryerp_core::Module;

use service::AuthService;

/// Auth module — users, profiles, sessions, JWT login.
pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    pub fn new(service: Arc<AuthService>) -> Self {
        Self { service }
    }

    /// The underlying service, for injection into other modules as
    /// IdentityResolver / TenantStore.
    pub fn service(&self) -> Arc<AuthService> {
        self.service.clone()
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
