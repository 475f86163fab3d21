//! IdentityResolver / TenantStore implementations backed by AuthService.
//!
//! The mfg module consumes these traits without depending on this crate;
//! the binary injects the concrete service at startup.

use factoryerp_core::{Identity, IdentityResolver, ServiceError, TenantStore};

use crate::service::AuthService;

impl IdentityResolver for AuthService {
    fn resolve(&self, token: &str) -> Result<Identity, ServiceError> {
        let claims = self.verify_token(token).map_err(ServiceError::from)?;
        Ok(Identity { id: claims.sub })
    }
}

impl TenantStore for AuthService {
    fn factory_for_user(&self, user_id: &str) -> Result<Option<String>, ServiceError> {
        AuthService::factory_for_user(self, user_id).map_err(ServiceError::from)
    }
}
