//! Collaborator traits consumed by the order intake workflow.
//!
//! The mfg module does NOT depend on any specific auth module. It only
//! knows these traits. The concrete implementations are injected at
//! startup time.

use crate::ServiceError;

/// A resolved caller identity.
#[derive(Debug, Clone)]
pub struct Identity {
    /// Opaque user id (JWT `sub`).
    pub id: String,
}

/// Resolves a bearer token to a caller identity.
///
/// Returns `ServiceError::Unauthorized` for invalid or expired tokens.
pub trait IdentityResolver: Send + Sync + 'static {
    fn resolve(&self, token: &str) -> Result<Identity, ServiceError>;
}

/// Maps a user id to the factory (tenant) it belongs to.
///
/// `Ok(None)` means the user has a profile without a factory, or no
/// profile at all.
pub trait TenantStore: Send + Sync + 'static {
    fn factory_for_user(&self, user_id: &str) -> Result<Option<String>, ServiceError>;
}

/// A resolver that accepts any token as the given user. For tests.
pub struct StaticResolver(pub String);

impl IdentityResolver for StaticResolver {
    fn resolve(&self, _token: &str) -> Result<Identity, ServiceError> {
        Ok(Identity { id: self.0.clone() })
    }
}

/// A resolver that rejects every token. For tests.
pub struct RejectAll;

impl IdentityResolver for RejectAll {
    fn resolve(&self, _token: &str) -> Result<Identity, ServiceError> {
        Err(ServiceError::Unauthorized("invalid token".into()))
    }
}

/// A tenant store that returns a fixed factory for every user. For tests.
pub struct StaticTenant(pub Option<String>);

impl TenantStore for StaticTenant {
    fn factory_for_user(&self, _user_id: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.0.clone())
    }
}
