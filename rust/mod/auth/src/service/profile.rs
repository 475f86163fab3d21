use factoryerp_core::now_rfc3339;
use factoryerp_sql::Value;

use crate::model::{Profile, SetProfile};
use crate::service::{AuthError, AuthService};

impl AuthService {
    /// Create or replace the profile for a user.
    pub fn set_profile(&self, user_id: &str, input: SetProfile) -> Result<Profile, AuthError> {
        // The user must exist.
        let _ = self.get_user(user_id)?;

        let now = now_rfc3339();
        let existing = match self.get_profile(user_id) {
            Ok(p) => Some(p),
            Err(AuthError::NotFound(_)) => None,
            Err(e) => return Err(e),
        };

        let profile = Profile {
            user_id: user_id.to_string(),
            factory_id: input.factory_id,
            role: input.role,
            created_at: existing
                .as_ref()
                .map(|p| p.created_at.clone())
                .unwrap_or_else(|| now.clone()),
            updated_at: now.clone(),
        };

        let indexes: Vec<(&str, Value)> = vec![
            (
                "factory_id",
                match &profile.factory_id {
                    Some(f) => Value::Text(f.clone()),
                    None => Value::Null,
                },
            ),
            ("role", Value::Text(profile.role.clone())),
            ("created_at", Value::Text(profile.created_at.clone())),
            ("updated_at", Value::Text(now)),
        ];

        if existing.is_some() {
            self.update_record("profiles", "user_id", user_id, &profile, &indexes)?;
        } else {
            self.insert_record("profiles", "user_id", user_id, &profile, &indexes)?;
        }
        Ok(profile)
    }

    /// Get the profile for a user.
    pub fn get_profile(&self, user_id: &str) -> Result<Profile, AuthError> {
        self.get_record("profiles", "user_id", user_id)
    }

    /// Resolve the factory a user belongs to. `Ok(None)` when the user
    /// has no profile or the profile carries no factory.
    pub fn factory_for_user(&self, user_id: &str) -> Result<Option<String>, AuthError> {
        match self.get_profile(user_id) {
            Ok(profile) => Ok(profile.factory_id),
            Err(AuthError::NotFound(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CreateUser;
    use crate::service::AuthConfig;
    use factoryerp_sql::SqliteStore;

    fn test_service() -> std::sync::Arc<AuthService> {
        let sql = std::sync::Arc::new(SqliteStore::open_in_memory().unwrap());
        AuthService::new(sql, AuthConfig::default()).unwrap()
    }

    fn test_user(svc: &AuthService) -> String {
        svc.create_user(CreateUser {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "correct horse".to_string(),
        })
        .unwrap()
        .id
    }

    #[test]
    fn test_profile_mapping() {
        let svc = test_service();
        let user_id = test_user(&svc);

        // No profile yet.
        assert_eq!(svc.factory_for_user(&user_id).unwrap(), None);

        // Profile without a factory.
        svc.set_profile(
            &user_id,
            SetProfile {
                factory_id: None,
                role: "owner".to_string(),
            },
        )
        .unwrap();
        assert_eq!(svc.factory_for_user(&user_id).unwrap(), None);

        // Attach a factory.
        let profile = svc
            .set_profile(
                &user_id,
                SetProfile {
                    factory_id: Some("f1".to_string()),
                    role: "owner".to_string(),
                },
            )
            .unwrap();
        assert_eq!(profile.factory_id.as_deref(), Some("f1"));
        assert_eq!(svc.factory_for_user(&user_id).unwrap(), Some("f1".to_string()));
    }

    #[test]
    fn test_profile_requires_user() {
        let svc = test_service();
        let err = svc
            .set_profile(
                "missing",
                SetProfile {
                    factory_id: None,
                    role: "worker".to_string(),
                },
            )
            .unwrap_err();
        assert!(matches!(err, AuthError::NotFound(_)));
    }
}
