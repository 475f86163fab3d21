use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use tracing::info;

use factoryerp_core::{ListParams, ListResult, merge_patch, new_id, now_rfc3339};
use factoryerp_sql::Value;

use crate::model::{CreateUser, User};
use crate::service::{AuthError, AuthService};

/// Well-known email of the root superuser seeded from server config.
pub const ROOT_EMAIL: &str = "root@factoryerp.local";

impl AuthService {
    /// Create a new user with an argon2id-hashed password.
    pub fn create_user(&self, input: CreateUser) -> Result<User, AuthError> {
        if input.email.trim().is_empty() {
            return Err(AuthError::Validation("email is required".into()));
        }
        if input.password.len() < 8 {
            return Err(AuthError::Validation(
                "password must be at least 8 characters".into(),
            ));
        }

        let hash = hash_password(&input.password)?;
        let now = now_rfc3339();
        let user = User {
            id: new_id(),
            name: input.name,
            email: input.email,
            password_hash: hash.clone(),
            active: true,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        self.insert_record(
            "users",
            "id",
            &user.id,
            &user,
            &[
                ("name", Value::Text(user.name.clone())),
                ("email", Value::Text(user.email.clone())),
                ("password_hash", Value::Text(hash)),
                ("active", Value::Integer(1)),
                ("created_at", Value::Text(now.clone())),
                ("updated_at", Value::Text(now)),
            ],
        )?;
        Ok(user)
    }

    /// Get a user by id. The password hash is not populated.
    pub fn get_user(&self, id: &str) -> Result<User, AuthError> {
        self.get_record("users", "id", id)
    }

    /// Look up a user by email along with the stored password hash.
    /// Used by login; the hash lives only in its own column.
    pub(crate) fn find_user_for_login(&self, email: &str) -> Result<User, AuthError> {
        let rows = self
            .sql
            .query(
                "SELECT data, password_hash FROM users WHERE email = ?1 AND active = 1",
                &[Value::Text(email.to_string())],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        let row = rows
            .first()
            .ok_or_else(|| AuthError::Unauthorized("invalid credentials".into()))?;
        let data = row
            .get_str("data")
            .ok_or_else(|| AuthError::Internal("missing data column".into()))?;
        let mut user: User =
            serde_json::from_str(data).map_err(|e| AuthError::Internal(e.to_string()))?;
        user.password_hash = row.get_str("password_hash").unwrap_or_default().to_string();
        Ok(user)
    }

    /// Ensure the root user exists with the given argon2id hash.
    ///
    /// Called by the server binary at startup. The hash comes from the
    /// server configuration, never from a request; if the configured
    /// hash changed, the stored one is replaced.
    pub fn ensure_root(&self, password_hash: &str) -> Result<User, AuthError> {
        match self.find_user_for_login(ROOT_EMAIL) {
            Ok(mut user) => {
                if user.password_hash != password_hash {
                    info!("root password hash changed in config, updating stored hash");
                    self.sql
                        .exec(
                            "UPDATE users SET password_hash = ?1 WHERE id = ?2",
                            &[
                                Value::Text(password_hash.to_string()),
                                Value::Text(user.id.clone()),
                            ],
                        )
                        .map_err(|e| AuthError::Storage(e.to_string()))?;
                }
                user.password_hash = String::new();
                Ok(user)
            }
            Err(AuthError::Unauthorized(_)) => {
                info!(email = ROOT_EMAIL, "seeding root user");
                let now = now_rfc3339();
                let user = User {
                    id: new_id(),
                    name: "root".to_string(),
                    email: ROOT_EMAIL.to_string(),
                    password_hash: String::new(),
                    active: true,
                    created_at: now.clone(),
                    updated_at: now.clone(),
                };
                self.insert_record(
                    "users",
                    "id",
                    &user.id,
                    &user,
                    &[
                        ("name", Value::Text(user.name.clone())),
                        ("email", Value::Text(user.email.clone())),
                        ("password_hash", Value::Text(password_hash.to_string())),
                        ("active", Value::Integer(1)),
                        ("created_at", Value::Text(now.clone())),
                        ("updated_at", Value::Text(now)),
                    ],
                )?;
                Ok(user)
            }
            Err(e) => Err(e),
        }
    }

    /// List users with pagination.
    pub fn list_users(&self, params: &ListParams) -> Result<ListResult<User>, AuthError> {
        let (items, total) = self.list_records("users", params.limit, params.offset)?;
        Ok(ListResult { items, total })
    }

    /// Update a user with JSON merge-patch semantics.
    /// The password cannot be changed through this path.
    pub fn update_user(&self, id: &str, patch: serde_json::Value) -> Result<User, AuthError> {
        let current: User = self.get_record("users", "id", id)?;
        let now = now_rfc3339();

        let mut base =
            serde_json::to_value(&current).map_err(|e| AuthError::Internal(e.to_string()))?;
        let mut patch = patch;
        if let Some(obj) = patch.as_object_mut() {
            obj.remove("id");
            obj.remove("password_hash");
            obj.remove("created_at");
        }
        merge_patch(&mut base, &patch);
        base["updated_at"] = serde_json::json!(now);

        let updated: User =
            serde_json::from_value(base).map_err(|e| AuthError::Internal(e.to_string()))?;

        self.update_record(
            "users",
            "id",
            id,
            &updated,
            &[
                ("name", Value::Text(updated.name.clone())),
                ("email", Value::Text(updated.email.clone())),
                ("active", Value::Integer(if updated.active { 1 } else { 0 })),
                ("updated_at", Value::Text(now)),
            ],
        )?;
        Ok(updated)
    }

    /// Delete a user and its sessions and profile.
    pub fn delete_user(&self, id: &str) -> Result<(), AuthError> {
        self.sql
            .exec(
                "DELETE FROM sessions WHERE user_id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        self.sql
            .exec(
                "DELETE FROM profiles WHERE user_id = ?1",
                &[Value::Text(id.to_string())],
            )
            .map_err(|e| AuthError::Storage(e.to_string()))?;
        self.delete_record("users", "id", id)
    }
}

/// Hash a password with argon2id and a fresh random salt.
pub(crate) fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Internal(format!("password hashing failed: {}", e)))
}

/// Verify a password against a stored argon2id hash.
pub(crate) fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::AuthConfig;
    use factoryerp_sql::SqliteStore;

    fn test_service() -> std::sync::Arc<AuthService> {
        let sql = std::sync::Arc::new(SqliteStore::open_in_memory().unwrap());
        AuthService::new(sql, AuthConfig::default()).unwrap()
    }

    #[test]
    fn test_user_crud() {
        let svc = test_service();

        // Create
        let user = svc
            .create_user(CreateUser {
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password: "correct horse".to_string(),
            })
            .unwrap();
        assert_eq!(user.name, "Alice");
        assert!(user.active);

        // Get
        let fetched = svc.get_user(&user.id).unwrap();
        assert_eq!(fetched.email, "alice@example.com");
        assert!(fetched.password_hash.is_empty());

        // Update
        let updated = svc
            .update_user(&user.id, serde_json::json!({"name": "Alice W."}))
            .unwrap();
        assert_eq!(updated.name, "Alice W.");
        assert_eq!(updated.id, user.id);

        // List
        let list = svc.list_users(&ListParams::default()).unwrap();
        assert_eq!(list.total, 1);
        assert_eq!(list.items[0].name, "Alice W.");

        // Delete
        svc.delete_user(&user.id).unwrap();
        assert!(svc.get_user(&user.id).is_err());
    }

    #[test]
    fn test_duplicate_email_conflicts() {
        let svc = test_service();
        let input = CreateUser {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "correct horse".to_string(),
        };
        svc.create_user(input.clone()).unwrap();
        let err = svc.create_user(input).unwrap_err();
        assert!(matches!(err, AuthError::Conflict(_)));
    }

    #[test]
    fn test_short_password_rejected() {
        let svc = test_service();
        let err = svc
            .create_user(CreateUser {
                name: "Bob".to_string(),
                email: "bob@example.com".to_string(),
                password: "short".to_string(),
            })
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[test]
    fn test_ensure_root_is_idempotent() {
        let svc = test_service();
        let hash = hash_password("root password").unwrap();

        let root = svc.ensure_root(&hash).unwrap();
        assert_eq!(root.email, ROOT_EMAIL);

        // Second call finds the same user instead of creating another.
        let again = svc.ensure_root(&hash).unwrap();
        assert_eq!(again.id, root.id);

        // And the root can actually log in with the configured password.
        let found = svc.find_user_for_login(ROOT_EMAIL).unwrap();
        assert!(verify_password("root password", &found.password_hash));
    }

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("correct horse", "not-a-hash"));
    }
}
