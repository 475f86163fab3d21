use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::warn;

use factoryerp_core::new_id;
use factoryerp_sql::Value;

use crate::model::{Claims, Session, TokenResponse, User};
use crate::service::user::verify_password;
use crate::service::{AuthError, AuthService};

impl AuthService {
    /// Verify credentials and issue a JWT access token.
    pub fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AuthError> {
        let user = self.find_user_for_login(email).map_err(|e| {
            warn!(email, "login rejected: unknown user");
            e
        })?;
        if !verify_password(password, &user.password_hash) {
            warn!(email, "login rejected: bad credentials");
            return Err(AuthError::Unauthorized("invalid credentials".into()));
        }
        self.issue_token(&user)
    }

    /// Issue a JWT access token for a user, recording a session.
    pub fn issue_token(&self, user: &User) -> Result<TokenResponse, AuthError> {
        let session_id = new_id();
        let now = chrono::Utc::now();
        let exp = now + chrono::Duration::seconds(self.config.access_token_ttl);

        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            sid: session_id.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let access_token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("JWT encode failed: {}", e)))?;

        let session = Session {
            id: session_id,
            user_id: user.id.clone(),
            issued_at: now.to_rfc3339(),
            expires_at: exp.to_rfc3339(),
            revoked: false,
        };

        self.insert_record(
            "sessions",
            "id",
            &session.id,
            &session,
            &[
                ("user_id", Value::Text(session.user_id.clone())),
                ("revoked", Value::Integer(0)),
                ("issued_at", Value::Text(session.issued_at.clone())),
                ("expires_at", Value::Text(session.expires_at.clone())),
            ],
        )?;

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_ttl,
        })
    }

    /// Verify and decode a JWT access token.
    /// Returns the claims if valid and the session is not revoked.
    pub fn verify_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AuthError::Unauthorized(format!("invalid token: {}", e)))?;

        let claims = token_data.claims;

        // Check if session is revoked
        if let Ok(session) = self.get_record::<Session>("sessions", "id", &claims.sid) {
            if session.revoked {
                return Err(AuthError::Unauthorized("session has been revoked".into()));
            }
        }

        Ok(claims)
    }

    /// Revoke a session so its token stops validating.
    pub fn revoke_session(&self, session_id: &str) -> Result<(), AuthError> {
        let mut session: Session = self.get_record("sessions", "id", session_id)?;
        session.revoked = true;
        self.update_record(
            "sessions",
            "id",
            session_id,
            &session,
            &[("revoked", Value::Integer(1))],
        )
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

    fn test_user(svc: &AuthService) -> User {
        svc.create_user(CreateUser {
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "correct horse".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_login_and_verify() {
        let svc = test_service();
        let user = test_user(&svc);

        let token = svc.login("alice@example.com", "correct horse").unwrap();
        assert_eq!(token.token_type, "Bearer");

        let claims = svc.verify_token(&token.access_token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(claims.name, "Alice");
    }

    #[test]
    fn test_login_wrong_password() {
        let svc = test_service();
        test_user(&svc);

        let err = svc.login("alice@example.com", "wrong").unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(_)));
    }

    #[test]
    fn test_login_unknown_email() {
        let svc = test_service();
        let err = svc.login("nobody@example.com", "whatever").unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(_)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        let svc = test_service();
        assert!(svc.verify_token("not-a-jwt").is_err());
    }

    #[test]
    fn test_revoked_session_rejected() {
        let svc = test_service();
        test_user(&svc);

        let token = svc.login("alice@example.com", "correct horse").unwrap();
        let claims = svc.verify_token(&token.access_token).unwrap();

        svc.revoke_session(&claims.sid).unwrap();
        let err = svc.verify_token(&token.access_token).unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized(_)));
    }
}
