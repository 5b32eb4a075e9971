// ── Session & authorization ──
//
// A session is the token plus the signed-in user. It is the only state
// that survives a restart, stored as one JSON record under a fixed key.

mod manager;
pub mod roles;
mod store;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub use manager::SessionManager;
pub use roles::{MANAGER_ROLE, is_manager, normalize_roles};
pub use store::{FileSessionStore, MemorySessionStore, SESSION_STORAGE_KEY, SessionStore};

/// The signed-in user, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: i64,
    pub email: String,
    /// Normalized: trimmed, upper-cased, never empty strings.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// An authenticated session.
pub struct Session {
    token: SecretString,
    pub user: SessionUser,
}

impl Session {
    pub fn new(token: SecretString, user: SessionUser) -> Self {
        Self { token, user }
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    /// Whether the user holds `ROLE_MANAGER`. Advisory only: the backend
    /// enforces the real permissions.
    pub fn is_manager(&self) -> bool {
        is_manager(&self.user.roles)
    }

    /// Render the persisted record.
    pub fn to_record(&self) -> Result<String, CoreError> {
        serde_json::to_string(&StoredSession {
            token: self.token.expose_secret().to_owned(),
            user: self.user.clone(),
        })
        .map_err(|e| CoreError::Persistence {
            message: format!("cannot encode session: {e}"),
        })
    }

    /// Parse a persisted record. Roles are re-normalized so hand-edited
    /// records obey the same rules as fresh logins.
    pub fn from_record(raw: &str) -> Result<Self, CoreError> {
        let stored: StoredSession =
            serde_json::from_str(raw).map_err(|e| CoreError::Persistence {
                message: format!("cannot decode session: {e}"),
            })?;
        let roles = normalize_roles(&serde_json::Value::from(stored.user.roles));
        Ok(Self {
            token: SecretString::from(stored.token),
            user: SessionUser {
                roles,
                ..stored.user
            },
        })
    }
}

impl Clone for Session {
    fn clone(&self) -> Self {
        Self {
            token: SecretString::from(self.token.expose_secret()),
            user: self.user.clone(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish()
    }
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
    user: SessionUser,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn record_has_documented_shape() {
        let session = Session::new(
            SecretString::from("T"),
            SessionUser {
                id: 1,
                email: "a@b.co".into(),
                roles: vec!["ROLE_MANAGER".into()],
            },
        );
        let raw = session.to_record().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(
            value,
            json!({"token": "T", "user": {"id": 1, "email": "a@b.co", "roles": ["ROLE_MANAGER"]}})
        );

        let back = Session::from_record(&raw).unwrap();
        assert_eq!(back.token().expose_secret(), "T");
        assert!(back.is_manager());
    }

    #[test]
    fn record_roles_are_renormalized() {
        let raw = r#"{"token":"T","user":{"id":2,"email":"x@y.z","roles":[" role_manager ",""]}}"#;
        let session = Session::from_record(raw).unwrap();
        assert_eq!(session.user.roles, vec!["ROLE_MANAGER".to_owned()]);
    }

    #[test]
    fn garbage_record_is_rejected() {
        assert!(Session::from_record("{not json").is_err());
        assert!(Session::from_record(r#"{"token":"T"}"#).is_err());
    }

    #[test]
    fn debug_hides_token() {
        let session = Session::new(
            SecretString::from("super-secret"),
            SessionUser {
                id: 1,
                email: "a@b.co".into(),
                roles: vec![],
            },
        );
        assert!(!format!("{session:?}").contains("super-secret"));
    }
}
