// ── Session manager ──
//
// Owns the in-memory session, its persisted record, and the bearer
// credential on the shared `ApiClient`. All three change together.

use std::sync::Arc;

use cobox_api::ApiClient;
use cobox_api::models::SignInRequest;
use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::roles::normalize_roles;
use super::store::SessionStore;
use super::{Session, SessionUser};
use crate::error::CoreError;

/// Session lifecycle: restore, login, logout.
///
/// Observers subscribe via [`subscribe()`](Self::subscribe). The HTTP
/// credential is always updated before a new state is published, so an
/// observer reacting to a login can issue authenticated requests
/// immediately.
pub struct SessionManager {
    api: Arc<ApiClient>,
    store: Arc<dyn SessionStore>,
    state: watch::Sender<Option<Arc<Session>>>,
}

impl SessionManager {
    pub fn new(api: Arc<ApiClient>, store: Arc<dyn SessionStore>) -> Self {
        let (state, _) = watch::channel(None);
        Self { api, store, state }
    }

    /// Load the persisted session, if any.
    ///
    /// A missing or unreadable record means logged out; this never fails.
    pub fn restore(&self) -> Option<Arc<Session>> {
        let raw = match self.store.load() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no persisted session");
                return None;
            }
            Err(e) => {
                warn!(error = %e, "could not read persisted session");
                return None;
            }
        };

        match Session::from_record(&raw) {
            Ok(session) => {
                let session = Arc::new(session);
                self.publish(Some(Arc::clone(&session)));
                debug!(user = %session.user.email, "restored session");
                Some(session)
            }
            Err(e) => {
                warn!(error = %e, "ignoring unreadable persisted session");
                None
            }
        }
    }

    /// Sign in and persist the resulting session.
    ///
    /// On failure nothing is persisted and the current state is unchanged.
    pub async fn login(
        &self,
        email: &str,
        password: SecretString,
    ) -> Result<Arc<Session>, CoreError> {
        let req = SignInRequest {
            email: email.to_owned(),
            password,
        };
        let resp = self.api.sign_in(&req).await?;

        let session = Arc::new(Session::new(
            SecretString::from(resp.token),
            SessionUser {
                id: resp.id,
                email: resp.email,
                roles: normalize_roles(&resp.roles),
            },
        ));
        self.store.save(&session.to_record()?)?;
        self.publish(Some(Arc::clone(&session)));

        info!(user = %session.user.email, manager = session.is_manager(), "signed in");
        Ok(session)
    }

    /// Drop the session everywhere. Removing the persisted record is best
    /// effort: a failure is logged, the in-memory state is still cleared.
    pub fn logout(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "could not remove persisted session");
        }
        self.publish(None);
        info!("signed out");
    }

    /// Current session, if signed in.
    pub fn current(&self) -> Option<Arc<Session>> {
        self.state.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Whether the current user holds the manager role.
    pub fn is_manager(&self) -> bool {
        self.state.borrow().as_ref().is_some_and(|s| s.is_manager())
    }

    /// Watch session changes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Session>>> {
        self.state.subscribe()
    }

    fn publish(&self, session: Option<Arc<Session>>) {
        self.api.set_token(
            session
                .as_ref()
                .map(|s| SecretString::from(s.token().expose_secret())),
        );
        self.state.send_replace(session);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::session::MemorySessionStore;
    use cobox_api::TransportConfig;

    fn manager_with(store: Arc<dyn SessionStore>) -> SessionManager {
        let api = Arc::new(
            ApiClient::new("http://127.0.0.1:9", &TransportConfig::default()).unwrap(),
        );
        SessionManager::new(api, store)
    }

    #[test]
    fn restore_attaches_token() {
        let store = Arc::new(MemorySessionStore::with_record(
            r#"{"token":"T","user":{"id":1,"email":"a@b.co","roles":["ROLE_MANAGER"]}}"#,
        ));
        let mgr = manager_with(store);
        let session = mgr.restore().unwrap();
        assert_eq!(session.user.id, 1);
        assert!(mgr.is_manager());
        assert!(mgr.api.has_token());
    }

    #[test]
    fn corrupt_record_means_logged_out() {
        let store = Arc::new(MemorySessionStore::with_record("{oops"));
        let mgr = manager_with(store);
        assert!(mgr.restore().is_none());
        assert!(!mgr.is_authenticated());
        assert!(!mgr.api.has_token());
    }

    #[test]
    fn logout_clears_everything() {
        let store = Arc::new(MemorySessionStore::with_record(
            r#"{"token":"T","user":{"id":1,"email":"a@b.co","roles":[]}}"#,
        ));
        let mgr = manager_with(store.clone());
        let mut rx = mgr.subscribe();
        mgr.restore().unwrap();
        assert!(rx.has_changed().unwrap());
        rx.borrow_and_update();

        mgr.logout();
        assert!(rx.has_changed().unwrap());
        assert!(mgr.current().is_none());
        assert!(!mgr.api.has_token());
        assert_eq!(store.load().unwrap(), None);
    }
}
