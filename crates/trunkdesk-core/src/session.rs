// ── Session store ──
//
// Holds the current bearer token and user for the life of the process and
// mirrors it into a durable `SessionPersistence` adapter. The store is the
// API client's `TokenProvider`, so a login or logout takes effect on the
// very next request.

use std::sync::Arc;

use arc_swap::ArcSwapOption;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use trunkdesk_api::{ApiClient, TokenProvider};

use crate::error::{CoreError, Operation};
use crate::model::{Role, Session, UserIdentity};

// ── Persistence seam ────────────────────────────────────────────────

/// Durable storage for the token + user pair across runs.
///
/// A stored pair is trusted on load: there is no expiry check and no
/// revalidation call. `clear` cannot fail from the caller's point of view.
pub trait SessionPersistence: Send + Sync {
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session) -> Result<(), CoreError>;
    fn clear(&self);
}

/// Process-local persistence; forgets everything on exit.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: ArcSwapOption<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store, as if a previous run had logged in.
    pub fn with_session(session: Session) -> Self {
        Self {
            slot: ArcSwapOption::from_pointee(session),
        }
    }
}

impl SessionPersistence for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.slot.load_full().map(|s| (*s).clone())
    }

    fn save(&self, session: &Session) -> Result<(), CoreError> {
        self.slot.store(Some(Arc::new(session.clone())));
        Ok(())
    }

    fn clear(&self) {
        self.slot.store(None);
    }
}

// ── SessionStore ────────────────────────────────────────────────────

/// The live session, shared between the API client and the view layer.
pub struct SessionStore {
    current: ArcSwapOption<Session>,
    persistence: Box<dyn SessionPersistence>,
}

impl SessionStore {
    pub fn new(persistence: Box<dyn SessionPersistence>) -> Self {
        Self {
            current: ArcSwapOption::empty(),
            persistence,
        }
    }

    /// Store backed only by memory.
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySessionStore::new()))
    }

    /// Load a previously persisted session, if any, and make it current.
    pub fn restore(&self) -> Option<UserIdentity> {
        let session = self.persistence.load()?;
        debug!(username = %session.user.username, role = %session.user.role, "restored session");
        let user = session.user.clone();
        self.current.store(Some(Arc::new(session)));
        Some(user)
    }

    /// Exchange credentials for a token and persist the new session.
    ///
    /// Every failure (wrong password, unknown user, transport) is
    /// `CoreError::Auth`. A persistence failure is logged; the session is
    /// still live for this process.
    pub async fn login(
        &self,
        client: &ApiClient,
        username: &str,
        password: &SecretString,
    ) -> Result<UserIdentity, CoreError> {
        let resp = client
            .login(username, password)
            .await
            .map_err(CoreError::auth)?;

        if resp.token.is_empty() {
            return Err(CoreError::auth(trunkdesk_api::Error::Authentication {
                message: "server returned an empty token".into(),
            }));
        }

        let user = UserIdentity {
            username: resp.username,
            role: Role::from_wire(&resp.role),
        };
        let session = Session::new(resp.token, user.clone());

        if let Err(e) = self.persistence.save(&session) {
            warn!(error = %e, "session could not be persisted");
        }
        self.current.store(Some(Arc::new(session)));

        info!(username = %user.username, role = %user.role, "logged in");
        Ok(user)
    }

    /// Forget the session here and in durable storage.
    pub fn clear(&self) {
        self.current.store(None);
        self.persistence.clear();
        debug!("session cleared");
    }

    pub fn current(&self) -> Option<Arc<Session>> {
        self.current.load_full()
    }

    pub fn user(&self) -> Option<UserIdentity> {
        self.current.load().as_ref().map(|s| s.user.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.load().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current.load().as_ref().is_some_and(|s| s.user.is_admin())
    }

    /// Gate for create/update/delete.
    pub fn require_admin(&self, operation: Operation) -> Result<UserIdentity, CoreError> {
        let user = self.user().ok_or(CoreError::NotAuthenticated)?;
        if user.is_admin() {
            Ok(user)
        } else {
            Err(CoreError::PermissionDenied { operation })
        }
    }
}

impl TokenProvider for SessionStore {
    fn bearer_token(&self) -> Option<SecretString> {
        self.current
            .load()
            .as_ref()
            .map(|s| SecretString::from(s.token.expose_secret().to_owned()))
    }
}
