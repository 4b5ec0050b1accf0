// Durable session adapters.
//
// Keyring: two entries per profile under the "trunkdesk" service,
// `<profile>/token` (the bearer token) and `<profile>/user` (JSON
// `{"username","role"}`). File: one JSON document per profile under the
// platform data dir, for hosts without a secret service.

use std::io::Write;
use std::path::{Path, PathBuf};

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use trunkdesk_core::{CoreError, Session, SessionPersistence, UserIdentity};

use crate::APP_NAME;

// ── Keyring ─────────────────────────────────────────────────────────

pub struct KeyringSessionStore {
    profile: String,
}

impl KeyringSessionStore {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
        }
    }

    fn entry(&self, slot: &str) -> Result<keyring::Entry, keyring::Error> {
        keyring::Entry::new(APP_NAME, &format!("{}/{slot}", self.profile))
    }
}

fn persistence_error(context: &str, err: impl std::fmt::Display) -> CoreError {
    CoreError::Persistence {
        message: format!("{context}: {err}"),
    }
}

impl SessionPersistence for KeyringSessionStore {
    fn load(&self) -> Option<Session> {
        let token = self.entry("token").ok()?.get_password().ok()?;
        let user_json = self.entry("user").ok()?.get_password().ok()?;
        let user: UserIdentity = match serde_json::from_str(&user_json) {
            Ok(user) => user,
            Err(e) => {
                warn!(profile = %self.profile, error = %e, "ignoring unreadable keyring session");
                return None;
            }
        };
        debug!(profile = %self.profile, "session loaded from keyring");
        Some(Session::new(token, user))
    }

    fn save(&self, session: &Session) -> Result<(), CoreError> {
        let user_json =
            serde_json::to_string(&session.user).map_err(|e| persistence_error("encode user", e))?;
        self.entry("token")
            .and_then(|e| e.set_password(session.token.expose_secret()))
            .map_err(|e| persistence_error("keyring token", e))?;
        self.entry("user")
            .and_then(|e| e.set_password(&user_json))
            .map_err(|e| persistence_error("keyring user", e))?;
        Ok(())
    }

    fn clear(&self) {
        for slot in ["token", "user"] {
            if let Ok(entry) = self.entry(slot) {
                match entry.delete_credential() {
                    Ok(()) | Err(keyring::Error::NoEntry) => {}
                    Err(e) => warn!(profile = %self.profile, slot, error = %e, "keyring delete failed"),
                }
            }
        }
    }
}

// ── File ────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
    user: UserIdentity,
}

pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data dir>/sessions/<profile>.json`
    pub fn for_profile(profile: &str) -> Self {
        Self::new(crate::data_dir().join("sessions").join(format!("{profile}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, contents: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        file.write_all(contents.as_bytes())
    }
}

impl SessionPersistence for FileSessionStore {
    fn load(&self) -> Option<Session> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str::<StoredSession>(&raw) {
            Ok(stored) => Some(Session::new(stored.token, stored.user)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring unreadable session file");
                None
            }
        }
    }

    fn save(&self, session: &Session) -> Result<(), CoreError> {
        let stored = StoredSession {
            token: session.token.expose_secret().to_owned(),
            user: session.user.clone(),
        };
        let json = serde_json::to_string_pretty(&stored)
            .map_err(|e| persistence_error("encode session", e))?;
        self.write(&json)
            .map_err(|e| persistence_error(&self.path.display().to_string(), e))
    }

    fn clear(&self) {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %self.path.display(), error = %e, "session file delete failed"),
        }
    }
}
