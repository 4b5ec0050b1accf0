// ── Authenticated user ──

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Authorization level returned at login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// Map the server's role string. Anything other than `admin` is read-only.
    pub fn from_wire(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("admin") {
            Self::Admin
        } else {
            Self::User
        }
    }
}

/// Who is logged in. Persisted next to the token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserIdentity {
    pub username: String,
    pub role: Role,
}

impl UserIdentity {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A bearer token together with the user it was issued to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: SecretString,
    pub user: UserIdentity,
}

impl Session {
    pub fn new(token: impl Into<String>, user: UserIdentity) -> Self {
        Self {
            token: SecretString::from(token.into()),
            user,
        }
    }
}
