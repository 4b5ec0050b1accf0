// ── Core error types ──
//
// Every network failure is filed under the operation that caused it
// (login, load, save, delete) and keeps the transport error as its source.
// Operators see the collapsed `banner()` text; the full chain only goes to
// the tracing log.

use thiserror::Error;

use crate::model::{EntityKind, RecordId};

/// The mutating or reading operation an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Operation {
    Load,
    Save,
    Delete,
}

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Session errors ───────────────────────────────────────────────
    #[error("Invalid credentials")]
    Auth {
        #[source]
        source: trunkdesk_api::Error,
    },

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Admin access required to {operation} records")]
    PermissionDenied { operation: Operation },

    // ── Request errors ───────────────────────────────────────────────
    #[error("Failed to load data")]
    Load {
        #[source]
        source: trunkdesk_api::Error,
    },

    #[error("Failed to save data")]
    Save {
        #[source]
        source: trunkdesk_api::Error,
    },

    #[error("Failed to delete item")]
    Delete {
        #[source]
        source: trunkdesk_api::Error,
    },

    // ── Data errors ──────────────────────────────────────────────────
    #[error("{kind} {id} not found")]
    NotFound { kind: EntityKind, id: RecordId },

    #[error("Invalid value for {field}: {reason}")]
    Validation { field: String, reason: String },

    // ── Local errors ─────────────────────────────────────────────────
    #[error("Session storage error: {message}")]
    Persistence { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    pub fn auth(source: trunkdesk_api::Error) -> Self {
        Self::Auth { source }
    }

    pub fn load(source: trunkdesk_api::Error) -> Self {
        Self::Load { source }
    }

    pub fn save(source: trunkdesk_api::Error) -> Self {
        Self::Save { source }
    }

    pub fn delete(source: trunkdesk_api::Error) -> Self {
        Self::Delete { source }
    }

    /// The flat, operator-facing message for this error.
    ///
    /// All failures collapse onto the four messages of the inventory UI:
    /// validation, authorization, and transport causes are not
    /// distinguished here. Use the `Display`/`source()` chain for detail.
    pub fn banner(&self) -> &'static str {
        match self {
            Self::Auth { .. } => "Invalid credentials",
            Self::Save { .. }
            | Self::Validation { .. }
            | Self::Persistence { .. }
            | Self::PermissionDenied {
                operation: Operation::Save,
            } => "Failed to save data",
            Self::Delete { .. }
            | Self::PermissionDenied {
                operation: Operation::Delete,
            } => "Failed to delete item",
            Self::Load { .. }
            | Self::NotAuthenticated
            | Self::NotFound { .. }
            | Self::Config { .. }
            | Self::PermissionDenied {
                operation: Operation::Load,
            } => "Failed to load data",
        }
    }

    /// The transport error behind a request failure, if any.
    pub fn api_source(&self) -> Option<&trunkdesk_api::Error> {
        match self {
            Self::Auth { source }
            | Self::Load { source }
            | Self::Save { source }
            | Self::Delete { source } => Some(source),
            _ => None,
        }
    }

    /// Returns `true` if the server rejected the stored token.
    pub fn is_session_expired(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
            || self
                .api_source()
                .is_some_and(trunkdesk_api::Error::is_auth_expired)
    }
}
