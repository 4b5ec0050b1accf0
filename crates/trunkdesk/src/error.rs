//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` variants into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use trunkdesk_config::ConfigError;
use trunkdesk_core::CoreError;

use crate::cli::command_name;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const NOT_FOUND: i32 = 4;
    pub const PERMISSION: i32 = 5;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the inventory server")]
    #[diagnostic(
        code(trunkdesk::connection_failed),
        help(
            "Check that the server is running and accessible.\n\
             Reason: {reason}\n\
             Override the URL with --server or edit the profile: trunkdesk config init"
        )
    )]
    ConnectionFailed { reason: String },

    // ── Authentication ───────────────────────────────────────────────
    #[error("Invalid credentials")]
    #[diagnostic(
        code(trunkdesk::auth_failed),
        help("Check the username and password, then run: trunkdesk login")
    )]
    AuthFailed,

    #[error("Not logged in")]
    #[diagnostic(code(trunkdesk::not_logged_in), help("Run: trunkdesk login"))]
    NotLoggedIn,

    #[error("Session rejected by the server")]
    #[diagnostic(
        code(trunkdesk::session_expired),
        help("The stored token is no longer valid. Run: trunkdesk login")
    )]
    SessionExpired,

    #[error("Admin access required to {operation} records")]
    #[diagnostic(
        code(trunkdesk::permission_denied),
        help("Your account is read-only. Log in as an admin user to make changes.")
    )]
    PermissionDenied { operation: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(trunkdesk::not_found),
        help("Run: trunkdesk {list_command} to see available records")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── API ──────────────────────────────────────────────────────────
    #[error("{summary}")]
    #[diagnostic(code(trunkdesk::api_error), help("{detail}"))]
    ApiError { summary: String, detail: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(trunkdesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(trunkdesk::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: trunkdesk config init"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("No server configured")]
    #[diagnostic(
        code(trunkdesk::no_config),
        help(
            "Create a profile with: trunkdesk config init\n\
             Or pass --server. Expected config at: {path}"
        )
    )]
    NoConfig { path: String },

    #[error(transparent)]
    #[diagnostic(code(trunkdesk::config))]
    Config(#[from] ConfigError),

    #[error("Session storage failed: {message}")]
    #[diagnostic(
        code(trunkdesk::session_storage),
        help("Set session_store = \"file\" in the profile if no system keyring is available.")
    )]
    SessionStorage { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(trunkdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Could not render output: {0}")]
    #[diagnostic(code(trunkdesk::render))]
    Render(String),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed | Self::NotLoggedIn | Self::SessionExpired => exit_code::AUTH,
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::PermissionDenied { .. } => exit_code::PERMISSION,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        if err.is_session_expired() && !matches!(err, CoreError::NotAuthenticated) {
            return Self::SessionExpired;
        }

        match err {
            CoreError::Auth { source } => {
                if source.is_connection() {
                    Self::ConnectionFailed {
                        reason: source.to_string(),
                    }
                } else {
                    Self::AuthFailed
                }
            }

            CoreError::NotAuthenticated => Self::NotLoggedIn,

            CoreError::PermissionDenied { operation } => Self::PermissionDenied {
                operation: operation.to_string(),
            },

            CoreError::Load { ref source }
            | CoreError::Save { ref source }
            | CoreError::Delete { ref source } => {
                if source.is_connection() {
                    Self::ConnectionFailed {
                        reason: source.to_string(),
                    }
                } else if source.status() == Some(403) {
                    Self::PermissionDenied {
                        operation: operation_of(&err).into(),
                    }
                } else {
                    Self::ApiError {
                        summary: err.banner().into(),
                        detail: source.to_string(),
                    }
                }
            }

            CoreError::NotFound { kind, id } => Self::NotFound {
                resource_type: kind.singular().into(),
                identifier: id.to_string(),
                list_command: format!("{} list", command_name(kind)),
            },

            CoreError::Validation { field, reason } => Self::Validation { field, reason },

            CoreError::Persistence { message } => Self::SessionStorage { message },

            CoreError::Config { message } => Self::Validation {
                field: "server".into(),
                reason: message,
            },
        }
    }
}

fn operation_of(err: &CoreError) -> &'static str {
    match err {
        CoreError::Save { .. } => "save",
        CoreError::Delete { .. } => "delete",
        _ => "load",
    }
}
