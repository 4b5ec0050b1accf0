// ── Runtime connection configuration ──
//
// Describes where the inventory server lives and how long to wait for it.
// The CLI/TUI build a `ClientConfig` from profiles and flags and hand it
// in; core never reads config files.

use std::path::PathBuf;
use std::time::Duration;

use trunkdesk_api::transport::{DEFAULT_TIMEOUT, TlsMode};
use trunkdesk_api::TransportConfig;
use url::Url;

/// TLS trust for the server's certificate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store.
    #[default]
    SystemDefaults,
    /// Additional CA certificate file (PEM).
    CustomCa(PathBuf),
}

/// Configuration for talking to one inventory server.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server root (e.g. `http://localhost:5000`); `/api/` is appended.
    pub base_url: Url,
    pub tls: TlsVerification,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            tls: TlsVerification::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
            },
            timeout: self.timeout,
        }
    }
}
