//! Shared configuration for the trunkdesk CLI and TUI.
//!
//! TOML profiles, session persistence adapters (keyring + JSON file), and
//! translation to `trunkdesk_core::ClientConfig`. Both binaries depend on
//! this crate; the CLI adds flag-aware wrappers on top.

pub mod session_store;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use trunkdesk_core::{ClientConfig, SessionPersistence, TlsVerification};

pub use session_store::{FileSessionStore, KeyringSessionStore};

/// Keyring service name and config directory name.
pub const APP_NAME: &str = "trunkdesk";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("profile '{profile}' not found")]
    UnknownProfile { profile: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration shared by CLI and TUI.
#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// Default profile name.
    pub default_profile: Option<String>,

    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Named server profiles.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_profile: Some("default".into()),
            defaults: Defaults::default(),
            profiles: HashMap::new(),
        }
    }
}

impl Config {
    /// Profile name to use: explicit choice, then `default_profile`, then `"default"`.
    pub fn active_profile_name(&self, explicit: Option<&str>) -> String {
        explicit
            .map(str::to_owned)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| "default".into())
    }

    pub fn profile(&self, name: &str) -> Result<&Profile, ConfigError> {
        self.profiles
            .get(name)
            .ok_or_else(|| ConfigError::UnknownProfile {
                profile: name.into(),
            })
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// A named server profile.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Profile {
    /// Server base URL (e.g., "http://localhost:5000").
    pub server: String,

    /// Username to pre-fill at login.
    pub username: Option<String>,

    /// Where the session token lives between runs: "keyring" or "file".
    #[serde(default = "default_session_store")]
    pub session_store: String,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,

    /// Override timeout (seconds).
    pub timeout: Option<u64>,
}

impl Profile {
    pub fn new(server: impl Into<String>) -> Self {
        Self {
            server: server.into(),
            username: None,
            session_store: default_session_store(),
            ca_cert: None,
            timeout: None,
        }
    }
}

fn default_session_store() -> String {
    "keyring".into()
}

// ── Paths ───────────────────────────────────────────────────────────

/// Resolve the config file path. `TRUNKDESK_CONFIG` wins over the
/// platform config directory.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os("TRUNKDESK_CONFIG") {
        return PathBuf::from(path);
    }
    ProjectDirs::from("com", APP_NAME, APP_NAME).map_or_else(
        || fallback_dir(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Directory for file-backed sessions.
pub fn data_dir() -> PathBuf {
    ProjectDirs::from("com", APP_NAME, APP_NAME).map_or_else(
        || fallback_dir(".local/share"),
        |dirs| dirs.data_dir().to_path_buf(),
    )
}

fn fallback_dir(base: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(base);
    p.push(APP_NAME);
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path, merged with `TRUNKDESK_*` env vars
/// (`__` separates nesting, e.g. `TRUNKDESK_DEFAULTS__TIMEOUT=10`).
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("TRUNKDESK_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation to core types ───────────────────────────────────────

/// Parse and normalize a server URL.
pub fn parse_server_url(raw: &str) -> Result<url::Url, ConfigError> {
    raw.trim().parse().map_err(|_| ConfigError::Validation {
        field: "server".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// Build a `ClientConfig` from a profile, with no flag overrides.
pub fn profile_to_client_config(
    profile: &Profile,
    defaults: &Defaults,
) -> Result<ClientConfig, ConfigError> {
    let base_url = parse_server_url(&profile.server)?;

    let tls = match &profile.ca_cert {
        Some(path) => TlsVerification::CustomCa(path.clone()),
        None => TlsVerification::SystemDefaults,
    };

    Ok(ClientConfig {
        base_url,
        tls,
        timeout: Duration::from_secs(profile.timeout.unwrap_or(defaults.timeout)),
    })
}

/// Pick the session persistence adapter a profile asks for.
pub fn session_store_for(
    profile_name: &str,
    profile: &Profile,
) -> Result<Box<dyn SessionPersistence>, ConfigError> {
    match profile.session_store.as_str() {
        "keyring" => Ok(Box::new(KeyringSessionStore::new(profile_name))),
        "file" => Ok(Box::new(FileSessionStore::for_profile(profile_name))),
        other => Err(ConfigError::Validation {
            field: "session_store".into(),
            reason: format!("expected 'keyring' or 'file', got '{other}'"),
        }),
    }
}
