//! CLI configuration: thin wrapper around `trunkdesk_config` shared types.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (`--profile`, `--server`, `--timeout`).

use trunkdesk_core::ClientConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use trunkdesk_config::{
    Config, Profile, config_path, load_config_or_default, save_config,
};

/// A profile resolved against flags, ready to build an `Inventory`.
#[derive(Debug)]
pub struct Resolved {
    pub name: String,
    pub profile: Profile,
    pub client: ClientConfig,
}

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    config.active_profile_name(global.profile.as_deref())
}

/// Pick the profile and apply flag overrides.
///
/// `--server` alone is enough to run without a config file; the ad-hoc
/// profile then keeps its session in the data-dir file store under the
/// resolved profile name.
pub fn resolve(global: &GlobalOpts, config: &Config) -> Result<Resolved, CliError> {
    let name = active_profile_name(global, config);

    let mut profile = match (config.profiles.get(&name), &global.server) {
        (Some(profile), _) => profile.clone(),
        (None, Some(server)) => {
            let mut adhoc = Profile::new(server.clone());
            adhoc.session_store = "file".into();
            adhoc
        }
        (None, None) if global.profile.is_some() || !config.profiles.is_empty() => {
            let mut available: Vec<_> = config.profiles.keys().cloned().collect();
            available.sort();
            return Err(CliError::ProfileNotFound {
                name,
                available: if available.is_empty() {
                    "(none)".into()
                } else {
                    available.join(", ")
                },
            });
        }
        (None, None) => {
            return Err(CliError::NoConfig {
                path: config_path().display().to_string(),
            });
        }
    };

    if let Some(server) = &global.server {
        profile.server.clone_from(server);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let client = trunkdesk_config::profile_to_client_config(&profile, &config.defaults)?;

    Ok(Resolved {
        name,
        profile,
        client,
    })
}
