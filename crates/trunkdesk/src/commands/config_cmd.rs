//! Config subcommand handlers.

use dialoguer::{Input, Select};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config::{self, Config, Profile};
use crate::error::CliError;
use crate::output;

use super::util::prompt_err;

const SESSION_STORES: [&str; 2] = ["keyring", "file"];

// ── Helpers ─────────────────────────────────────────────────────────

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

fn profile_not_found(cfg: &Config, name: String) -> CliError {
    let mut available: Vec<_> = cfg.profiles.keys().cloned().collect();
    available.sort();
    CliError::ProfileNotFound {
        name,
        available: if available.is_empty() {
            "(none)".into()
        } else {
            available.join(", ")
        },
    }
}

fn check_profile(profile: &Profile) -> Result<(), CliError> {
    trunkdesk_config::parse_server_url(&profile.server)?;
    if !SESSION_STORES.contains(&profile.session_store.as_str()) {
        return Err(CliError::Validation {
            field: "session_store".into(),
            reason: format!("must be one of {}", SESSION_STORES.join(", ")),
        });
    }
    Ok(())
}

fn render_toml(cfg: &Config) -> Result<String, CliError> {
    toml::to_string_pretty(cfg).map_err(|e| CliError::Render(e.to_string()))
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("trunkdesk configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let server: String = Input::new()
                .with_prompt("Server URL")
                .default("http://localhost:5000".into())
                .interact_text()
                .map_err(prompt_err)?;

            let username: String = Input::new()
                .with_prompt("Username (blank to ask at login)")
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_err)?;

            let store = Select::new()
                .with_prompt("Where should the session token be kept?")
                .items(&[
                    "System keyring (recommended)",
                    "File in the data directory",
                ])
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let mut profile = Profile::new(server);
            profile.username = Some(username).filter(|u| !u.is_empty());
            profile.session_store = SESSION_STORES[store.min(1)].into();
            check_profile(&profile)?;

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());
            save_config(&cfg)?;

            eprintln!("\nConfiguration written to {}", config_path.display());
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: trunkdesk login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => render_toml(&cfg)?,
                ref structured => output::render_structured(structured, &cfg)?,
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        // ── SetProfile ──────────────────────────────────────────────
        ConfigCommand::SetProfile {
            name,
            url,
            username,
            session_store,
        } => {
            let mut profile = Profile::new(url);
            profile.username = username;
            profile.session_store = session_store;
            check_profile(&profile)?;

            let mut cfg = config::load_config_or_default();
            cfg.profiles.insert(name.clone(), profile);
            save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Saved profile '{name}'");
            }
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config_or_default();
            let default = cfg.active_profile_name(None);
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: trunkdesk config init");
            } else {
                let mut names: Vec<_> = cfg.profiles.keys().collect();
                names.sort();
                for name in names {
                    let marker = if *name == default { " *" } else { "" };
                    println!("{name}{marker}");
                }
            }
            Ok(())
        }

        // ── Use <name> ──────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_or_default();
            if !cfg.profiles.contains_key(&name) {
                return Err(profile_not_found(&cfg, name));
            }
            cfg.default_profile = Some(name.clone());
            save_config(&cfg)?;
            if !global.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }
    }
}
