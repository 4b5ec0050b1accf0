//! `trunkdesk-tui`: interactive terminal front end for trunk inventory.
//!
//! Six tabs mirror the web console (dashboard, NSO trunks, VNO trunks,
//! trunk mapping, DIDs, customers). A background task owns the view
//! controller and answers key-driven requests in order; the render loop
//! only ever draws the last snapshot it published.
//!
//! Logs go to a file (default `/tmp/trunkdesk-tui.log`) so they never
//! tear the terminal.

mod action;
mod app;
mod bridge;
mod component;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use trunkdesk_config::Profile;
use trunkdesk_core::{Inventory, SessionStore, ViewController};

use crate::app::App;
use crate::screens::login::LoginScreen;

/// Terminal UI for browsing and editing trunk inventory.
#[derive(Parser, Debug)]
#[command(name = "trunkdesk-tui", version, about)]
struct Cli {
    /// Profile from config.toml (defaults to the configured default)
    #[arg(short, long, env = "TRUNKDESK_PROFILE")]
    profile: Option<String>,

    /// Server URL; overrides the profile, or runs without one
    #[arg(short, long, env = "TRUNKDESK_SERVER")]
    server: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "TRUNKDESK_TIMEOUT")]
    timeout: Option<u64>,

    /// Log file path
    #[arg(long, default_value = "/tmp/trunkdesk-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-only tracing. The returned guard flushes on drop; hold it until exit.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "trunkdesk_tui={level},trunkdesk_core={level},trunkdesk_api={level}"
        ))
    });

    let dir = cli.log_file.parent().unwrap_or(Path::new("/tmp"));
    let file = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("trunkdesk-tui.log"));
    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .init();

    guard
}

/// Resolve the profile, apply flag overrides, and wire up the controller.
fn build_app(cli: &Cli) -> Result<App> {
    let cfg = trunkdesk_config::load_config()?;
    let name = cfg.active_profile_name(cli.profile.as_deref());

    let mut profile = match (cfg.profiles.get(&name), &cli.server) {
        (Some(profile), _) => profile.clone(),
        (None, Some(server)) => {
            let mut adhoc = Profile::new(server.clone());
            adhoc.session_store = "file".into();
            adhoc
        }
        (None, None) => {
            return Err(eyre!(
                "no profile '{name}' in {}. Run `trunkdesk config init` or pass --server",
                trunkdesk_config::config_path().display()
            ));
        }
    };
    if let Some(server) = &cli.server {
        profile.server.clone_from(server);
    }
    if let Some(timeout) = cli.timeout {
        profile.timeout = Some(timeout);
    }

    let client = trunkdesk_config::profile_to_client_config(&profile, &cfg.defaults)?;
    let persistence = trunkdesk_config::session_store_for(&name, &profile)?;
    let inventory = Inventory::new(&client, Arc::new(SessionStore::new(persistence)))?;

    info!(profile = %name, server = %profile.server, "starting trunkdesk-tui");

    let login = LoginScreen::new(profile.server.clone(), profile.username.clone());
    let location = format!("{name} @ {}", profile.server);
    Ok(App::new(ViewController::new(inventory), login, location))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tui::install_hooks()?;
    let _log_guard = setup_tracing(&cli);

    let mut app = build_app(&cli)?;
    app.run().await
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::Cli;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }
}
