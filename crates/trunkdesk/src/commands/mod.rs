//! Command dispatch and per-invocation context.

pub mod auth;
pub mod config_cmd;
pub mod dashboard;
pub mod records;
pub mod util;

use std::sync::Arc;

use tracing::debug;
use trunkdesk_config::Profile;
use trunkdesk_core::{EntityKind, Inventory, SessionStore};

use crate::cli::{Command, GlobalOpts};
use crate::config;
use crate::error::CliError;

/// Everything a server-facing command needs.
pub struct Context {
    pub inventory: Inventory,
    pub profile_name: String,
    pub profile: Profile,
}

impl Context {
    /// Resolve the profile, open its session store, and restore any saved session.
    pub fn from_global(global: &GlobalOpts) -> Result<Self, CliError> {
        let cfg = config::load_config_or_default();
        let resolved = config::resolve(global, &cfg)?;

        let persistence = trunkdesk_config::session_store_for(&resolved.name, &resolved.profile)?;
        let session = Arc::new(SessionStore::new(persistence));
        if let Some(user) = session.restore() {
            debug!(profile = %resolved.name, username = %user.username, "using stored session");
        }

        let inventory = Inventory::new(&resolved.client, session)?;
        Ok(Self {
            inventory,
            profile_name: resolved.name,
            profile: resolved.profile,
        })
    }

    /// Fail early with a login hint when no session is stored.
    pub fn require_session(&self) -> Result<(), CliError> {
        if self.inventory.session().is_authenticated() {
            Ok(())
        } else {
            Err(CliError::NotLoggedIn)
        }
    }
}

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(ctx, args, global).await,
        Command::Logout => {
            auth::logout(ctx, global);
            Ok(())
        }
        Command::Whoami => auth::whoami(ctx, global),
        Command::Dashboard(args) => dashboard::handle(ctx, &args, global).await,
        Command::Nso(args) => records::handle(ctx, EntityKind::NsoTrunk, args, global).await,
        Command::Vno(args) => records::handle(ctx, EntityKind::VnoTrunk, args, global).await,
        Command::Customers(args) => records::handle(ctx, EntityKind::Customer, args, global).await,
        Command::Mappings(args) => {
            records::handle(ctx, EntityKind::TrunkMapping, args, global).await
        }
        Command::Dids(args) => records::handle(ctx, EntityKind::Did, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
