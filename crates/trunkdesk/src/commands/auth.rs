//! login / logout / whoami.

use dialoguer::Input;
use serde::Serialize;

use crate::cli::{GlobalOpts, LoginArgs, OutputFormat};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

#[derive(Serialize)]
struct WhoamiOutput<'a> {
    profile: &'a str,
    server: &'a str,
    username: String,
    role: String,
}

pub async fn login(ctx: &Context, args: LoginArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let username = match args.username.or_else(|| ctx.profile.username.clone()) {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(util::prompt_err)?,
    };
    let password = util::read_password(args.password, args.password_stdin)?;

    let spinner = util::spinner(&format!("Logging in to {}", ctx.profile.server), global.quiet);
    let result = ctx.inventory.login(&username, &password).await;
    spinner.finish_and_clear();

    let user = result?;
    if !global.quiet {
        eprintln!(
            "Logged in as {} ({}) on profile '{}'",
            user.username, user.role, ctx.profile_name
        );
    }
    Ok(())
}

pub fn logout(ctx: &Context, global: &GlobalOpts) {
    ctx.inventory.logout();
    if !global.quiet {
        eprintln!("Logged out of profile '{}'", ctx.profile_name);
    }
}

pub fn whoami(ctx: &Context, global: &GlobalOpts) -> Result<(), CliError> {
    let user = ctx.inventory.session().user().ok_or(CliError::NotLoggedIn)?;
    let out = match global.output {
        OutputFormat::Table => format!(
            "{} ({}) on {} [{}]",
            user.username, user.role, ctx.profile.server, ctx.profile_name
        ),
        OutputFormat::Plain => user.username,
        ref structured => output::render_structured(
            structured,
            &WhoamiOutput {
                profile: &ctx.profile_name,
                server: &ctx.profile.server,
                username: user.username,
                role: user.role.to_string(),
            },
        )?,
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
