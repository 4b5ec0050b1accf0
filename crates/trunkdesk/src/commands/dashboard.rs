//! Dashboard command handler.

use crate::cli::{DashboardArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

pub async fn handle(
    ctx: &Context,
    args: &DashboardArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    ctx.require_session()?;

    let stats = if args.local {
        let spinner = util::spinner("Fetching trunks, mappings, and DIDs", global.quiet);
        let stats = ctx.inventory.compute_stats().await;
        spinner.finish_and_clear();
        stats?
    } else {
        ctx.inventory.dashboard().await?
    };

    let out = output::render_dashboard(
        &global.output,
        &stats,
        output::should_color(&global.color),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
