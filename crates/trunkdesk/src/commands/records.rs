//! Record command handlers, shared by all five entity kinds.
//!
//! Create and update go through `EditForm`, the same staged form the TUI
//! modal uses: create starts from the kind's template, update from the
//! current record, and `--set key=value` overrides individual fields.

use tabled::builder::Builder;
use tabled::settings::Style;

use trunkdesk_core::{EditForm, EntityKind, FieldKind, RecordId};

use crate::cli::{FieldArgs, GlobalOpts, OutputFormat, RecordArgs, RecordCommand};
use crate::error::CliError;
use crate::output;

use super::{Context, util};

pub async fn handle(
    ctx: &Context,
    kind: EntityKind,
    args: RecordArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !matches!(args.command, RecordCommand::Fields) {
        ctx.require_session()?;
    }

    match args.command {
        RecordCommand::List => {
            let rows = ctx.inventory.list_views(kind).await?;
            let out = output::render_records(&global.output, kind, &rows)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RecordCommand::Get { id } => {
            let row = ctx.inventory.find_view(kind, id).await?;
            let out = output::render_record(&global.output, kind, &row)?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RecordCommand::Fields => {
            output::print_output(&describe_fields(kind, &global.output), global.quiet);
            Ok(())
        }

        RecordCommand::Create(fields) => {
            let mut form = EditForm::for_add(kind);
            apply(&mut form, fields)?;
            let id = ctx.inventory.save_form(&form).await?;
            report_saved(kind, id, "Created", global);
            Ok(())
        }

        RecordCommand::Update { id, fields } => {
            let current = ctx.inventory.find_view(kind, id).await?;
            let mut form = EditForm::for_edit(kind, &current);
            apply(&mut form, fields)?;
            let id = ctx.inventory.save_form(&form).await?;
            report_saved(kind, id, "Updated", global);
            Ok(())
        }

        RecordCommand::Delete { id } => {
            if !util::confirm(
                &format!("Are you sure you want to delete {} {id}?", kind.singular()),
                &format!("{} delete", crate::cli::command_name(kind)),
                global.yes,
            )? {
                return Ok(());
            }
            ctx.inventory.delete_kind(kind, id).await?;
            if !global.quiet {
                eprintln!("Deleted {} {id}", kind.singular());
            }
            Ok(())
        }
    }
}

/// Apply `--set` overrides, then check every value before any request.
fn apply(form: &mut EditForm, fields: FieldArgs) -> Result<(), CliError> {
    for (key, value) in fields.assignments {
        form.set_by_key(&key, value)?;
    }
    form.validate()?;
    Ok(())
}

fn report_saved(kind: EntityKind, id: RecordId, verb: &str, global: &GlobalOpts) {
    if global.quiet {
        return;
    }
    if matches!(global.output, OutputFormat::Plain) {
        println!("{id}");
    } else {
        eprintln!("{verb} {} {id}", kind.singular());
    }
}

fn describe_fields(kind: EntityKind, format: &OutputFormat) -> String {
    if matches!(format, OutputFormat::Plain) {
        return kind
            .fields()
            .iter()
            .map(|f| f.key)
            .collect::<Vec<_>>()
            .join("\n");
    }

    let template = kind.template_values();
    let mut builder = Builder::default();
    builder.push_record(["Key", "Label", "Type", "Default"].map(String::from));
    for (spec, default) in kind.fields().iter().zip(template) {
        let mut ty = match spec.kind {
            FieldKind::Text => "text".to_owned(),
            FieldKind::Number => "number".to_owned(),
            FieldKind::Choice(options) => options.join(" | "),
        };
        if spec.optional {
            ty.push_str(" (optional)");
        }
        builder.push_record([spec.key.to_owned(), spec.label.to_owned(), ty, default]);
    }
    builder.build().with(Style::rounded()).to_string()
}
