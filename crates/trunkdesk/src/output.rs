//! Output formatting: table, JSON, YAML, plain.
//!
//! Records are rendered from the kind's field table, so one renderer serves
//! every entity. Structured formats re-type the row values (numbers as JSON
//! numbers, empty optional fields as `null`) so the output matches the
//! server's wire shape.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde_json::{Map, Value};
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use trunkdesk_core::{DashboardStats, EntityKind, FieldKind, RecordView};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color ───────────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: &ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none(),
    }
}

fn paint_utilization(percent: u64, color: bool) -> String {
    let text = format!("{percent}%");
    if !color {
        return text;
    }
    match percent {
        0..=69 => text.green().to_string(),
        70..=89 => text.yellow().to_string(),
        _ => text.red().bold().to_string(),
    }
}

// ── Records ─────────────────────────────────────────────────────────

/// One record as a wire-shaped JSON object.
pub fn record_json(kind: EntityKind, row: &RecordView) -> Value {
    let mut obj = Map::new();
    obj.insert("id".into(), Value::from(row.id.get()));
    for (spec, raw) in kind.fields().iter().zip(&row.values) {
        let value = if raw.is_empty() && spec.optional {
            Value::Null
        } else if spec.kind == FieldKind::Number {
            raw.parse::<i64>()
                .map_or_else(|_| Value::String(raw.clone()), Value::from)
        } else {
            Value::String(raw.clone())
        };
        obj.insert(spec.key.into(), value);
    }
    Value::Object(obj)
}

fn records_table(kind: EntityKind, rows: &[RecordView]) -> String {
    let mut builder = Builder::default();
    builder.push_record(
        std::iter::once("ID".to_owned()).chain(kind.fields().iter().map(|f| f.label.to_owned())),
    );
    for row in rows {
        builder.push_record(
            std::iter::once(row.id.to_string()).chain(row.values.iter().cloned()),
        );
    }
    builder.build().with(Style::rounded()).to_string()
}

/// Render a list of records in the chosen format.
pub fn render_records(
    format: &OutputFormat,
    kind: EntityKind,
    rows: &[RecordView],
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => Ok(records_table(kind, rows)),
        OutputFormat::Plain => Ok(rows
            .iter()
            .map(|r| r.id.to_string())
            .collect::<Vec<_>>()
            .join("\n")),
        structured => {
            let data: Vec<Value> = rows.iter().map(|r| record_json(kind, r)).collect();
            render_structured(structured, &data)
        }
    }
}

/// Render one record; tables become a two-column field/value listing.
pub fn render_record(
    format: &OutputFormat,
    kind: EntityKind,
    row: &RecordView,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let mut builder = Builder::default();
            builder.push_record(["ID".to_owned(), row.id.to_string()]);
            for (spec, value) in kind.fields().iter().zip(&row.values) {
                builder.push_record([spec.label.to_owned(), value.clone()]);
            }
            Ok(builder.build().with(Style::rounded()).to_string())
        }
        OutputFormat::Plain => Ok(row.id.to_string()),
        structured => render_structured(structured, &record_json(kind, row)),
    }
}

// ── Dashboard ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct AreaCodeRow {
    #[tabled(rename = "Area Code")]
    area_code: String,
    #[tabled(rename = "Total")]
    total: u64,
    #[tabled(rename = "Allocated")]
    allocated: u64,
    #[tabled(rename = "Remaining")]
    remaining: u64,
    #[tabled(rename = "Utilization")]
    utilization: String,
}

pub fn render_dashboard(
    format: &OutputFormat,
    stats: &DashboardStats,
    color: bool,
) -> Result<String, CliError> {
    match format {
        OutputFormat::Table => {
            let rows: Vec<AreaCodeRow> = stats
                .by_area_code
                .iter()
                .map(|(code, s)| AreaCodeRow {
                    area_code: code.clone(),
                    total: s.total_channels,
                    allocated: s.allocated_channels,
                    remaining: s.remaining_channels,
                    utilization: paint_utilization(s.utilization, color),
                })
                .collect();
            Ok(format!(
                "NSO trunks: {}   VNO trunks: {}   DIDs: {}\n{}",
                stats.total_nso_trunks,
                stats.total_vno_trunks,
                stats.total_dids,
                Table::new(rows).with(Style::rounded())
            ))
        }
        OutputFormat::Plain => Ok(stats
            .by_area_code
            .iter()
            .map(|(code, s)| format!("{code}\t{}", s.utilization))
            .collect::<Vec<_>>()
            .join("\n")),
        structured => render_structured(structured, stats),
    }
}

// ── Format-specific renderers ────────────────────────────────────────

/// JSON or YAML for any serializable value. Table/plain fall back to pretty JSON.
pub fn render_structured<T: serde::Serialize + ?Sized>(
    format: &OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    let rendered = match format {
        OutputFormat::JsonCompact => serde_json::to_string(data).map_err(render_err)?,
        OutputFormat::Yaml => serde_yaml::to_string(data).map_err(render_err)?,
        _ => serde_json::to_string_pretty(data).map_err(render_err)?,
    };
    Ok(rendered)
}

fn render_err(e: impl std::fmt::Display) -> CliError {
    CliError::Render(e.to_string())
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}
