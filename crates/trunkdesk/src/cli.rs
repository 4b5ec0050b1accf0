//! Clap derive structures for the `trunkdesk` CLI.
//!
//! Defines the command tree, global flags, and shared argument types.

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use trunkdesk_core::{EntityKind, RecordId};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// trunkdesk -- manage NSO/VNO trunks, customers, mappings, and DIDs
#[derive(Debug, Parser)]
#[command(
    name = "trunkdesk",
    version,
    about = "Manage telecom trunk and DID inventory from the command line",
    long_about = "A CLI for the trunk inventory server.\n\n\
        Lists and edits NSO trunks, VNO trunks, customers, trunk mappings,\n\
        and DID numbers, and reports channel utilization by area code.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Server profile to use
    #[arg(long, short = 'p', env = "TRUNKDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Server URL (overrides profile)
    #[arg(long, short = 's', env = "TRUNKDESK_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "TRUNKDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "TRUNKDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one id per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login(LoginArgs),

    /// Forget the stored session
    Logout,

    /// Show the logged-in user and role
    Whoami,

    /// Channel utilization by area code
    #[command(alias = "dash")]
    Dashboard(DashboardArgs),

    /// Manage NSO trunks
    #[command(alias = "nso-trunks")]
    Nso(RecordArgs),

    /// Manage VNO trunks
    #[command(alias = "vno-trunks")]
    Vno(RecordArgs),

    /// Manage customers
    #[command(alias = "cust")]
    Customers(RecordArgs),

    /// Manage NSO-to-VNO channel mappings
    #[command(alias = "trunk-mappings", alias = "map")]
    Mappings(RecordArgs),

    /// Manage DID numbers
    Dids(RecordArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Subcommand name that manages `kind`, for help text.
pub fn command_name(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::NsoTrunk => "nso",
        EntityKind::VnoTrunk => "vno",
        EntityKind::Customer => "customers",
        EntityKind::TrunkMapping => "mappings",
        EntityKind::Did => "dids",
    }
}

// ── Session ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (defaults to the profile's username, else prompts)
    #[arg(long, short = 'u')]
    pub username: Option<String>,

    /// Password (prompted when omitted)
    #[arg(long, env = "TRUNKDESK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long, conflicts_with = "password")]
    pub password_stdin: bool,
}

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Recompute from the record lists instead of using the server's figures
    #[arg(long)]
    pub local: bool,
}

// ── Records ──────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RecordArgs {
    #[command(subcommand)]
    pub command: RecordCommand,
}

#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// List all records
    #[command(alias = "ls")]
    List,

    /// Show one record
    Get { id: RecordId },

    /// Show the editable fields and their types
    Fields,

    /// Create a record from the default template plus --set overrides
    #[command(alias = "add")]
    Create(FieldArgs),

    /// Update a record; unspecified fields keep their current values
    #[command(alias = "edit")]
    Update {
        id: RecordId,
        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Delete a record (asks for confirmation)
    #[command(alias = "rm")]
    Delete { id: RecordId },
}

#[derive(Debug, Args)]
pub struct FieldArgs {
    /// Field assignment using the wire name, e.g. --set channels=30
    #[arg(long = "set", short = 'f', value_name = "KEY=VALUE", value_parser = parse_assignment)]
    pub assignments: Vec<(String, String)>,
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    Ok((key.to_owned(), value.to_owned()))
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Display the current configuration
    Show,

    /// Add or replace a profile non-interactively
    SetProfile {
        /// Profile name
        name: String,
        /// Server URL, e.g. http://localhost:5000
        url: String,
        /// Username to pre-fill at login
        #[arg(long)]
        username: Option<String>,
        /// Session storage: keyring or file
        #[arg(long, default_value = "keyring")]
        session_store: String,
    },

    /// List profile names
    Profiles,

    /// Set the default profile
    Use { name: String },

    /// Print the config file path
    Path,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: Shell,
}
