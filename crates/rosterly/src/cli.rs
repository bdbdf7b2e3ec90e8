//! Clap derive structures for the `rosterly` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// rosterly -- manage a student roster from the command line
#[derive(Debug, Parser)]
#[command(
    name = "rosterly",
    version,
    about = "Manage a student roster server from the command line",
    long_about = "A CLI client for student roster servers exposing the /api/students API.\n\n\
        Records are validated locally before anything is sent; destructive\n\
        operations ask for confirmation unless --yes is given.",
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
    #[arg(long, short = 'p', env = "ROSTERLY_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Roster server URL (overrides profile)
    #[arg(long, short = 's', env = "ROSTERLY_SERVER", global = true)]
    pub server: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "ROSTERLY_OUTPUT",
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

    /// Request timeout in seconds
    #[arg(long, env = "ROSTERLY_TIMEOUT", global = true)]
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
    /// List all students
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one student by id
    #[command(alias = "show")]
    Get { id: i64 },

    /// Add a new student
    #[command(alias = "create")]
    Add(StudentFields),

    /// Edit an existing student (unset flags keep current values)
    #[command(alias = "update")]
    Edit {
        id: i64,

        #[command(flatten)]
        fields: StudentFields,
    },

    /// Delete a student
    #[command(alias = "rm")]
    Delete { id: i64 },

    /// Search students by name (server-side)
    Search {
        /// Name fragment to search for
        name: String,
    },

    /// List students enrolled in a course
    ByCourse { course: String },

    /// List students in a given year
    ByYear { year: i32 },

    /// Look up the student with an email address
    ByEmail { email: String },

    /// Manage configuration and profiles
    #[command(alias = "cfg")]
    Config(ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

// ── Command Arguments ────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Filter locally: case-insensitive match on name, email, or course
    #[arg(long)]
    pub search: Option<String>,
}

/// Student fields as flags. All required for `add`; all optional
/// overrides for `edit`.
#[derive(Debug, Args)]
pub struct StudentFields {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub course: Option<String>,

    #[arg(long)]
    pub year: Option<String>,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the current configuration
    Show,

    /// Print the config file path
    Path,

    /// Create or update a profile
    SetServer {
        /// Server base URL
        url: String,

        /// Profile name to create or update
        #[arg(long, default_value = "default")]
        profile: String,
    },
}
