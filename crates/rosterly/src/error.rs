//! CLI error types with miette diagnostics.
//!
//! Maps `rosterly_api::Error` variants into user-facing errors with
//! actionable help text and stable exit codes.

use miette::Diagnostic;
use thiserror::Error;

use rosterly_api::Error as ApiError;
use rosterly_core::FieldErrors;

/// Exit codes for scripted callers.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL: i32 = 1;
    pub const VALIDATION: i32 = 2;
    pub const NOT_FOUND: i32 = 3;
    pub const CONFLICT: i32 = 4;
    pub const NETWORK: i32 = 5;
    pub const CONFIG: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Validation ───────────────────────────────────────────────────

    #[error("Invalid student record:\n{}", format_field_errors(.errors))]
    #[diagnostic(
        code(rosterly::validation),
        help("Fix the listed fields and try again. Nothing was sent to the server.")
    )]
    InvalidRecord { errors: FieldErrors },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(rosterly::validation))]
    Validation { field: String, reason: String },

    // ── Resources ────────────────────────────────────────────────────

    #[error("Student {id} not found")]
    #[diagnostic(
        code(rosterly::not_found),
        help("Run: rosterly list to see available students")
    )]
    NotFound { id: i64 },

    #[error("No student found with email '{email}'")]
    #[diagnostic(code(rosterly::not_found))]
    EmailNotFound { email: String },

    #[error("A student with this email already exists")]
    #[diagnostic(
        code(rosterly::conflict),
        help("Email addresses must be unique. Use a different address, or edit the existing record.")
    )]
    Conflict,

    // ── Network ──────────────────────────────────────────────────────

    #[error("Could not reach the roster server")]
    #[diagnostic(
        code(rosterly::network),
        help(
            "Check that the server is running and the URL is correct.\n\
             Current server: {url}"
        )
    )]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("The server rejected the request (HTTP {status}): {message}")]
    #[diagnostic(code(rosterly::rejected))]
    Rejected { status: u16, message: String },

    // ── Configuration ────────────────────────────────────────────────

    #[error(transparent)]
    #[diagnostic(
        code(rosterly::config),
        help("Point the CLI at a server with --server or: rosterly config set-server <url>")
    )]
    Config(#[from] rosterly_config::ConfigError),

    // ── Interactive ──────────────────────────────────────────────────

    #[error("Delete requires confirmation")]
    #[diagnostic(
        code(rosterly::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes,

    // ── IO ───────────────────────────────────────────────────────────

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_field_errors(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, message)| format!("  {field}: {message}"))
        .collect::<Vec<_>>()
        .join("\n")
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidRecord { .. } | Self::Validation { .. } => exit_code::VALIDATION,
            Self::NotFound { .. } | Self::EmailNotFound { .. } => exit_code::NOT_FOUND,
            Self::Conflict => exit_code::CONFLICT,
            Self::Network { .. } | Self::Rejected { .. } => exit_code::NETWORK,
            Self::Config(_) => exit_code::CONFIG,
            _ => exit_code::GENERAL,
        }
    }

    /// Translate an API error in the context of an id-addressed operation.
    pub fn from_api(err: ApiError, url: &url::Url, id: Option<i64>) -> Self {
        match err {
            ApiError::NotFound => match id {
                Some(id) => Self::NotFound { id },
                None => Self::Rejected {
                    status: 404,
                    message: "record not found".into(),
                },
            },
            ApiError::Conflict { .. } => Self::Conflict,
            ApiError::Rejected { status, message } => Self::Rejected { status, message },
            other => Self::Network {
                url: url.to_string(),
                source: other.into(),
            },
        }
    }
}
