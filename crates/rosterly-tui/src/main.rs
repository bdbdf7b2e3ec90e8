//! `rosterly-tui` — Terminal UI for browsing and editing a student roster.
//!
//! Built on [ratatui](https://ratatui.rs) over the view controllers in
//! `rosterly-core`. Three screens: the roster list, a single-record
//! detail view, and a create/edit form.
//!
//! Logs are written to a file (default `/tmp/rosterly-tui.log`) to avoid
//! corrupting the terminal UI.
//!
//! Entry point: CLI argument parsing, tracing setup, panic hooks, and app
//! launch.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod theme;
mod tui;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use rosterly_api::{StudentsClient, TransportConfig};

use crate::app::App;

/// Terminal UI for a student roster server.
#[derive(Parser, Debug)]
#[command(name = "rosterly-tui", version, about)]
struct Cli {
    /// Roster server URL (e.g., http://localhost:8080)
    #[arg(short = 's', long, env = "ROSTERLY_SERVER")]
    server: Option<String>,

    /// Server profile from the config file
    #[arg(short = 'p', long, env = "ROSTERLY_PROFILE")]
    profile: Option<String>,

    /// Log file path
    #[arg(long, default_value = "/tmp/rosterly-tui.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Set up file-based tracing. We MUST NOT log to stdout/stderr — that
/// would corrupt the TUI output. Returns a guard that must be held for
/// the lifetime of the application so logs are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("rosterly_tui={log_level}")));

    let log_dir = cli
        .log_file
        .parent()
        .unwrap_or(std::path::Path::new("/tmp"));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("rosterly-tui.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve the server URL: `--server` flag first, then the config file.
fn resolve_client(cli: &Cli) -> Result<(url::Url, StudentsClient)> {
    let cfg = rosterly_config::load_config_or_default();

    let (url, transport) = if let Some(ref raw) = cli.server {
        let url: url::Url = raw
            .parse()
            .map_err(|_| eyre!("invalid server URL: {raw}"))?;
        (url, TransportConfig::default())
    } else {
        let (_, profile) = rosterly_config::resolve_profile(&cfg, cli.profile.as_deref())
            .map_err(|e| eyre!("{e}"))?;
        rosterly_config::profile_to_transport(profile, &cfg.defaults).map_err(|e| eyre!("{e}"))?
    };

    let client = StudentsClient::new(url.as_str(), &transport).map_err(|e| eyre!("{e}"))?;
    Ok((url, client))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Install panic/error hooks BEFORE entering the terminal
    tui::install_hooks()?;

    // Tracing to file — hold the guard so logs flush on exit
    let _log_guard = setup_tracing(&cli);

    let (url, client) = resolve_client(&cli)?;
    info!(server = %url, "starting rosterly-tui");

    let mut app = App::new(url, Arc::new(client));
    app.run().await?;

    Ok(())
}
