mod cli;
mod commands;
mod error;
mod output;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rosterly_api::{StudentsClient, TransportConfig};

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.global.verbose);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a server
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions { shell } => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "rosterly", &mut std::io::stdout());
            Ok(())
        }

        // All other commands talk to the server
        cmd => {
            let (url, transport) = resolve_server(&cli.global)?;
            let client = StudentsClient::new(url.as_str(), &transport)
                .map_err(|e| CliError::from_api(e, &url, None))?;

            tracing::debug!(command = ?cmd, server = %url, "dispatching command");
            commands::dispatch(cmd, &client, &url, &cli.global).await
        }
    }
}

/// Resolve the server URL and transport settings from the config file,
/// profile, and CLI overrides.
fn resolve_server(global: &cli::GlobalOpts) -> Result<(url::Url, TransportConfig), CliError> {
    let cfg = rosterly_config::load_config_or_default();

    // --server wins over any profile
    if let Some(ref raw) = global.server {
        let url: url::Url = raw.parse().map_err(|_| CliError::Validation {
            field: "server".into(),
            reason: format!("invalid URL: {raw}"),
        })?;
        let timeout = Duration::from_secs(global.timeout.unwrap_or(cfg.defaults.timeout));
        return Ok((url, TransportConfig { timeout }));
    }

    let (_, profile) = rosterly_config::resolve_profile(&cfg, global.profile.as_deref())?;
    let (url, mut transport) = rosterly_config::profile_to_transport(profile, &cfg.defaults)?;
    if let Some(timeout) = global.timeout {
        transport.timeout = Duration::from_secs(timeout);
    }
    Ok((url, transport))
}
