//! Config subcommand handlers.

use rosterly_config::{Config, Profile, config_path, load_config_or_default, save_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Format config for display as TOML.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_profile {
        let _ = writeln!(out, "default_profile = \"{default}\"");
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);
    let _ = writeln!(out, "timeout = {}", cfg.defaults.timeout);

    let mut names: Vec<_> = cfg.profiles.keys().collect();
    names.sort();
    for name in names {
        let p = &cfg.profiles[name];
        let _ = writeln!(out);
        let _ = writeln!(out, "[profiles.{name}]");
        let _ = writeln!(out, "server = \"{}\"", p.server);
        if let Some(timeout) = p.timeout {
            let _ = writeln!(out, "timeout = {timeout}");
        }
    }

    out.trim_end().to_string()
}

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = load_config_or_default();
            output::print_output(&format_config(&cfg), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetServer { url, profile } => {
            // Validate before persisting anything
            let parsed: url::Url = url.parse().map_err(|_| CliError::Validation {
                field: "server".into(),
                reason: format!("invalid URL: {url}"),
            })?;

            let mut cfg = load_config_or_default();
            cfg.profiles.insert(
                profile.clone(),
                Profile {
                    server: parsed.to_string(),
                    timeout: None,
                },
            );
            if cfg.default_profile.is_none() {
                cfg.default_profile = Some(profile.clone());
            }
            save_config(&cfg)?;

            if !global.quiet {
                eprintln!("Profile '{profile}' -> {parsed}");
                eprintln!("Saved to {}", config_path().display());
            }
            Ok(())
        }
    }
}
