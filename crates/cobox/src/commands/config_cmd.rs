//! Config subcommand handlers.

use std::fmt::Write as _;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

/// Render the resolved config as TOML-like lines.
fn format_config(cfg: &Config, path: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {path}");
    let _ = writeln!(out, "api_base_url = \"{}\"", cfg.api_base_url);
    let _ = writeln!(out, "timeout = {}", cfg.timeout);
    let backend = match cfg.session_backend {
        cobox_config::SessionBackend::File => "file",
        cobox_config::SessionBackend::Keyring => "keyring",
    };
    let _ = writeln!(out, "session_backend = \"{backend}\"");
    if matches!(cfg.session_backend, cobox_config::SessionBackend::File) {
        let _ = writeln!(
            out,
            "session_file = \"{}\"",
            cobox_config::session_path(cfg).display()
        );
    }
    let _ = write!(out, "output = \"{}\"", cfg.output);
    out
}

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let path = config::resolved_path(global).display().to_string();
            let out = output::render_single(
                config::output_format(global, &cfg)?,
                &cfg,
                |c| format_config(c, &path),
                |c| c.api_base_url.clone(),
            )?;
            println!("{out}");
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::resolved_path(global).display());
            Ok(())
        }
    }
}
