//! `honeydo` command-line front end.
//!
//! Drives the task and note services against a local SQLite file. The
//! acting user comes from `--user-id/--user-email`, their env vars, or the
//! `[session]` config section; without one every command is rejected as
//! unauthorized.

mod commands;
mod config;

use clap::Parser;
use config::{GlobalArgs, HoneydoConfig};
use honeydo_core::db::open_db;
use honeydo_core::init_logging;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(version, about = "Shared household task list and personal notes")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match HoneydoConfig::load(&cli.global) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Error loading configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(log_dir) = config.log_dir.as_ref() {
        if let Err(err) = init_logging(config.log_level.as_str(), log_dir) {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    if let Some(parent) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if let Err(err) = std::fs::create_dir_all(parent) {
            eprintln!("failed to create {}: {err}", parent.display());
            return ExitCode::FAILURE;
        }
    }

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("failed to open {}: {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    let mut stdout = std::io::stdout().lock();
    match commands::run(&conn, &config.session, cli.command, &mut stdout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
