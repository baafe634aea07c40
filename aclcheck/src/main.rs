use std::process::ExitCode;

use aclcheck::cli::{Cli, Commands};
use aclcheck::cmd::{self, Input};
use aclcheck::errors::display_error;
use aclcheck::settings::Settings;
use aclcheck::style;
use aclcheck::tracing_init::init_tracing;
use anyhow::Result;
use clap::Parser;
use tracing::{debug, error};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    debug!(args = ?std::env::args(), "aclcheck started");

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            display_error(&e, cli.verbose);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<ExitCode> {
    let settings = Settings::load()?;
    if !settings.color {
        style::disable_colors();
    }

    match command {
        Commands::Check { file, json } => cmd::check::run(&Input::resolve(file, &settings), json),
        Commands::Fmt { file } => {
            cmd::fmt::run(&Input::resolve(file, &settings))?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Schema { json } => {
            cmd::schema::run(json)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}
