//! Rocket race dashboard CLI.

use std::process::ExitCode;

use clap::Parser;
use race_cli::logging::init_logging;
use race_cli::pipeline::LoadError;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_export, run_facts, run_leaderboard, run_search, run_status};

/// No tier had a dataset to show.
const EXIT_NO_DATA: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli.color.write_global();
    if let Err(error) = init_logging(&cli.log_config()) {
        eprintln!("error: failed to initialize logging: {error}");
        return ExitCode::FAILURE;
    }

    let data_dir = cli.data_dir.as_deref();
    let config = cli.config.as_deref();
    let outcome = match &cli.command {
        Command::Status => run_status(config, data_dir),
        Command::Leaderboard(args) => run_leaderboard(config, data_dir, args),
        Command::Search(args) => run_search(config, data_dir, args),
        Command::Facts => run_facts(config, data_dir),
        Command::Export(args) => run_export(config, data_dir, args),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("error: {error:#}");
            match error.downcast_ref::<LoadError>() {
                Some(load) if load.is_no_data() => ExitCode::from(EXIT_NO_DATA),
                _ => ExitCode::FAILURE,
            }
        }
    }
}
