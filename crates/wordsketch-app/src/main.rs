//! Command line entry point.

use clap::Parser;
use std::process::ExitCode;
use wordsketch_app::cli::{self, Cli};

fn main() -> ExitCode {
    env_logger::init();

    let args = Cli::parse();
    log::debug!("Running {:?}", args.command);

    match cli::run(args, &mut std::io::stdout()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
