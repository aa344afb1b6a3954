#![allow(clippy::too_many_arguments)]

mod cli;

use std::process::ExitCode;

use clap::Parser;

fn main() -> ExitCode {
    frostglass::logger::init();

    let args = cli::CliArgs::parse();
    let code = cli::run(args);

    if let Some(path) = frostglass::logger::log_path() {
        frostglass::log_info!("session log at {}", path.display());
    }
    code
}
