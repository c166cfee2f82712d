//! Command line tool for scripting UFO font sources.

use anyhow::Result;
use clap::Parser;

use fontparts::cli::CliArgs;
use fontparts::config::Settings;
use fontparts::{commands, logging};

fn run_app(cli_args: CliArgs) -> Result<()> {
    let settings = Settings::load().unwrap_or_default();
    let filter = cli_args
        .log_filter
        .clone()
        .unwrap_or_else(|| settings.log_filter().to_string());
    let _guard = logging::init_logging(&filter, cli_args.log_file)?;
    commands::run(cli_args.command)
}

fn main() {
    let cli_args = CliArgs::parse();
    if let Err(message) = cli_args.validate() {
        eprintln!("Error: {message}");
        std::process::exit(2);
    }
    if let Err(error) = run_app(cli_args) {
        eprintln!("Error: {error:#}");
        std::process::exit(1);
    }
}
