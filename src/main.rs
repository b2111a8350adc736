use clap::Parser;
use std::process::ExitCode;
use winstall::commands::install::{self, EXIT_USAGE};
use winstall::config::Cli;
use winstall::ui::{logging, Reporter, PROGRAM};
use winstall::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(err) = logging::init() {
        eprintln!("{}: {:#}", PROGRAM, err);
    }

    // Convert CLI args and environment to Config; this validates immediately
    let config = match Config::try_from(cli) {
        Ok(config) => config,
        Err(err) => {
            Reporter::new(false).fatal(&err);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    let result = install::run(&config);
    if let Err(err) = &result {
        Reporter::new(config.verbose).fatal(err);
    }

    ExitCode::from(install::exit_status(&result))
}
