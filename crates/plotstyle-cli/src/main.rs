use std::io;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use plotstyle::ConfigStore;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.globals.log_level());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let store = ConfigStore::with_http()?;
    commands::initialize(&store, &cli.globals)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    commands::run(&store, &cli.command, cli.globals.json, &mut out)
}

fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
