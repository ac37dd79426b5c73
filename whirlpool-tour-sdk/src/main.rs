use std::{io, process::ExitCode};

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;
use whirlpool_tour_sdk::{
    cli::Cli,
    scripts::{Session, connect, run},
};

fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level)))
        .with_writer(io::stderr)
        .init();

    let config = cli.config();
    let result = connect(&config).and_then(|(wallet, ledger)| {
        let mut session = Session::new(&ledger, &wallet, &config, io::stdout().lock());
        run(&cli.command, &mut session)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
