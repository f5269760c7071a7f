//! qsm - lifecycle management for Qubes domains and templates

use clap::Parser;
use tracing_subscriber::EnvFilter;

use qsm_cli::cli::Cli;

/// Log filter, e.g. `QSM_LOG=qsm_cli=debug` to see every spawned command.
const LOG_ENV: &str = "QSM_LOG";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = cli.run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
