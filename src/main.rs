//! Smoke-test CLI entry point
//!
//! Exit codes are part of the interface: 0 when every case passed, 1 when
//! at least one case failed, 2 when a configured binary is missing or not
//! executable.

use clap::Parser;
use smoke::{cli, commands::Commands, common};

#[derive(Parser)]
#[command(name = "smoke", about = "Declarative smoke-test runner for external binaries")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

// Child binaries run one at a time; a single-threaded runtime is all the
// engine needs.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    common::logging::init_cli();

    let cli = Cli::parse();

    match cli::dispatch(cli.command).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
