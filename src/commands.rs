//! CLI command definitions
//!
//! Defines the clap commands for the smoke-test CLI.

use clap::Subcommand;
use std::path::PathBuf;

#[derive(Subcommand)]
pub enum Commands {
    /// Run every test case in the suite
    Run {
        /// Path to the configuration file
        #[arg(long, default_value = "smoke.toml")]
        config: PathBuf,

        /// Override the suite file from the configuration
        #[arg(long)]
        suite: Option<PathBuf>,
    },

    /// Print the flattened case plan without executing anything
    #[command(alias = "ls")]
    List {
        /// Path to the configuration file
        #[arg(long, default_value = "smoke.toml")]
        config: PathBuf,

        /// Override the suite file from the configuration
        #[arg(long)]
        suite: Option<PathBuf>,
    },

    /// Verify that every configured binary is present and executable
    Check {
        /// Path to the configuration file
        #[arg(long, default_value = "smoke.toml")]
        config: PathBuf,
    },
}
