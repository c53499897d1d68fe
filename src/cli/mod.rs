//! CLI command handling
//!
//! Dispatches subcommands and maps their outcomes to process exit codes.

use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::commands::Commands;
use crate::common::config::Config;
use crate::common::Result;
use crate::suite::case::{CaseKind, TestCase};
use crate::suite::driver::{self, RunExit};
use crate::suite::plan;

/// Dispatch a CLI command, returning the process exit code
pub async fn dispatch(command: Commands) -> Result<i32> {
    match command {
        Commands::Run { config, suite } => {
            let config = load_config(&config, suite)?;
            let exit = driver::run(&config).await?;
            Ok(exit.code())
        }

        Commands::List { config, suite } => {
            let config = load_config(&config, suite)?;
            let tree = plan::load_suite(&config.paths.suite)?;
            let plan = plan::flatten(&tree);

            for (i, raw) in plan.iter().enumerate() {
                let case = TestCase::build(raw, i + 1, &config);
                print!("\n{}", raw.label);
                println!("#{} {}", i + 1, case.name);
                match &case.kind {
                    CaseKind::Malformed { message } => {
                        println!("\t{}", message.red());
                    }
                    _ => {
                        for stage in &case.stages {
                            println!("\tcmd: {}", stage.command_line());
                        }
                    }
                }
            }
            println!("\n{} cases", plan.len());

            Ok(RunExit::Success.code())
        }

        Commands::Check { config } => {
            let config = Config::load(&config)?;

            let mut denied = false;
            for (name, path) in &config.binaries {
                match which::which(path) {
                    Ok(resolved) => {
                        println!("{} {} -> {}", "✓".green(), name, resolved.display());
                    }
                    Err(_) => {
                        denied = true;
                        println!("{} No {} or it cannot be executed", "✗".red(), name);
                    }
                }
            }

            let exit = if denied {
                RunExit::AccessDenied
            } else {
                RunExit::Success
            };
            Ok(exit.code())
        }
    }
}

fn load_config(path: &Path, suite: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load(path)?;
    if let Some(suite) = suite {
        config.paths.suite = suite;
    }
    Ok(config)
}
