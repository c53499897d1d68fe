//! End-to-end driver
//!
//! Sequencing for one run: preflight the configured binaries, rebuild the
//! io directory, clear the report, flatten the suite, run every case in
//! order, clean up, and derive the process exit code. Execution is strictly
//! sequential; each child binary blocks the run until it exits, with no
//! timeout (a hung binary hangs the run).

use std::path::Path;
use std::time::Instant;

use crate::common::config::Config;
use crate::common::{Error, Result};

use super::case::TestCase;
use super::plan;
use super::report::ReportLog;
use super::runner::TestRunner;

/// Process exit codes; stable, scripts key off them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunExit {
    /// No case failed
    Success = 0,
    /// At least one case failed
    TestsFailed = 1,
    /// A configured binary is missing or not executable
    AccessDenied = 2,
}

impl RunExit {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Verify that every configured binary resolves to something executable.
/// Fails on the first binary that does not.
pub fn preflight(config: &Config) -> Result<()> {
    for (name, path) in &config.binaries {
        let resolved =
            which::which(path).map_err(|_| Error::binary_not_executable(name))?;
        tracing::debug!(binary = %name, path = %resolved.display(), "preflight ok");
    }
    Ok(())
}

/// Run the whole suite
pub async fn run(config: &Config) -> Result<RunExit> {
    let started = Instant::now();

    if let Err(e) = preflight(config) {
        println!("{e}");
        return Ok(RunExit::AccessDenied);
    }

    recreate_io_dir(&config.paths.io_dir)?;
    let log = ReportLog::new(&config.paths.log);
    log.clear()?;

    let tree = plan::load_suite(&config.paths.suite)?;
    let plan = plan::flatten(&tree);

    let mut cases: Vec<TestCase> = plan
        .iter()
        .enumerate()
        .map(|(i, raw)| TestCase::build(raw, i + 1, config))
        .collect();

    let mut runner = TestRunner::new();
    for (i, (raw, case)) in plan.iter().zip(cases.iter_mut()).enumerate() {
        print!("\n{}", raw.label);
        runner.run_case(case, i + 1, &log).await?;
    }

    // the io dir goes away even when cases failed
    remove_io_dir(&config.paths.io_dir)?;

    let summary = format!("\nPASSED {} of {}", runner.passed, runner.total());
    println!("{summary}");
    log.append(&summary)?;

    println!("See details in {}", config.paths.log.display());
    println!("Time:  {:.5} seconds", started.elapsed().as_secs_f64());

    if runner.failed != 0 {
        Ok(RunExit::TestsFailed)
    } else {
        Ok(RunExit::Success)
    }
}

/// Delete and recreate the working io directory
fn recreate_io_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    std::fs::create_dir_all(dir)?;
    tracing::debug!(dir = %dir.display(), "recreated io directory");
    Ok(())
}

fn remove_io_dir(dir: &Path) -> Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes_are_stable() {
        assert_eq!(RunExit::Success.code(), 0);
        assert_eq!(RunExit::TestsFailed.code(), 1);
        assert_eq!(RunExit::AccessDenied.code(), 2);
    }

    #[test]
    fn test_preflight_rejects_missing_binary() {
        let mut config = Config::default();
        config.binaries.insert(
            "enc".to_string(),
            PathBuf::from("/nonexistent/binary/for/sure"),
        );

        let err = preflight(&config).unwrap_err();
        assert_eq!(err.to_string(), "No enc or it cannot be executed");
    }

    #[cfg(unix)]
    #[test]
    fn test_preflight_rejects_non_executable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain-file");
        std::fs::write(&path, "not a program").unwrap();

        let mut config = Config::default();
        config.binaries.insert("enc".to_string(), path);

        assert!(preflight(&config).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_preflight_accepts_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runnable");
        std::fs::write(&path, "#!/bin/sh\nexit 0\n").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = Config::default();
        config.binaries.insert("enc".to_string(), path);

        assert!(preflight(&config).is_ok());
    }

    #[test]
    fn test_recreate_io_dir_clears_stale_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let io_dir = dir.path().join("io");
        std::fs::create_dir_all(&io_dir).unwrap();
        std::fs::write(io_dir.join("0001.out"), "stale").unwrap();

        recreate_io_dir(&io_dir).unwrap();

        assert!(io_dir.exists());
        assert!(!io_dir.join("0001.out").exists());
    }
}
