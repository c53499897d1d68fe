//! Test runner
//!
//! Drives one case at a time and keeps the run-level pass/fail counters.
//! Verification behavior lives entirely inside the case; the runner never
//! branches on the case kind.

use colored::Colorize;

use crate::common::Result;

use super::case::TestCase;
use super::report::ReportLog;

/// Pass/fail counters accumulated over one full run
#[derive(Debug, Default)]
pub struct TestRunner {
    pub passed: usize,
    pub failed: usize,
}

impl TestRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one case and fold its outcome into the counters: run, print
    /// the inline status token, append the full details and a separator to
    /// the report.
    pub async fn run_case(
        &mut self,
        case: &mut TestCase,
        case_id: usize,
        log: &ReportLog,
    ) -> Result<()> {
        let failed = case.run(case_id, log).await?;

        let status = if failed {
            self.failed += 1;
            "Fail"
        } else {
            self.passed += 1;
            "OK"
        };

        let token = if failed { status.red() } else { status.green() };
        print!("     {token}");

        case.write_details(log)?;
        log.append(&format!(" \n{status}\n{}", ReportLog::separator()))?;

        Ok(())
    }

    /// Number of cases completed so far
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::suite::case::CaseKind;

    fn malformed_case(name: &str) -> TestCase {
        TestCase {
            name: name.to_string(),
            stages: Vec::new(),
            failed: true,
            kind: CaseKind::Malformed {
                message: "Test case is empty".to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_counters_track_failures() {
        let dir = tempfile::tempdir().unwrap();
        let log = ReportLog::new(dir.path().join("report.log"));
        let mut runner = TestRunner::new();

        let mut case = malformed_case("Broken");
        runner.run_case(&mut case, 1, &log).await.unwrap();

        assert_eq!(runner.passed, 0);
        assert_eq!(runner.failed, 1);
        assert_eq!(runner.total(), 1);

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert!(content.contains("Broken \n#1"));
        assert!(content.contains("Test case is empty"));
        assert!(content.contains("\nFail\n"));
        assert!(content.contains(&ReportLog::separator()));
    }
}
