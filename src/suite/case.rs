//! Test-case model
//!
//! A case owns an ordered list of stages and one verification strategy.
//! The strategies form a closed set, tagged by the leaf's `case type`
//! entry and fixed at build time; leaves that cannot be built become
//! always-failed cases that never spawn a process.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::common::config::Config;
use crate::common::Result;

use super::plan::RawCase;
use super::report::ReportLog;

/// Reserved leaf key selecting the verification strategy
pub const CASE_TYPE_KEY: &str = "case type";

/// Placeholder in command templates, expanded to the case's io path
pub const IO_PLACEHOLDER: &str = "{path_to_io}";

/// One external-binary invocation belonging to a case
///
/// Built with the resolved binary path and argument string; output and
/// exit code are filled in after execution.
#[derive(Debug, Clone)]
pub struct Stage {
    pub binary: PathBuf,
    pub args: String,
    /// Combined stdout/stderr text, trimmed
    pub output: String,
    /// 0 until the stage fails
    pub exit_code: i32,
}

impl Stage {
    pub fn new(binary: PathBuf, args: String) -> Self {
        Self {
            binary,
            args,
            output: String::new(),
            exit_code: 0,
        }
    }

    /// Command line as it is written to the report
    pub fn command_line(&self) -> String {
        format!("{} {}", self.binary.display(), self.args)
    }

    /// Run the binary and capture its output. Returns false when the stage
    /// exited nonzero or could not be spawned at all; either way the
    /// failure stays recorded on the stage.
    async fn execute(&mut self) -> bool {
        let result = Command::new(&self.binary)
            .args(self.args.split_whitespace())
            .stdin(Stdio::null())
            .output()
            .await;

        match result {
            Ok(output) => {
                self.output = combined_output(&output.stdout, &output.stderr);
                if output.status.success() {
                    true
                } else {
                    self.exit_code = output.status.code().unwrap_or(-1);
                    false
                }
            }
            Err(e) => {
                self.output = e.to_string();
                self.exit_code = -1;
                false
            }
        }
    }
}

fn combined_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(stdout).trim().to_string();
    let err = String::from_utf8_lossy(stderr);
    let err = err.trim();
    if !err.is_empty() {
        if !text.is_empty() {
            text.push('\n');
        }
        text.push_str(err);
    }
    text
}

/// Verification strategy, one per case
#[derive(Debug, Clone)]
pub enum CaseKind {
    /// Success iff every stage exits 0
    Plain,
    /// Additionally requires the produced artifact to match the reference
    /// byte for byte; only checked once every stage has succeeded
    BitExact {
        output: PathBuf,
        reference: PathBuf,
        matched: bool,
    },
    /// Never runs; reports the stored build error instead
    Malformed { message: String },
}

/// One executable test case
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub stages: Vec<Stage>,
    pub failed: bool,
    pub kind: CaseKind,
}

impl TestCase {
    /// Build a case from a flattened leaf
    ///
    /// `case_id` is the 1-based position in the flattened plan; it names
    /// the case's io artifacts, so it must come from the same enumeration
    /// the runner later uses.
    pub fn build(raw: &RawCase, case_id: usize, config: &Config) -> Self {
        let entries = match &raw.entries {
            Some(entries) => entries,
            None => return Self::malformed(&raw.name, "Test case is not a mapping"),
        };
        if entries.is_empty() {
            return Self::malformed(&raw.name, "Test case is empty");
        }

        let io_path = io_path(&config.paths.io_dir, case_id);
        let mut selector = None;
        let mut stages = Vec::new();
        for (key, value) in entries {
            if key == CASE_TYPE_KEY {
                selector = Some(value);
                continue;
            }
            let template = match value.as_str() {
                Some(template) => template,
                None => return Self::malformed(&raw.name, "Stage command is not a string"),
            };
            let binary = match config.binaries.get(key) {
                Some(binary) => binary.clone(),
                None => {
                    return Self::malformed(&raw.name, &format!("Unknown binary id: {key}"))
                }
            };
            let args = template.replace(IO_PLACEHOLDER, &io_path.display().to_string());
            stages.push(Stage::new(binary, args));
        }

        let selector = match selector {
            Some(selector) => selector,
            None => return Self::malformed(&raw.name, "Case type is unidentified"),
        };
        if stages.is_empty() {
            return Self::malformed(&raw.name, "Test case is empty");
        }

        let kind = match selector.as_str() {
            Some("plain") => CaseKind::Plain,
            Some("bit-exact") => CaseKind::BitExact {
                output: io_path.with_extension(&config.artifacts.output_ext),
                reference: io_path.with_extension(&config.artifacts.reference_ext),
                matched: false,
            },
            other => {
                let shown = other.unwrap_or("<non-string>");
                return Self::malformed(&raw.name, &format!("Unknown case type: {shown}"));
            }
        };

        Self {
            name: raw.name.clone(),
            stages,
            failed: false,
            kind,
        }
    }

    fn malformed(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            stages: Vec::new(),
            failed: true,
            kind: CaseKind::Malformed {
                message: message.to_string(),
            },
        }
    }

    /// Run the case: header to console and report, then the stages in
    /// declared order. A nonzero exit stops the case's remaining stages;
    /// later stages consume earlier stages' output. Returns the failed
    /// flag.
    pub async fn run(&mut self, case_id: usize, log: &ReportLog) -> Result<bool> {
        let header = format!("{} \n#{case_id}\n", self.name);
        print!("{header}");
        log.append("\n\n")?;
        log.append(&header)?;

        if matches!(self.kind, CaseKind::Malformed { .. }) {
            return Ok(self.failed);
        }

        for stage in &mut self.stages {
            if !stage.execute().await {
                self.failed = true;
                return Ok(self.failed);
            }
        }

        if let CaseKind::BitExact {
            output,
            reference,
            matched,
        } = &mut self.kind
        {
            *matched = files_match(output, reference);
            if !*matched {
                self.failed = true;
            }
        }

        Ok(self.failed)
    }

    /// Append the case's full record to the report. Idempotent by
    /// convention: the runner calls it exactly once, after `run`.
    pub fn write_details(&self, log: &ReportLog) -> Result<()> {
        if let CaseKind::Malformed { message } = &self.kind {
            log.append(&format!("\n{message}"))?;
            return Ok(());
        }

        for stage in &self.stages {
            log.append(&format!("cmd: {}\n\n", stage.command_line()))?;
            log.append(&stage.output)?;
            log.append("\n")?;
            if stage.exit_code != 0 {
                log.append(&format!(
                    "ERROR: app failed with return code: {}",
                    stage.exit_code
                ))?;
                break;
            }
        }

        if let CaseKind::BitExact { matched, .. } = &self.kind {
            if !self.stage_failed() {
                let verdict = if *matched { "PASS" } else { "FAILED" };
                log.append(&format!(
                    "{verdict}\n---------VERIFICATION---------\nBit to bit comparing:\n"
                ))?;
            }
        }

        Ok(())
    }

    fn stage_failed(&self) -> bool {
        self.stages.iter().any(|s| s.exit_code != 0)
    }
}

/// Per-case io path: `<io_dir>/<4-digit case index>`; the binaries and the
/// bit-exact artifact pair add their own extensions
pub fn io_path(io_dir: &Path, case_id: usize) -> PathBuf {
    io_dir.join(format!("{case_id:04}"))
}

/// Byte compare of the artifact pair; a missing file on either side counts
/// as a mismatch rather than an error
fn files_match(a: &Path, b: &Path) -> bool {
    match (std::fs::read(a), std::fs::read(b)) {
        (Ok(left), Ok(right)) => left == right,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_yaml::Value;

    fn config_with(binaries: &[(&str, &str)]) -> Config {
        let mut config = Config::default();
        config.paths.io_dir = PathBuf::from("/tmp/io");
        for (name, path) in binaries {
            config
                .binaries
                .insert(name.to_string(), PathBuf::from(path));
        }
        config
    }

    fn raw(name: &str, entries: &[(&str, &str)]) -> RawCase {
        RawCase {
            label: String::new(),
            name: name.to_string(),
            entries: Some(
                entries
                    .iter()
                    .map(|(k, v)| (k.to_string(), Value::from(*v)))
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_io_path_is_zero_padded() {
        assert_eq!(
            io_path(Path::new("/tmp/io"), 7),
            PathBuf::from("/tmp/io/0007")
        );
        assert_eq!(
            io_path(Path::new("/tmp/io"), 1234),
            PathBuf::from("/tmp/io/1234")
        );
    }

    #[test]
    fn test_build_resolves_binaries_and_placeholder() {
        let config = config_with(&[("enc", "/opt/encoder")]);
        let case = TestCase::build(
            &raw("Case", &[("case type", "plain"), ("enc", "-o {path_to_io}.out")]),
            3,
            &config,
        );

        assert!(!case.failed);
        assert!(matches!(case.kind, CaseKind::Plain));
        assert_eq!(case.stages.len(), 1);
        assert_eq!(case.stages[0].binary, PathBuf::from("/opt/encoder"));
        assert_eq!(case.stages[0].args, "-o /tmp/io/0003.out");
    }

    #[test]
    fn test_build_bit_exact_pairs_artifacts_by_index() {
        let config = config_with(&[("enc", "/opt/encoder")]);
        let case = TestCase::build(
            &raw("Case", &[("case type", "bit-exact"), ("enc", "{path_to_io}")]),
            12,
            &config,
        );

        match &case.kind {
            CaseKind::BitExact {
                output, reference, ..
            } => {
                assert_eq!(output, &PathBuf::from("/tmp/io/0012.out"));
                assert_eq!(reference, &PathBuf::from("/tmp/io/0012.ref"));
            }
            other => panic!("expected BitExact, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_case_type_is_malformed() {
        let config = config_with(&[("enc", "/opt/encoder")]);
        let case = TestCase::build(&raw("Case", &[("enc", "-o {path_to_io}")]), 1, &config);

        assert!(case.failed);
        assert!(case.stages.is_empty());
        match &case.kind {
            CaseKind::Malformed { message } => {
                assert_eq!(message, "Case type is unidentified")
            }
            other => panic!("expected Malformed, got {:?}", other),
        }
    }

    #[test]
    fn test_selector_only_leaf_is_empty() {
        let config = config_with(&[]);
        let case = TestCase::build(&raw("Case", &[("case type", "plain")]), 1, &config);

        assert!(case.failed);
        assert!(
            matches!(&case.kind, CaseKind::Malformed { message } if message == "Test case is empty")
        );
    }

    #[test]
    fn test_empty_leaf_is_empty() {
        let config = config_with(&[]);
        let case = TestCase::build(&raw("Case", &[]), 1, &config);

        assert!(case.failed);
        assert!(
            matches!(&case.kind, CaseKind::Malformed { message } if message == "Test case is empty")
        );
    }

    #[test]
    fn test_non_mapping_leaf_is_malformed() {
        let config = config_with(&[]);
        let case = TestCase::build(
            &RawCase {
                label: String::new(),
                name: "Case".to_string(),
                entries: None,
            },
            1,
            &config,
        );

        assert!(case.failed);
        assert!(matches!(
            &case.kind,
            CaseKind::Malformed { message } if message == "Test case is not a mapping"
        ));
    }

    #[test]
    fn test_unknown_binary_id_is_malformed() {
        let config = config_with(&[]);
        let case = TestCase::build(
            &raw("Case", &[("case type", "plain"), ("enc", "-o {path_to_io}")]),
            1,
            &config,
        );

        assert!(case.failed);
        assert!(matches!(
            &case.kind,
            CaseKind::Malformed { message } if message == "Unknown binary id: enc"
        ));
    }

    #[test]
    fn test_unknown_case_type_is_malformed() {
        let config = config_with(&[("enc", "/opt/encoder")]);
        let case = TestCase::build(
            &raw("Case", &[("case type", "fuzzy"), ("enc", "x")]),
            1,
            &config,
        );

        assert!(case.failed);
        assert!(matches!(
            &case.kind,
            CaseKind::Malformed { message } if message == "Unknown case type: fuzzy"
        ));
    }

    #[test]
    fn test_non_string_stage_command_is_malformed() {
        let config = config_with(&[("enc", "/opt/encoder")]);
        let case = TestCase::build(
            &RawCase {
                label: String::new(),
                name: "Case".to_string(),
                entries: Some(vec![
                    ("case type".to_string(), Value::from("plain")),
                    ("enc".to_string(), Value::from(42)),
                ]),
            },
            1,
            &config,
        );

        assert!(case.failed);
        assert!(matches!(
            &case.kind,
            CaseKind::Malformed { message } if message == "Stage command is not a string"
        ));
    }

    #[test]
    fn test_combined_output_merges_and_trims() {
        assert_eq!(combined_output(b"out\n", b""), "out");
        assert_eq!(combined_output(b"", b"err\n"), "err");
        assert_eq!(combined_output(b"out\n", b"err\n"), "out\nerr");
        assert_eq!(combined_output(b"", b""), "");
    }

    #[test]
    fn test_files_match_treats_missing_files_as_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let present = dir.path().join("present");
        std::fs::write(&present, b"data").unwrap();

        assert!(!files_match(&present, &dir.path().join("absent")));
        assert!(!files_match(&dir.path().join("absent"), &present));
    }

    #[test]
    fn test_files_match_compares_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a");
        let b = dir.path().join("b");
        std::fs::write(&a, b"identical").unwrap();
        std::fs::write(&b, b"identical").unwrap();
        assert!(files_match(&a, &b));

        std::fs::write(&b, b"identicaX").unwrap();
        assert!(!files_match(&a, &b));
    }
}
