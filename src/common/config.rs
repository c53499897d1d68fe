//! Configuration file handling
//!
//! The configuration supplies everything the engine needs from the outside:
//! the binary lookup table, the transient io directory, the report log path,
//! and the suite file holding the nested test-case tree. It is loaded once
//! and passed down explicitly; nothing reads ambient process-wide state.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Short binary identifiers mapped to executable paths.
    ///
    /// Stage keys in suite leaves resolve against this table. Paths may be
    /// absolute, relative to the working directory, or bare names looked up
    /// on PATH.
    #[serde(default)]
    pub binaries: BTreeMap<String, PathBuf>,

    /// Filesystem locations for one run
    #[serde(default)]
    pub paths: Paths,

    /// Artifact naming for bit-exact verification
    #[serde(default)]
    pub artifacts: Artifacts,
}

/// Filesystem locations for one run
#[derive(Debug, Deserialize)]
pub struct Paths {
    /// Working directory for per-case artifacts; recreated at run start
    /// and removed at run end
    #[serde(default = "default_io_dir")]
    pub io_dir: PathBuf,

    /// Append-only report log, cleared at run start
    #[serde(default = "default_log")]
    pub log: PathBuf,

    /// Suite file with the nested test-case tree
    #[serde(default = "default_suite")]
    pub suite: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            io_dir: default_io_dir(),
            log: default_log(),
            suite: default_suite(),
        }
    }
}

fn default_io_dir() -> PathBuf {
    PathBuf::from("io")
}
fn default_log() -> PathBuf {
    PathBuf::from("smoke.log")
}
fn default_suite() -> PathBuf {
    PathBuf::from("suite.yaml")
}

/// Extensions of the artifact pair compared by bit-exact cases
#[derive(Debug, Deserialize)]
pub struct Artifacts {
    /// Extension of the artifact the binaries produce
    #[serde(default = "default_output_ext")]
    pub output_ext: String,

    /// Extension of the reference artifact it is compared against
    #[serde(default = "default_reference_ext")]
    pub reference_ext: String,
}

impl Default for Artifacts {
    fn default() -> Self {
        Self {
            output_ext: default_output_ext(),
            reference_ext: default_reference_ext(),
        }
    }
}

fn default_output_ext() -> String {
    "out".to_string()
}
fn default_reference_ext() -> String {
    "ref".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// The io directory, log, and suite paths are resolved relative to the
    /// configuration file's directory; binary paths are left untouched so
    /// bare names still resolve through PATH.
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::file_read(path, &e))?;
        let mut config: Config =
            toml::from_str(&content).map_err(|e| Error::ConfigParse(e.to_string()))?;
        if let Some(base) = path.parent() {
            config.resolve_relative(base);
        }
        Ok(config)
    }

    fn resolve_relative(&mut self, base: &Path) {
        for path in [
            &mut self.paths.io_dir,
            &mut self.paths.log,
            &mut self.paths.suite,
        ] {
            if path.is_relative() {
                *path = base.join(path.as_path());
            }
        }
    }
}
