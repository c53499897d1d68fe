//! Declarative smoke-test engine
//!
//! The suite file describes test cases as a nested mapping; the engine
//! flattens it into an ordered plan, runs each case as one or more
//! external-binary invocations, verifies by exit status or byte-exact
//! artifact comparison, and writes an append-only run report.

pub mod case;
pub mod driver;
pub mod plan;
pub mod report;
pub mod runner;

pub use case::{CaseKind, Stage, TestCase};
pub use driver::{run, RunExit};
pub use plan::{flatten, load_suite, RawCase};
pub use report::ReportLog;
pub use runner::TestRunner;
