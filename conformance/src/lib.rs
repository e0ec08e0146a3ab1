//! Qworum script interoperability suite.
//!
//! Scripts travel between implementations as XML documents or JSON object
//! trees. This crate checks that this implementation reads and writes both
//! forms the way the rest of the ecosystem does.
//!
//! # Checks
//!
//! | Validator | What it checks |
//! |-----------|----------------|
//! | `codec/*` | golden fixtures decode from both formats, agree, and re-encode losslessly |
//! | `faults` | fault type classification and category matching |
//! | `artifacts` | XML/JSON pairs produced by another implementation |
//!
//! # Entry Point
//!
//! ```no_run
//! use qworum_conformance::{run_all, SuiteOptions};
//! use std::path::PathBuf;
//!
//! let options = SuiteOptions {
//!     artifacts: Some(PathBuf::from("interop")),
//! };
//! let report = run_all(&options)?;
//! assert!(report.all_passed());
//! # Ok::<(), anyhow::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod fixtures;
pub mod report;
pub mod validators;

use std::path::PathBuf;

pub use report::{ConformanceReport, Severity, TestResult};

/// Inputs of a suite run.
#[derive(Debug, Clone, Default)]
pub struct SuiteOptions {
    /// Directory of XML/JSON pairs written by another implementation.
    pub artifacts: Option<PathBuf>,
}

/// Runs every validator and returns the aggregated report.
///
/// Validators run in this order:
/// 1. Golden fixtures through both codecs
/// 2. Fault taxonomy
/// 3. External artifacts, when a directory is given
///
/// # Errors
///
/// Returns an error only if a file system operation fails.
pub fn run_all(options: &SuiteOptions) -> anyhow::Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    report.extend(validators::codec::validate());
    report.extend(validators::faults::validate());
    if let Some(dir) = &options.artifacts {
        report.extend(validators::artifacts::validate(dir)?);
    }

    tracing::debug!(
        checks = report.results.len(),
        failures = report.failure_count(),
        "conformance run finished"
    );
    Ok(report)
}
