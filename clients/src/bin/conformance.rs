//! `qworum-conformance`: runs the interoperability suite.
//!
//! Checks the golden fixtures, the fault taxonomy and, optionally, a
//! directory of XML/JSON pairs written by another implementation.
//!
//! **Usage:**
//! ```text
//! qworum-conformance [--artifacts <dir>] [--json] [--verbose]
//! ```
//!
//! Exits non-zero if any check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use qworum_clients::init_logging;
use qworum_conformance::{run_all, Severity, SuiteOptions};

/// Run the Qworum conformance suite.
#[derive(Parser)]
#[command(
    name = "qworum-conformance",
    version,
    about = "Check script encoding against golden fixtures and external artifacts"
)]
struct Args {
    /// Directory of `name.xml`/`name.json` pairs to check as well.
    #[arg(long)]
    artifacts: Option<PathBuf>,

    /// Print the report as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Log at debug level.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let report = run_all(&SuiteOptions {
        artifacts: args.artifacts,
    })?;

    if args.json {
        let text = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
        println!("{text}");
    } else {
        println!("Qworum Conformance Report");
        println!("=========================");
        println!();
        for result in &report.results {
            println!("{result}");
        }
        println!();
        println!(
            "Summary: {} passed, {} warnings, {} failed",
            report.count(Severity::Pass),
            report.count(Severity::Warning),
            report.failure_count()
        );
    }

    if !report.all_passed() {
        eprintln!("Conformance FAILED: {} check(s) did not pass.", report.failure_count());
        process::exit(1);
    }
    if !args.json {
        println!("Conformance PASSED.");
    }
    Ok(())
}
