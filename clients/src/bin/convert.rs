//! `qworum-convert`: converts Qworum scripts between XML and JSON.
//!
//! **Usage:**
//! ```text
//! qworum-convert to-json <file>
//! qworum-convert to-xml <file>
//! qworum-convert show <file>
//! ```
//!
//! The input syntax is detected from its first character; `-` reads
//! standard input. `--data` treats the input as a standalone data value.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use qworum_clients::{init_logging, read_input, Document};
use tracing::info;

/// Convert and inspect Qworum scripts.
#[derive(Parser)]
#[command(name = "qworum-convert", version, about = "Convert Qworum scripts between XML and JSON")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Treat the input as a data value rather than a script.
    #[arg(long, global = true)]
    data: bool,

    /// Log at debug level.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Print the JSON form.
    ToJson {
        /// Input file, or `-` for standard input.
        input: PathBuf,
    },
    /// Print the XML form.
    ToXml {
        /// Input file, or `-` for standard input.
        input: PathBuf,
    },
    /// Print the informational form.
    Show {
        /// Input file, or `-` for standard input.
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let (Command::ToJson { input } | Command::ToXml { input } | Command::Show { input }) =
        &args.command;
    let text = read_input(input)?;
    let document = Document::decode(&text, args.data)
        .with_context(|| format!("Failed to decode {}", input.display()))?;
    info!(input = %input.display(), "decoded");

    let output = match args.command {
        Command::ToJson { .. } => document.to_json()?,
        Command::ToXml { .. } => document.to_xml()?,
        Command::Show { .. } => document.to_string(),
    };
    println!("{output}");
    Ok(())
}
