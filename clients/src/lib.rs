//! Shared plumbing for the Qworum command-line tools.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::fmt;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use qworum_script::{DataValue, Script};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Installs the stderr log subscriber. `RUST_LOG` refines the default
/// level, which is `info`, or `debug` when `verbose` is set.
pub fn init_logging(verbose: bool) {
    let level = if verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    let filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Wire format of an input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// An XML document.
    Xml,
    /// JSON text of the jsonable form.
    Json,
}

impl Syntax {
    /// XML when the first non-whitespace character is `<`, JSON otherwise.
    #[must_use]
    pub fn detect(text: &str) -> Self {
        if text.trim_start_matches('\u{feff}').trim_start().starts_with('<') {
            Syntax::Xml
        } else {
            Syntax::Json
        }
    }
}

/// A decoded input: a whole script or a standalone data value.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// A script.
    Script(Script),
    /// A data value.
    Data(DataValue),
}

impl Document {
    /// Decodes `text`, auto-detecting its syntax. `data` selects a
    /// standalone data value instead of a script.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid JSON or does not decode.
    pub fn decode(text: &str, data: bool) -> Result<Self> {
        let syntax = Syntax::detect(text);
        tracing::debug!(?syntax, data, "decoding input");
        match syntax {
            Syntax::Xml => {
                if data {
                    Ok(Document::Data(DataValue::from_xml(text)?))
                } else {
                    Ok(Document::Script(Script::from_xml(text)?))
                }
            }
            Syntax::Json => {
                let tree: serde_json::Value =
                    serde_json::from_str(text).context("Input is neither XML nor JSON")?;
                if data {
                    Ok(Document::Data(DataValue::from_jsonable(&tree)?))
                } else {
                    Ok(Document::Script(Script::from_jsonable(&tree)?))
                }
            }
        }
    }

    /// Pretty-printed JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree cannot be serialized.
    pub fn to_json(&self) -> Result<String> {
        let tree = match self {
            Document::Script(s) => s.to_jsonable(),
            Document::Data(d) => d.to_jsonable(),
        };
        serde_json::to_string_pretty(&tree).context("Failed to serialize JSON")
    }

    /// XML document text.
    ///
    /// # Errors
    ///
    /// Returns an error if embedded semantic data cannot be written, or a
    /// string holds a character XML cannot carry.
    pub fn to_xml(&self) -> Result<String> {
        let xml = match self {
            Document::Script(s) => s.to_xml(),
            Document::Data(d) => d.to_xml(),
        };
        xml.context("Failed to write XML")
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Document::Script(s) => s.fmt(f),
            Document::Data(d) => d.fmt(f),
        }
    }
}

/// Reads `path`, or standard input when it is `-`.
///
/// # Errors
///
/// Returns an error if the input cannot be read as UTF-8 text.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read standard input")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CALL_XML: &str =
        r#"<call xmlns="https://qworum.net/ns/v1/instruction/" href="home/"></call>"#;

    #[test]
    fn detects_syntax_by_first_character() {
        assert_eq!(Syntax::detect("  \n<call/>"), Syntax::Xml);
        assert_eq!(Syntax::detect("\u{feff}<?xml version=\"1.0\"?>"), Syntax::Xml);
        assert_eq!(Syntax::detect(r#"{"type": "goto"}"#), Syntax::Json);
        assert_eq!(Syntax::detect(""), Syntax::Json);
    }

    #[test]
    fn converts_between_formats() {
        let doc = Document::decode(CALL_XML, false).expect("decodes");
        assert_eq!(doc.to_string(), "Call(object: [@], href: home/)");

        let json = doc.to_json().expect("json");
        let back = Document::decode(&json, false).expect("decodes JSON");
        assert_eq!(back, doc);
        assert_eq!(
            back.to_xml().expect("xml"),
            r#"<call xmlns="https://qworum.net/ns/v1/instruction/" object="[&quot;@&quot;]" href="home/"></call>"#
        );
    }

    #[test]
    fn data_values_are_opt_in() {
        let text = r#"{"type": "https://qworum.net/ns/v1/data/ json", "value": [1, 2]}"#;
        assert!(Document::decode(text, false).is_err());
        let doc = Document::decode(text, true).expect("decodes");
        assert_eq!(doc.to_string(), "Json([1,2])");
        assert_eq!(
            doc.to_xml().expect("xml"),
            r#"<json xmlns="https://qworum.net/ns/v1/data/">[1,2]</json>"#
        );
    }

    #[test]
    fn garbage_is_reported_as_such() {
        let err = Document::decode("not a script", false).expect_err("rejected");
        assert_eq!(err.to_string(), "Input is neither XML nor JSON");
    }

    #[test]
    fn reads_files() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("call.xml");
        std::fs::write(&path, CALL_XML).expect("writes");
        assert_eq!(read_input(&path).expect("reads"), CALL_XML);
        assert!(read_input(&dir.path().join("missing.xml")).is_err());
    }
}
