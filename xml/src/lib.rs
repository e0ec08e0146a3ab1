//! A standalone XML 1.0 engine for Qworum scripts.
//!
//! The `qworum-xml` crate parses XML text into a generic node tree,
//! writes a tree back to text, and resolves namespace prefixes through
//! an immutable scope chain. It knows nothing about Qworum instructions;
//! the `qworum-script` codec builds on it.
//!
//! # Parsing
//!
//! ```
//! let doc = qworum_xml::parse(r#"<call xmlns="urn:x" href="a/"/>"#)?;
//! assert_eq!(doc.root().attribute("href"), Some("a/"));
//! # Ok::<(), qworum_xml::SyntaxError>(())
//! ```
//!
//! # Writing
//!
//! ```
//! use qworum_xml::{write, Element};
//!
//! let e = Element::new("goto").with_attribute("href", "a&b\tc");
//! assert_eq!(write(&e)?, r#"<goto href="a&amp;b&#9;c"></goto>"#);
//! # Ok::<(), qworum_xml::WriteError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod namespace;
pub mod node;
pub mod parser;
mod scanner;
pub mod syntax;
pub mod writer;

pub use error::{SyntaxError, WriteError};
pub use namespace::{NamespaceScope, PrefixBinding};
pub use node::{Document, Element, Node, ProcessingInstruction, Space};
pub use parser::{parse, parse_with, EntityResolver, ParserOptions, DEFAULT_MAX_DEPTH};
pub use writer::{escape, escape_attribute, write, write_with, WriterOptions};
