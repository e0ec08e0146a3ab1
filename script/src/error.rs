//! Error types for script construction, decoding and semantic data.

use qworum_xml::{SyntaxError, WriteError};
use thiserror::Error;

use crate::rdf::RdfFormat;

/// A builder rejected its arguments. Nothing is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A list that must hold at least one element was empty.
    #[error("{what} must contain at least one element")]
    Empty {
        /// What the list is, e.g. `"sequence"`.
        what: &'static str,
    },
    /// A fault type was not allowed where it was used.
    #[error(transparent)]
    FaultType(#[from] FaultTypeError),
    /// A `Json` value could not be represented as JSON.
    #[error("value cannot be converted to JSON: {0}")]
    NotJson(String),
}

/// A fault type outside the set permitted by its builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FaultTypeError {
    /// `Fault` only carries service-specific types.
    #[error("not a service-specific fault: '{0}'")]
    NotServiceSpecific(String),
    /// `PlatformFault` only carries platform types.
    #[error("not a platform fault: '{0}'")]
    NotPlatform(String),
    /// A catch clause named a type that no fault can have.
    #[error("not a valid fault type: \"{0}\"")]
    InvalidCatchType(String),
}

/// An encoded script, statement or data value could not be decoded.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The `type` tag names no known instruction or data value.
    #[error("not a valid statement: unknown type `{0}`")]
    UnknownTag(String),
    /// The JSON form is not a `{ "type": ..., "value": ... }` object.
    #[error("not a valid statement: expected an object with a string `type`")]
    NotTagged,
    /// The element's namespace and local name identify no known variant.
    #[error("not a valid statement: unknown element `{name}` in namespace {namespace:?}")]
    UnknownElement {
        /// Qualified element name as written.
        name: String,
        /// Resolved namespace, if the prefix was bound.
        namespace: Option<String>,
    },
    /// A data value appeared where only an instruction is allowed.
    #[error("expected an instruction, found a data value")]
    NotAnInstruction,
    /// An instruction appeared where only a data value is allowed.
    #[error("expected a data value, found an instruction")]
    NotADataValue,
    /// A required field or attribute is absent.
    #[error("{context}: missing `{field}`")]
    MissingField {
        /// The construct being decoded.
        context: &'static str,
        /// The absent field.
        field: &'static str,
    },
    /// A field or attribute is present but malformed.
    #[error("{context}: invalid `{field}`: {reason}")]
    InvalidField {
        /// The construct being decoded.
        context: &'static str,
        /// The malformed field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// Content that the construct does not allow, e.g. stray text.
    #[error("{context}: unexpected {found}")]
    UnexpectedContent {
        /// The construct being decoded.
        context: &'static str,
        /// Description of the offending content.
        found: String,
    },
    /// The decoded operands were rejected by the builder.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The XML text is not well-formed.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    /// The embedded semantic data is invalid.
    #[error(transparent)]
    Rdf(#[from] RdfError),
}

impl From<FaultTypeError> for DecodeError {
    fn from(err: FaultTypeError) -> Self {
        DecodeError::Validation(err.into())
    }
}

/// A script or data value could not be written as XML text.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Embedded semantic data could not be serialized.
    #[error(transparent)]
    Rdf(#[from] RdfError),
    /// A string holds a character that XML cannot carry.
    #[error(transparent)]
    Xml(#[from] WriteError),
}

/// Semantic data could not be read, built or written.
#[derive(Debug, Error)]
pub enum RdfError {
    /// The format name is not one of the four supported syntaxes.
    #[error("unknown RDF format `{0}` (expected turtle, trig, n-triples or n-quads)")]
    UnknownFormat(String),
    /// The text is not valid in the requested syntax.
    #[error("error while parsing semantic data as {format}: {message}")]
    Syntax {
        /// Grammar used for parsing.
        format: RdfFormat,
        /// Parser diagnostic.
        message: String,
    },
    /// The base IRI is not an absolute IRI.
    #[error("invalid base IRI `{iri}`: {message}")]
    InvalidBase {
        /// The rejected base.
        iri: String,
        /// Why it was rejected.
        message: String,
    },
    /// A term is not allowed in a quad position.
    #[error("invalid {position}: {term}")]
    InvalidTerm {
        /// `subject`, `predicate`, `object` or `graph`.
        position: &'static str,
        /// The offending term.
        term: String,
    },
    /// A JSON term object is malformed.
    #[error("invalid term encoding: {0}")]
    Encoding(String),
    /// A triple-only syntax was requested for data with named graphs.
    #[error("{format} cannot represent the named graph {graph}")]
    NamedGraphInTripleFormat {
        /// The triple-only syntax.
        format: RdfFormat,
        /// The first named graph found.
        graph: String,
    },
    /// The serializer failed.
    #[error("cannot serialize semantic data as {format}: {message}")]
    Serialize {
        /// Requested syntax.
        format: RdfFormat,
        /// Serializer diagnostic.
        message: String,
    },
    /// The remote document could not be retrieved.
    #[cfg(feature = "fetch")]
    #[error("cannot fetch {url}: {source}")]
    Fetch {
        /// The requested URL.
        url: String,
        /// The underlying HTTP error, passed through verbatim.
        #[source]
        source: reqwest::Error,
    },
}
