//! The Qworum script model and its two wire codecs.
//!
//! A script is a tree of instructions (call, goto, return, sequence, data,
//! try, fault) carrying data values (JSON or RDF semantic data). Scripts
//! are built through validating builders and exchanged either as XML
//! documents or as JSON object trees; both codecs round-trip every
//! constructible script.
//!
//! # Building and encoding
//!
//! ```
//! use qworum_script::{Call, Json, Script};
//!
//! let call = Call::build(&["@", "cart"], Some("../cart/"))
//!     .with_parameter("item", Json::build(&42)?);
//! let script = Script::build(call);
//!
//! let xml = script.to_xml()?;
//! assert_eq!(Script::from_xml(&xml)?, script);
//! assert_eq!(Script::from_jsonable(&script.to_jsonable())?, script);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Faults
//!
//! Fault types are classified by [`fault::classify`]; catch clauses match
//! whole categories by naming them:
//!
//! ```
//! use qworum_script::Fault;
//!
//! let fault = Fault::build(Some("* empty cart"))?;
//! assert!(fault.matches(&["service-specific"]));
//! assert!(!fault.matches(&["user-agent"]));
//! # Ok::<(), qworum_script::FaultTypeError>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod codec;
pub mod error;
pub mod fault;
pub mod model;
pub mod rdf;

pub use error::{DecodeError, EncodeError, FaultTypeError, RdfError, ValidationError};
pub use model::{
    Call, CatchClause, Data, DataValue, Fault, Goto, Instruction, Json, NonEmpty, ObjectParameter,
    Parameter, PlatformFault, Return, Script, Sequence, Statement, Try, CURRENT_OBJECT,
    DATA_NAMESPACE, INSTRUCTION_NAMESPACE,
};
pub use rdf::{RdfFormat, RdfQuad, RdfTerm, SemanticData};
