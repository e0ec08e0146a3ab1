//! The RDF store adapter: semantic data values, their terms and syntaxes.

mod bridge;
#[cfg(feature = "fetch")]
mod fetch;
pub mod format;
pub mod prefixes;
mod semantic;
pub mod term;

#[cfg(feature = "fetch")]
pub use fetch::FetchConfig;
pub use format::RdfFormat;
pub use semantic::SemanticData;
pub use term::{Literal, RdfQuad, RdfTerm};
