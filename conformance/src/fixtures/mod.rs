//! Golden scripts, each given in both wire formats.
//!
//! The XML side is written the way another implementation might emit it
//! (prefixed data elements, self-closing tags, comments, CDATA), so
//! decoding it exercises more than the canonical form this crate writes.
//! The JSON side is the exact object tree both decoders must produce.

mod call;
mod data;
mod semantic;
mod sequence;
mod try_catch;

pub use call::CALL;
pub use data::DATA_WRITE;
pub use semantic::SEMANTIC_RETURN;
pub use sequence::SEQUENCE_OF_FAULTS;
pub use try_catch::TRY_CATCH;

/// One script in both wire formats.
#[derive(Debug, Clone, Copy)]
pub struct Fixture {
    /// Short name used in result messages.
    pub name: &'static str,
    /// XML document text.
    pub xml: &'static str,
    /// JSON text of the jsonable form.
    pub json: &'static str,
}

/// Every fixture, in report order.
pub const ALL: &[Fixture] = &[CALL, DATA_WRITE, TRY_CATCH, SEQUENCE_OF_FAULTS, SEMANTIC_RETURN];
