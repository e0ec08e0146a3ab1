//! Concrete RDF syntaxes.

use std::fmt;
use std::str::FromStr;

use crate::error::RdfError;

/// One of the four supported RDF text syntaxes.
///
/// The default is TriG on every path: it is the only syntax that holds
/// both triples and named graphs while keeping prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RdfFormat {
    /// Turtle 1.1.
    Turtle,
    /// TriG 1.1.
    #[default]
    TriG,
    /// N-Triples 1.1.
    NTriples,
    /// N-Quads 1.1.
    NQuads,
}

impl RdfFormat {
    /// Every format, in name order.
    pub const ALL: [RdfFormat; 4] = [
        RdfFormat::Turtle,
        RdfFormat::TriG,
        RdfFormat::NTriples,
        RdfFormat::NQuads,
    ];

    /// The format name used on the wire (`semantic` element `type` attribute).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            RdfFormat::Turtle => "turtle",
            RdfFormat::TriG => "trig",
            RdfFormat::NTriples => "n-triples",
            RdfFormat::NQuads => "n-quads",
        }
    }

    /// The registered media type.
    #[must_use]
    pub fn media_type(self) -> &'static str {
        match self {
            RdfFormat::Turtle => "text/turtle",
            RdfFormat::TriG => "application/trig",
            RdfFormat::NTriples => "application/n-triples",
            RdfFormat::NQuads => "application/n-quads",
        }
    }

    /// The format registered for a `Content-Type` value, ignoring
    /// parameters such as `charset`.
    #[must_use]
    pub fn from_media_type(content_type: &str) -> Option<RdfFormat> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        RdfFormat::ALL
            .into_iter()
            .find(|f| f.media_type().eq_ignore_ascii_case(essence))
    }

    /// Whether the syntax can express named graphs.
    #[must_use]
    pub fn supports_named_graphs(self) -> bool {
        matches!(self, RdfFormat::TriG | RdfFormat::NQuads)
    }
}

impl FromStr for RdfFormat {
    type Err = RdfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RdfFormat::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| RdfError::UnknownFormat(s.to_owned()))
    }
}

impl fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
