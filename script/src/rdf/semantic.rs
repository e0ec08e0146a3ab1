//! The semantic data value: an insertion-ordered RDF dataset that is read
//! from RDF text, quads or a URL and written back in any [`RdfFormat`].

use std::fmt;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, warn};
use url::Url;

use super::prefixes::DEFAULT_PREFIXES;
use super::{bridge, RdfFormat, RdfQuad};
use crate::error::RdfError;

/// An RDF dataset carried as a data value.
///
/// Quads are kept in insertion order and duplicates collapse. Ingestion
/// takes `&mut self`, so at most one read is in flight per value. A read
/// that fails part-way keeps the quads it had already added.
///
/// Blank node labels are those chosen by the parser; serializing and
/// re-reading may rename them.
#[derive(Debug, Clone)]
pub struct SemanticData {
    store: IndexSet<RdfQuad>,
    prefixes: IndexMap<String, String>,
}

impl SemanticData {
    /// Wire tag.
    pub const TAG: &'static str = "semantic";

    /// An empty dataset with the default prefixes.
    #[must_use]
    pub fn build() -> Self {
        Self {
            store: IndexSet::new(),
            prefixes: DEFAULT_PREFIXES
                .iter()
                .map(|(p, iri)| ((*p).to_owned(), (*iri).to_owned()))
                .collect(),
        }
    }

    /// Adds or replaces a prefix used when writing Turtle and TriG.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into(), iri.into());
        self
    }

    /// Prefix to namespace map, in declaration order.
    #[must_use]
    pub fn prefixes(&self) -> &IndexMap<String, String> {
        &self.prefixes
    }

    /// The quads, in insertion order.
    pub fn quads(&self) -> impl ExactSizeIterator<Item = &RdfQuad> + '_ {
        self.store.iter()
    }

    /// Number of distinct quads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Whether the dataset holds no quad.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Whether `quad` is in the dataset.
    #[must_use]
    pub fn contains(&self, quad: &RdfQuad) -> bool {
        self.store.contains(quad)
    }

    /// Parses `text` as TriG, which also accepts Turtle and N-Triples
    /// documents, resolving relative IRIs against `base`.
    ///
    /// Returns the number of quads added.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::InvalidBase`] when `base` is not absolute,
    /// [`RdfError::Syntax`] when the text is malformed.
    pub fn read_from_text(&mut self, text: &str, base: Option<&str>) -> Result<usize, RdfError> {
        self.read_from_text_as(RdfFormat::TriG, text, base)
    }

    /// Parses `text` in `format`, resolving relative IRIs against `base`.
    ///
    /// Returns the number of quads added.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::InvalidBase`] when `base` is not absolute,
    /// [`RdfError::Syntax`] when the text is malformed, and
    /// [`RdfError::InvalidTerm`] for a parsed term in a position RDF does
    /// not allow.
    pub fn read_from_text_as(
        &mut self,
        format: RdfFormat,
        text: &str,
        base: Option<&str>,
    ) -> Result<usize, RdfError> {
        let resolver = base.map(parse_base).transpose()?;
        let before = self.store.len();
        let store = &mut self.store;
        let result = bridge::parse(format, text, base, |quad| {
            store.insert(match &resolver {
                Some(base) => quad.resolve(base),
                None => quad,
            });
        });
        let added = self.store.len() - before;
        match result {
            Ok(()) => {
                debug!(%format, base, added, "read semantic data");
                Ok(added)
            }
            Err(err) => {
                warn!(%format, base, added, error = %err, "semantic data ingestion aborted");
                Err(err)
            }
        }
    }

    /// Adds already-decoded quads, resolving relative IRIs against `base`.
    ///
    /// Returns the number of quads added.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::InvalidBase`] when `base` is not absolute.
    pub fn read_from_quads(
        &mut self,
        quads: impl IntoIterator<Item = RdfQuad>,
        base: Option<&str>,
    ) -> Result<usize, RdfError> {
        let resolver = base.map(parse_base).transpose()?;
        let before = self.store.len();
        for quad in quads {
            self.store.insert(match &resolver {
                Some(base) => quad.resolve(base),
                None => quad,
            });
        }
        Ok(self.store.len() - before)
    }

    /// Fetches `url` and reads it with the fetched URL as base.
    ///
    /// The syntax is taken from the response's `Content-Type` when it names
    /// one of the supported formats, and is TriG otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::Fetch`] when the request fails or the server
    /// answers with an error status, and the errors of
    /// [`SemanticData::read_from_text_as`] for the body.
    #[cfg(feature = "fetch")]
    pub async fn read_from_url(&mut self, url: &str) -> Result<usize, RdfError> {
        self.read_from_url_with(url, &super::FetchConfig::default())
            .await
    }

    /// [`SemanticData::read_from_url`] with explicit HTTP settings.
    ///
    /// # Errors
    ///
    /// As [`SemanticData::read_from_url`].
    #[cfg(feature = "fetch")]
    pub async fn read_from_url_with(
        &mut self,
        url: &str,
        config: &super::FetchConfig,
    ) -> Result<usize, RdfError> {
        let fetched = super::fetch::fetch(url, config).await?;
        self.read_from_text_as(
            fetched.format.unwrap_or_default(),
            &fetched.body,
            Some(&fetched.url),
        )
    }

    /// Writes the dataset in `format`.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::NamedGraphInTripleFormat`] when `format` cannot
    /// express a named graph the dataset uses, and [`RdfError::Serialize`]
    /// when a prefix is invalid or the serializer fails.
    pub fn to_raw_string(&self, format: RdfFormat) -> Result<String, RdfError> {
        bridge::serialize(
            format,
            &self.store,
            self.prefixes.iter().map(|(p, iri)| (p.as_str(), iri.as_str())),
        )
    }
}

impl Default for SemanticData {
    fn default() -> Self {
        Self::build()
    }
}

impl FromIterator<RdfQuad> for SemanticData {
    fn from_iter<I: IntoIterator<Item = RdfQuad>>(iter: I) -> Self {
        let mut data = Self::build();
        data.store.extend(iter);
        data
    }
}

/// Two datasets are equal when they hold the same quads, in any order.
/// Prefixes only affect serialization and are not compared.
impl PartialEq for SemanticData {
    fn eq(&self, other: &Self) -> bool {
        self.store == other.store
    }
}

impl fmt::Display for SemanticData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.store.is_empty() {
            return f.write_str("SemanticData()");
        }
        f.write_str("SemanticData(\n")?;
        for quad in &self.store {
            writeln!(f, "  {quad}")?;
        }
        f.write_str(")")
    }
}

fn parse_base(base: &str) -> Result<Url, RdfError> {
    Url::parse(base).map_err(|e| RdfError::InvalidBase {
        iri: base.to_owned(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::{Literal, RdfTerm};

    #[test]
    fn starts_with_default_prefixes() {
        let data = SemanticData::build().with_prefix("foaf", crate::rdf::prefixes::FOAF);
        let prefixes: Vec<_> = data.prefixes().keys().map(String::as_str).collect();
        assert_eq!(prefixes, ["rdf", "rdfs", "xsd", "schema", "foaf"]);
        assert!(data.is_empty());
        assert_eq!(data.to_string(), "SemanticData()");
    }

    #[test]
    fn n_quads_ingestion_with_base() {
        let mut data = SemanticData::build();
        let added = data
            .read_from_text_as(
                RdfFormat::NQuads,
                "<urn:a> <urn:b> <urn:c> .",
                Some("https://example/"),
            )
            .expect("reads");
        assert_eq!(added, 1);
        let quad = data.quads().next().expect("one quad");
        assert_eq!(quad.subject(), &RdfTerm::iri("urn:a"));
        assert_eq!(quad.predicate(), &RdfTerm::iri("urn:b"));
        assert_eq!(quad.object(), &RdfTerm::iri("urn:c"));

        let text = data.to_raw_string(RdfFormat::NQuads).expect("writes");
        let mut back = SemanticData::build();
        back.read_from_text_as(RdfFormat::NQuads, &text, None)
            .expect("reads back");
        assert_eq!(back, data);
    }

    #[test]
    fn relative_iris_resolve_against_base() {
        let mut data = SemanticData::build();
        data.read_from_text("<a> <b> <c> .", Some("https://example.org/dir/doc"))
            .expect("reads");
        let quad = data.quads().next().expect("one quad");
        assert_eq!(quad.subject(), &RdfTerm::iri("https://example.org/dir/a"));
    }

    #[test]
    fn duplicates_collapse() {
        let mut data = SemanticData::build();
        let text = "<urn:a> <urn:b> \"x\" .\n<urn:a> <urn:b> \"x\" .";
        assert_eq!(data.read_from_text(text, None).expect("reads"), 1);
        assert_eq!(data.read_from_text(text, None).expect("reads"), 0);
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn failed_ingestion_keeps_earlier_quads() {
        let mut data = SemanticData::build();
        let err = data
            .read_from_text_as(
                RdfFormat::NQuads,
                "<urn:a> <urn:b> <urn:c> .\n<urn:a> <urn:b>",
                None,
            )
            .expect_err("second line is truncated");
        assert!(matches!(err, RdfError::Syntax { .. }));
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn invalid_base() {
        let mut data = SemanticData::build();
        assert!(matches!(
            data.read_from_text("", Some("relative/path")),
            Err(RdfError::InvalidBase { .. })
        ));
    }

    #[test]
    fn equality_ignores_prefixes_and_order() {
        let q1 = RdfQuad::triple(
            RdfTerm::iri("urn:a"),
            RdfTerm::iri("urn:b"),
            RdfTerm::literal(Literal::simple("1")),
        )
        .expect("valid");
        let q2 = RdfQuad::triple(
            RdfTerm::iri("urn:a"),
            RdfTerm::iri("urn:b"),
            RdfTerm::iri("urn:c"),
        )
        .expect("valid");
        let a: SemanticData = [q1.clone(), q2.clone()].into_iter().collect();
        let b = [q2, q1]
            .into_iter()
            .collect::<SemanticData>()
            .with_prefix("ex", "urn:");
        assert_eq!(a, b);
    }

    #[test]
    fn default_format_is_trig() {
        let mut data = SemanticData::build();
        data.read_from_text_as(RdfFormat::NQuads, "<urn:a> <urn:b> <urn:c> <urn:g> .", None)
            .expect("reads");
        let trig = data.to_raw_string(RdfFormat::default()).expect("trig");
        let mut back = SemanticData::build();
        back.read_from_text(&trig, None).expect("reads back");
        assert_eq!(back, data);
        assert!(matches!(
            data.to_raw_string(RdfFormat::Turtle),
            Err(RdfError::NamedGraphInTripleFormat { .. })
        ));
    }
}
