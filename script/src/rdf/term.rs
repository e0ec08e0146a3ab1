//! RDF terms and quads, in the RDF/JS data model.

use std::fmt;

use serde_json::{json, Map, Value};
use url::Url;

use crate::error::RdfError;

/// `xsd:string`, the datatype of simple literals.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// `rdf:langString`, the datatype of language-tagged literals.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// A node in a quad.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RdfTerm {
    /// An IRI.
    NamedNode(String),
    /// A blank node label, without `_:`.
    BlankNode(String),
    /// A literal.
    Literal(Literal),
    /// The default graph, valid only in graph position.
    DefaultGraph,
    /// A quoted triple. Its graph is always the default graph.
    Quad(Box<RdfQuad>),
}

/// A literal value with either a language tag or a datatype.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Literal {
    /// Lexical form.
    pub value: String,
    /// Language tag, for `rdf:langString` literals.
    pub language: Option<String>,
    /// Datatype IRI.
    pub datatype: String,
}

impl Literal {
    /// An `xsd:string` literal.
    pub fn simple(value: impl Into<String>) -> Self {
        Self::typed(value, XSD_STRING)
    }

    /// A literal of the given datatype.
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: None,
            datatype: datatype.into(),
        }
    }

    /// A language-tagged string.
    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            language: Some(language.into()),
            datatype: RDF_LANG_STRING.to_owned(),
        }
    }
}

impl RdfTerm {
    /// A named node.
    pub fn iri(iri: impl Into<String>) -> Self {
        RdfTerm::NamedNode(iri.into())
    }

    /// A blank node.
    pub fn blank(label: impl Into<String>) -> Self {
        RdfTerm::BlankNode(label.into())
    }

    /// A literal.
    #[must_use]
    pub fn literal(literal: Literal) -> Self {
        RdfTerm::Literal(literal)
    }

    /// The RDF/JS `termType` of this term.
    #[must_use]
    pub fn term_type(&self) -> &'static str {
        match self {
            RdfTerm::NamedNode(_) => "NamedNode",
            RdfTerm::BlankNode(_) => "BlankNode",
            RdfTerm::Literal(_) => "Literal",
            RdfTerm::DefaultGraph => "DefaultGraph",
            RdfTerm::Quad(_) => "Quad",
        }
    }

    /// Resolves named nodes and literal datatypes against `base`. Absolute
    /// IRIs are kept verbatim; blank nodes and the default graph pass through.
    #[must_use]
    pub fn resolve(&self, base: &Url) -> RdfTerm {
        match self {
            RdfTerm::NamedNode(iri) => RdfTerm::NamedNode(resolve_iri(iri, base)),
            RdfTerm::Literal(l) if l.language.is_none() => RdfTerm::Literal(Literal {
                value: l.value.clone(),
                language: None,
                datatype: resolve_iri(&l.datatype, base),
            }),
            RdfTerm::Quad(q) => RdfTerm::Quad(Box::new(q.resolve(base))),
            other => other.clone(),
        }
    }

    /// Encodes this term as an RDF/JS term object.
    #[must_use]
    pub fn to_jsonable(&self) -> Value {
        match self {
            RdfTerm::NamedNode(v) | RdfTerm::BlankNode(v) => {
                json!({ "termType": self.term_type(), "value": v })
            }
            RdfTerm::Literal(l) => json!({
                "termType": "Literal",
                "value": l.value,
                "language": l.language.as_deref().unwrap_or(""),
                "datatype": l.datatype,
            }),
            RdfTerm::DefaultGraph => json!({ "termType": "DefaultGraph", "value": "" }),
            RdfTerm::Quad(q) => q.to_jsonable(),
        }
    }

    /// Decodes an RDF/JS term object.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::Encoding`] when the object is malformed.
    pub fn from_jsonable(value: &Value) -> Result<Self, RdfError> {
        let object = value
            .as_object()
            .ok_or_else(|| RdfError::Encoding(format!("term is not an object: {value}")))?;
        let term_type = str_field(object, "termType")?;
        match term_type {
            "NamedNode" => Ok(RdfTerm::NamedNode(str_field(object, "value")?.to_owned())),
            "BlankNode" => Ok(RdfTerm::BlankNode(str_field(object, "value")?.to_owned())),
            "DefaultGraph" => Ok(RdfTerm::DefaultGraph),
            "Literal" => {
                let value = str_field(object, "value")?.to_owned();
                let language = object
                    .get("language")
                    .and_then(Value::as_str)
                    .filter(|l| !l.is_empty());
                let datatype = object.get("datatype").and_then(datatype_iri);
                Ok(RdfTerm::Literal(match (language, datatype) {
                    (Some(l), _) => Literal::lang(value, l),
                    (None, Some(dt)) => Literal::typed(value, dt),
                    (None, None) => Literal::simple(value),
                }))
            }
            "Quad" => Ok(RdfTerm::Quad(Box::new(RdfQuad::from_jsonable(value)?))),
            other => Err(RdfError::Encoding(format!("unknown termType `{other}`"))),
        }
    }
}

/// Accepts a datatype either as an IRI string or as a `NamedNode` object.
fn datatype_iri(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        Value::Object(o) => o.get("value").and_then(Value::as_str),
        _ => None,
    }
}

fn str_field<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a str, RdfError> {
    object
        .get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| RdfError::Encoding(format!("missing string field `{name}`")))
}

fn resolve_iri(iri: &str, base: &Url) -> String {
    if Url::parse(iri).is_ok() {
        return iri.to_owned();
    }
    base.join(iri)
        .map_or_else(|_| iri.to_owned(), |u| u.to_string())
}

/// Escapes a lexical form for N-Triples-style display.
fn quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

impl fmt::Display for RdfTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfTerm::NamedNode(iri) => write!(f, "<{iri}>"),
            RdfTerm::BlankNode(label) => write!(f, "_:{label}"),
            RdfTerm::Literal(l) => match &l.language {
                Some(lang) => write!(f, "{}@{lang}", quoted(&l.value)),
                None if l.datatype == XSD_STRING => f.write_str(&quoted(&l.value)),
                None => write!(f, "{}^^<{}>", quoted(&l.value), l.datatype),
            },
            RdfTerm::DefaultGraph => f.write_str("DEFAULT"),
            RdfTerm::Quad(q) => write!(f, "<< {} {} {} >>", q.subject, q.predicate, q.object),
        }
    }
}

/// A subject, predicate, object and graph.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RdfQuad {
    subject: RdfTerm,
    predicate: RdfTerm,
    object: RdfTerm,
    graph: RdfTerm,
}

impl RdfQuad {
    /// Builds a quad, checking that each term is allowed in its position:
    /// the subject is a named node, blank node or quoted triple; the
    /// predicate a named node; the object anything but the default graph;
    /// the graph a named node, blank node or the default graph. Quoted
    /// triples must themselves be in the default graph.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::InvalidTerm`] naming the first misplaced term.
    pub fn new(
        subject: RdfTerm,
        predicate: RdfTerm,
        object: RdfTerm,
        graph: RdfTerm,
    ) -> Result<Self, RdfError> {
        let invalid = |position: &'static str, term: &RdfTerm| RdfError::InvalidTerm {
            position,
            term: term.to_string(),
        };
        match &subject {
            RdfTerm::NamedNode(_) | RdfTerm::BlankNode(_) => {}
            RdfTerm::Quad(q) if q.graph == RdfTerm::DefaultGraph => {}
            other => return Err(invalid("subject", other)),
        }
        if !matches!(predicate, RdfTerm::NamedNode(_)) {
            return Err(invalid("predicate", &predicate));
        }
        match &object {
            RdfTerm::DefaultGraph => return Err(invalid("object", &object)),
            RdfTerm::Quad(q) if q.graph != RdfTerm::DefaultGraph => {
                return Err(invalid("object", &object))
            }
            _ => {}
        }
        if !matches!(
            graph,
            RdfTerm::NamedNode(_) | RdfTerm::BlankNode(_) | RdfTerm::DefaultGraph
        ) {
            return Err(invalid("graph", &graph));
        }
        Ok(Self {
            subject,
            predicate,
            object,
            graph,
        })
    }

    /// A triple in the default graph.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::InvalidTerm`] as [`RdfQuad::new`] does.
    pub fn triple(subject: RdfTerm, predicate: RdfTerm, object: RdfTerm) -> Result<Self, RdfError> {
        Self::new(subject, predicate, object, RdfTerm::DefaultGraph)
    }

    /// Subject.
    #[must_use]
    pub fn subject(&self) -> &RdfTerm {
        &self.subject
    }

    /// Predicate.
    #[must_use]
    pub fn predicate(&self) -> &RdfTerm {
        &self.predicate
    }

    /// Object.
    #[must_use]
    pub fn object(&self) -> &RdfTerm {
        &self.object
    }

    /// Graph name.
    #[must_use]
    pub fn graph(&self) -> &RdfTerm {
        &self.graph
    }

    /// True when the quad belongs to the default graph.
    #[must_use]
    pub fn in_default_graph(&self) -> bool {
        self.graph == RdfTerm::DefaultGraph
    }

    /// Resolves every position against `base`.
    #[must_use]
    pub fn resolve(&self, base: &Url) -> RdfQuad {
        RdfQuad {
            subject: self.subject.resolve(base),
            predicate: self.predicate.resolve(base),
            object: self.object.resolve(base),
            graph: self.graph.resolve(base),
        }
    }

    /// Encodes the quad as an RDF/JS `Quad` object.
    #[must_use]
    pub fn to_jsonable(&self) -> Value {
        json!({
            "termType": "Quad",
            "subject": self.subject.to_jsonable(),
            "predicate": self.predicate.to_jsonable(),
            "object": self.object.to_jsonable(),
            "graph": self.graph.to_jsonable(),
        })
    }

    /// Decodes an RDF/JS `Quad` object. A missing graph means the default graph.
    ///
    /// # Errors
    ///
    /// Returns [`RdfError::Encoding`] for malformed objects and
    /// [`RdfError::InvalidTerm`] for misplaced terms.
    pub fn from_jsonable(value: &Value) -> Result<Self, RdfError> {
        let object = value
            .as_object()
            .ok_or_else(|| RdfError::Encoding(format!("quad is not an object: {value}")))?;
        if str_field(object, "termType")? != "Quad" {
            return Err(RdfError::Encoding(format!("not a Quad: {value}")));
        }
        let term = |name: &str| -> Result<RdfTerm, RdfError> {
            object
                .get(name)
                .ok_or_else(|| RdfError::Encoding(format!("quad without `{name}`")))
                .and_then(RdfTerm::from_jsonable)
        };
        let graph = match object.get("graph") {
            Some(g) => RdfTerm::from_jsonable(g)?,
            None => RdfTerm::DefaultGraph,
        };
        Self::new(term("subject")?, term("predicate")?, term("object")?, graph)
    }
}

impl fmt::Display for RdfQuad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.subject, self.predicate, self.object)?;
        if !self.in_default_graph() {
            write!(f, " {}", self.graph)?;
        }
        f.write_str(" .")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad(s: &str, p: &str, o: RdfTerm) -> RdfQuad {
        RdfQuad::triple(RdfTerm::iri(s), RdfTerm::iri(p), o).expect("valid quad")
    }

    #[test]
    fn position_checks() {
        let lit = RdfTerm::literal(Literal::simple("x"));
        assert!(matches!(
            RdfQuad::triple(lit.clone(), RdfTerm::iri("urn:p"), lit.clone()),
            Err(RdfError::InvalidTerm { position: "subject", .. })
        ));
        assert!(matches!(
            RdfQuad::triple(RdfTerm::iri("urn:s"), RdfTerm::blank("b"), lit.clone()),
            Err(RdfError::InvalidTerm { position: "predicate", .. })
        ));
        assert!(matches!(
            RdfQuad::new(RdfTerm::iri("urn:s"), RdfTerm::iri("urn:p"), lit.clone(), lit),
            Err(RdfError::InvalidTerm { position: "graph", .. })
        ));
        assert!(matches!(
            RdfQuad::triple(RdfTerm::iri("urn:s"), RdfTerm::iri("urn:p"), RdfTerm::DefaultGraph),
            Err(RdfError::InvalidTerm { position: "object", .. })
        ));
    }

    #[test]
    fn literal_json_shape() {
        let q = quad("urn:a", "urn:b", RdfTerm::literal(Literal::lang("hi", "en")));
        assert_eq!(
            q.to_jsonable(),
            json!({
                "termType": "Quad",
                "subject": {"termType": "NamedNode", "value": "urn:a"},
                "predicate": {"termType": "NamedNode", "value": "urn:b"},
                "object": {
                    "termType": "Literal",
                    "value": "hi",
                    "language": "en",
                    "datatype": RDF_LANG_STRING,
                },
                "graph": {"termType": "DefaultGraph", "value": ""},
            })
        );
        let simple = RdfTerm::literal(Literal::simple("x")).to_jsonable();
        assert_eq!(simple["language"], json!(""));
        assert_eq!(simple["datatype"], json!(XSD_STRING));
    }

    #[test]
    fn json_round_trip_with_quoted_triple() {
        let inner = quad("urn:a", "urn:b", RdfTerm::iri("urn:c"));
        let outer = RdfQuad::new(
            RdfTerm::Quad(Box::new(inner)),
            RdfTerm::iri("urn:says"),
            RdfTerm::literal(Literal::typed("5", "http://www.w3.org/2001/XMLSchema#integer")),
            RdfTerm::iri("urn:g"),
        )
        .expect("valid");
        let decoded = RdfQuad::from_jsonable(&outer.to_jsonable()).expect("decodes");
        assert_eq!(decoded, outer);
    }

    #[test]
    fn datatype_may_be_a_named_node_object() {
        let term = RdfTerm::from_jsonable(&json!({
            "termType": "Literal",
            "value": "1",
            "language": "",
            "datatype": {"termType": "NamedNode", "value": "urn:dt"},
        }))
        .expect("decodes");
        assert_eq!(term, RdfTerm::literal(Literal::typed("1", "urn:dt")));
    }

    #[test]
    fn malformed_terms() {
        assert!(matches!(
            RdfTerm::from_jsonable(&json!({"termType": "Variable", "value": "x"})),
            Err(RdfError::Encoding(_))
        ));
        assert!(matches!(
            RdfTerm::from_jsonable(&json!("urn:a")),
            Err(RdfError::Encoding(_))
        ));
        assert!(matches!(
            RdfQuad::from_jsonable(&json!({
                "termType": "Quad",
                "subject": {"termType": "NamedNode", "value": "urn:a"},
            })),
            Err(RdfError::Encoding(_))
        ));
    }

    #[test]
    fn relative_iris_resolve_against_base() {
        let base = Url::parse("https://example/dir/doc").expect("base");
        let q = RdfQuad::new(
            RdfTerm::iri("a"),
            RdfTerm::iri("urn:p"),
            RdfTerm::literal(Literal::typed("1", "../dt")),
            RdfTerm::iri("#g"),
        )
        .expect("valid")
        .resolve(&base);
        assert_eq!(q.subject(), &RdfTerm::iri("https://example/dir/a"));
        assert_eq!(q.predicate(), &RdfTerm::iri("urn:p"));
        assert_eq!(
            q.object(),
            &RdfTerm::literal(Literal::typed("1", "https://example/dt"))
        );
        assert_eq!(q.graph(), &RdfTerm::iri("https://example/dir/doc#g"));
    }

    #[test]
    fn display() {
        let q = quad("urn:a", "urn:b", RdfTerm::literal(Literal::simple("say \"hi\"")));
        assert_eq!(q.to_string(), r#"<urn:a> <urn:b> "say \"hi\"" ."#);
    }
}
