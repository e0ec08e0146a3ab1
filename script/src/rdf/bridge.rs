//! Conversion between [`RdfQuad`] and sophia terms, and the parser and
//! serializer entry points for each [`RdfFormat`].

use mownstr::MownStr;
use sophia_api::parser::{QuadParser, TripleParser};
use sophia_api::prefix::Prefix;
use sophia_api::quad::{Quad, Spog};
use sophia_api::serializer::{QuadSerializer, Stringifier, TripleSerializer};
use sophia_api::source::{QuadSource, StreamError, TripleSource};
use sophia_api::term::{BnodeId, IriRef, LanguageTag, SimpleTerm, Term, TermKind};
use sophia_api::triple::Triple;
use sophia_iri::Iri;
use sophia_turtle::parser::nq::NQuadsParser;
use sophia_turtle::parser::nt::NTriplesParser;
use sophia_turtle::parser::trig::TriGParser;
use sophia_turtle::parser::turtle::TurtleParser;
use sophia_turtle::serializer::nq::NqSerializer;
use sophia_turtle::serializer::nt::NtSerializer;
use sophia_turtle::serializer::trig::{TrigConfig, TrigSerializer};
use sophia_turtle::serializer::turtle::{TurtleConfig, TurtleSerializer};

use super::{Literal, RdfFormat, RdfQuad, RdfTerm};
use crate::error::RdfError;

/// Parses `text` in `format`, handing each quad to `sink` as it is read.
/// Quads already handed over stay with the sink when a later one fails.
pub(crate) fn parse(
    format: RdfFormat,
    text: &str,
    base: Option<&str>,
    mut sink: impl FnMut(RdfQuad),
) -> Result<(), RdfError> {
    let base = base
        .map(|b| {
            Iri::new(b.to_owned()).map_err(|e| RdfError::InvalidBase {
                iri: b.to_owned(),
                message: e.to_string(),
            })
        })
        .transpose()?;

    match format {
        RdfFormat::TriG => finish(
            format,
            TriGParser { base }
                .parse_str(text)
                .try_for_each_quad(|q| convert_quad(&q).map(&mut sink)),
        ),
        RdfFormat::NQuads => finish(
            format,
            NQuadsParser::default()
                .parse_str(text)
                .try_for_each_quad(|q| convert_quad(&q).map(&mut sink)),
        ),
        RdfFormat::Turtle => finish(
            format,
            TurtleParser { base }
                .parse_str(text)
                .try_for_each_triple(|t| convert_triple(&t).map(&mut sink)),
        ),
        RdfFormat::NTriples => finish(
            format,
            NTriplesParser::default()
                .parse_str(text)
                .try_for_each_triple(|t| convert_triple(&t).map(&mut sink)),
        ),
    }
}

fn finish<E: std::error::Error>(
    format: RdfFormat,
    result: Result<(), StreamError<E, RdfError>>,
) -> Result<(), RdfError> {
    result.map_err(|e| match e {
        StreamError::SourceError(e) => RdfError::Syntax {
            format,
            message: e.to_string(),
        },
        StreamError::SinkError(e) => e,
    })
}

fn convert_quad<Q: Quad>(q: &Q) -> Result<RdfQuad, RdfError> {
    let graph = match q.g() {
        Some(g) => convert_term(g)?,
        None => RdfTerm::DefaultGraph,
    };
    RdfQuad::new(
        convert_term(q.s())?,
        convert_term(q.p())?,
        convert_term(q.o())?,
        graph,
    )
}

fn convert_triple<T: Triple>(t: &T) -> Result<RdfQuad, RdfError> {
    RdfQuad::triple(convert_term(t.s())?, convert_term(t.p())?, convert_term(t.o())?)
}

fn convert_term<T: Term>(term: T) -> Result<RdfTerm, RdfError> {
    let unsupported = || RdfError::Encoding(format!("unsupported term kind {:?}", term.kind()));
    match term.kind() {
        TermKind::Iri => term
            .iri()
            .map(|iri| RdfTerm::NamedNode(iri.as_str().to_owned()))
            .ok_or_else(unsupported),
        TermKind::BlankNode => term
            .bnode_id()
            .map(|id| RdfTerm::BlankNode(id.as_str().to_owned()))
            .ok_or_else(unsupported),
        TermKind::Literal => {
            let value = term.lexical_form().ok_or_else(unsupported)?.to_string();
            if let Some(tag) = term.language_tag() {
                return Ok(RdfTerm::Literal(Literal::lang(value, tag.as_str())));
            }
            Ok(RdfTerm::Literal(match term.datatype() {
                Some(dt) => Literal::typed(value, dt.as_str()),
                None => Literal::simple(value),
            }))
        }
        TermKind::Triple => {
            let [s, p, o] = term.triple().ok_or_else(unsupported)?;
            let quoted = RdfQuad::triple(convert_term(s)?, convert_term(p)?, convert_term(o)?)?;
            Ok(RdfTerm::Quad(Box::new(quoted)))
        }
        TermKind::Variable => Err(unsupported()),
    }
}

fn simple_term<'a>(term: &'a RdfTerm, position: &'static str) -> Result<SimpleTerm<'a>, RdfError> {
    Ok(match term {
        RdfTerm::NamedNode(iri) => {
            SimpleTerm::Iri(IriRef::new_unchecked(MownStr::from(iri.as_str())))
        }
        RdfTerm::BlankNode(id) => {
            SimpleTerm::BlankNode(BnodeId::new_unchecked(MownStr::from(id.as_str())))
        }
        RdfTerm::Literal(Literal {
            value,
            language: Some(lang),
            ..
        }) => SimpleTerm::LiteralLanguage(
            MownStr::from(value.as_str()),
            LanguageTag::new_unchecked(MownStr::from(lang.as_str())),
        ),
        RdfTerm::Literal(Literal { value, datatype, .. }) => SimpleTerm::LiteralDatatype(
            MownStr::from(value.as_str()),
            IriRef::new_unchecked(MownStr::from(datatype.as_str())),
        ),
        RdfTerm::Quad(q) => SimpleTerm::Triple(Box::new([
            simple_term(q.subject(), "subject")?,
            simple_term(q.predicate(), "predicate")?,
            simple_term(q.object(), "object")?,
        ])),
        RdfTerm::DefaultGraph => {
            return Err(RdfError::InvalidTerm {
                position,
                term: term.to_string(),
            })
        }
    })
}

fn spog(quad: &RdfQuad) -> Result<Spog<SimpleTerm<'_>>, RdfError> {
    let graph = match quad.graph() {
        RdfTerm::DefaultGraph => None,
        g => Some(simple_term(g, "graph")?),
    };
    Ok((
        [
            simple_term(quad.subject(), "subject")?,
            simple_term(quad.predicate(), "predicate")?,
            simple_term(quad.object(), "object")?,
        ],
        graph,
    ))
}

/// Serializes `quads` in `format`, in term order so that equal datasets
/// always produce the same text. `prefixes` only affect Turtle and TriG.
pub(crate) fn serialize<'q>(
    format: RdfFormat,
    quads: impl IntoIterator<Item = &'q RdfQuad>,
    prefixes: impl IntoIterator<Item = (&'q str, &'q str)>,
) -> Result<String, RdfError> {
    let failed = |message: String| RdfError::Serialize { format, message };
    let mut quads = quads.into_iter().collect::<Vec<_>>();
    quads.sort();

    if !format.supports_named_graphs() {
        if let Some(named) = quads.iter().find(|q| !q.in_default_graph()) {
            return Err(RdfError::NamedGraphInTripleFormat {
                format,
                graph: named.graph().to_string(),
            });
        }
    }

    let text = match format {
        RdfFormat::NQuads | RdfFormat::TriG => {
            let dataset = quads.iter().map(|q| spog(q)).collect::<Result<Vec<_>, _>>()?;
            if format == RdfFormat::NQuads {
                let mut ser = NqSerializer::new_stringifier();
                ser.serialize_dataset(&dataset)
                    .map_err(|e| failed(e.to_string()))?;
                ser.as_str().to_owned()
            } else {
                let config = TrigConfig::new()
                    .with_pretty(true)
                    .with_own_prefix_map(prefix_map(prefixes).map_err(failed)?);
                let mut ser = TrigSerializer::new_stringifier_with_config(config);
                ser.serialize_dataset(&dataset)
                    .map_err(|e| failed(e.to_string()))?;
                ser.as_str().to_owned()
            }
        }
        RdfFormat::NTriples | RdfFormat::Turtle => {
            let graph = quads
                .iter()
                .map(|q| spog(q).map(|(triple, _)| triple))
                .collect::<Result<Vec<_>, _>>()?;
            if format == RdfFormat::NTriples {
                let mut ser = NtSerializer::new_stringifier();
                ser.serialize_graph(&graph)
                    .map_err(|e| failed(e.to_string()))?;
                ser.as_str().to_owned()
            } else {
                let config = TurtleConfig::new()
                    .with_pretty(true)
                    .with_own_prefix_map(prefix_map(prefixes).map_err(failed)?);
                let mut ser = TurtleSerializer::new_stringifier_with_config(config);
                ser.serialize_graph(&graph)
                    .map_err(|e| failed(e.to_string()))?;
                ser.as_str().to_owned()
            }
        }
    };
    Ok(text)
}

fn prefix_map<'p>(
    prefixes: impl IntoIterator<Item = (&'p str, &'p str)>,
) -> Result<Vec<(Prefix<Box<str>>, Iri<Box<str>>)>, String> {
    prefixes
        .into_iter()
        .map(|(prefix, iri)| {
            let p = Prefix::new(Box::from(prefix)).map_err(|e| format!("prefix `{prefix}`: {e}"))?;
            let i = Iri::new(Box::from(iri)).map_err(|e| format!("namespace <{iri}>: {e}"))?;
            Ok((p, i))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(
        format: RdfFormat,
        text: &str,
        base: Option<&str>,
    ) -> Result<Vec<RdfQuad>, RdfError> {
        let mut quads = Vec::new();
        parse(format, text, base, |q| quads.push(q))?;
        Ok(quads)
    }

    #[test]
    fn turtle_with_base_and_literals() {
        let quads = parse_all(
            RdfFormat::Turtle,
            r#"<s> <p> "chat"@fr, "3"^^<http://www.w3.org/2001/XMLSchema#integer>, "x" ."#,
            Some("https://example.org/doc"),
        )
        .expect("parses");
        assert_eq!(quads.len(), 3);
        assert_eq!(quads[0].subject(), &RdfTerm::iri("https://example.org/s"));
        assert_eq!(quads[0].object(), &RdfTerm::literal(Literal::lang("chat", "fr")));
        assert_eq!(
            quads[2].object(),
            &RdfTerm::literal(Literal::simple("x"))
        );
    }

    #[test]
    fn trig_keeps_graph_names() {
        let quads = parse_all(
            RdfFormat::TriG,
            "<urn:g> { <urn:a> <urn:b> _:c . }",
            None,
        )
        .expect("parses");
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].graph(), &RdfTerm::iri("urn:g"));
        assert!(matches!(quads[0].object(), RdfTerm::BlankNode(_)));
    }

    #[test]
    fn syntax_errors_name_the_format() {
        let err = parse_all(RdfFormat::NQuads, "<urn:a> <urn:b>", None).expect_err("truncated");
        assert!(matches!(err, RdfError::Syntax { format: RdfFormat::NQuads, .. }));
    }

    #[test]
    fn relative_base_is_rejected() {
        let err = parse_all(RdfFormat::TriG, "", Some("not absolute")).expect_err("bad base");
        assert!(matches!(err, RdfError::InvalidBase { .. }));
    }

    #[test]
    fn triple_formats_refuse_named_graphs() {
        let q = RdfQuad::new(
            RdfTerm::iri("urn:a"),
            RdfTerm::iri("urn:b"),
            RdfTerm::iri("urn:c"),
            RdfTerm::iri("urn:g"),
        )
        .expect("valid");
        let err = serialize(RdfFormat::NTriples, [&q], []).expect_err("named graph");
        assert!(matches!(err, RdfError::NamedGraphInTripleFormat { .. }));
        let text = serialize(RdfFormat::NQuads, [&q], []).expect("n-quads");
        assert_eq!(text.trim(), "<urn:a> <urn:b> <urn:c> <urn:g> .");
    }

    #[test]
    fn turtle_uses_prefixes() {
        let q = RdfQuad::triple(
            RdfTerm::iri("https://schema.org/a"),
            RdfTerm::iri("https://schema.org/name"),
            RdfTerm::literal(Literal::simple("A")),
        )
        .expect("valid");
        let text = serialize(RdfFormat::Turtle, [&q], [("schema", "https://schema.org/")])
            .expect("turtle");
        assert!(text.contains("schema:name"), "{text}");
        let back = parse_all(RdfFormat::Turtle, &text, None).expect("reparses");
        assert_eq!(back, vec![q]);
    }
}
