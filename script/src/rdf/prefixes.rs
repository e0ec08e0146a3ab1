//! Well-known RDF namespace IRIs.

/// Qworum ontology.
pub const QRM: &str = "https://ontology.qworum.net/";
/// RDF.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// RDF Schema.
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// XML Schema datatypes.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";
/// schema.org.
pub const SCHEMA: &str = "https://schema.org/";
/// Certificate ontology.
pub const CERT: &str = "http://www.w3.org/ns/auth/cert#";
/// Friend of a friend.
pub const FOAF: &str = "http://xmlns.com/foaf/0.1/";
/// Biographical information.
pub const BIO: &str = "http://purl.org/vocab/bio/0.1/";
/// Résumés.
pub const CV: &str = "http://rdfs.org/resume-rdf/cv.rdfs#";
/// Canadian Writing Research Collaboratory.
pub const CWRC: &str = "http://sparql.cwrc.ca/ontologies/cwrc#";
/// Countries.
pub const COUNTRY: &str = "http://www.daml.org/2001/09/countries/countries.daml#";
/// Organizations.
pub const ORG: &str = "http://www.w3.org/ns/org#";
/// Bibliographic ontology.
pub const BIBO: &str = "http://purl.org/ontology/bibo/";
/// Time ontology.
pub const TIME: &str = "http://www.w3.org/2006/time#";
/// SKOS.
pub const SKOS: &str = "http://www.w3.org/2004/02/skos/core#";
/// Dublin Core terms.
pub const DCTERMS: &str = "http://purl.org/dc/terms/";
/// Creative Commons.
pub const CC: &str = "http://creativecommons.org/ns#";
/// Provenance.
pub const PROV: &str = "http://www.w3.org/ns/prov#";

/// Every well-known prefix with its namespace.
pub const WELL_KNOWN: &[(&str, &str)] = &[
    ("qrm", QRM),
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("xsd", XSD),
    ("schema", SCHEMA),
    ("cert", CERT),
    ("foaf", FOAF),
    ("bio", BIO),
    ("cv", CV),
    ("cwrc", CWRC),
    ("country", COUNTRY),
    ("org", ORG),
    ("bibo", BIBO),
    ("time", TIME),
    ("skos", SKOS),
    ("dcterms", DCTERMS),
    ("cc", CC),
    ("prov", PROV),
];

/// Prefixes every new semantic data value starts with.
pub const DEFAULT_PREFIXES: &[(&str, &str)] = &[
    ("rdf", RDF),
    ("rdfs", RDFS),
    ("xsd", XSD),
    ("schema", SCHEMA),
];

/// The namespace of a well-known prefix.
#[must_use]
pub fn well_known(prefix: &str) -> Option<&'static str> {
    WELL_KNOWN
        .iter()
        .find(|(p, _)| *p == prefix)
        .map(|(_, iri)| *iri)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        assert_eq!(well_known("foaf"), Some(FOAF));
        assert_eq!(well_known("nope"), None);
        assert_eq!(WELL_KNOWN.len(), 18);
    }
}
