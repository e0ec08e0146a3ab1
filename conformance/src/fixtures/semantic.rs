//! Returning RDF semantic data.

use super::Fixture;

/// One language-tagged title, carried as N-Quads in XML and as RDF/JS quads in JSON.
pub const SEMANTIC_RETURN: Fixture = Fixture {
    name: "semantic-return",
    xml: r#"<return xmlns="https://qworum.net/ns/v1/instruction/" xmlns:d="https://qworum.net/ns/v1/data/">
  <d:semantic type="n-quads"><![CDATA[<https://example.org/book> <http://purl.org/dc/terms/title> "Qworum & RDF"@en .
]]></d:semantic>
</return>"#,
    json: r#"{
  "type": "return",
  "value": {
    "statement": {
      "type": "https://qworum.net/ns/v1/data/ semantic",
      "value": [
        {
          "termType": "Quad",
          "subject": {"termType": "NamedNode", "value": "https://example.org/book"},
          "predicate": {"termType": "NamedNode", "value": "http://purl.org/dc/terms/title"},
          "object": {
            "termType": "Literal",
            "value": "Qworum & RDF",
            "language": "en",
            "datatype": "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString"
          },
          "graph": {"termType": "DefaultGraph", "value": ""}
        }
      ]
    }
  }
}"#,
};
