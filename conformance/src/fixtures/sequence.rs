//! A sequence mixing a data read, both fault kinds and a bare goto.

use super::Fixture;

/// Both fault kinds share the `fault` element and are told apart by type.
pub const SEQUENCE_OF_FAULTS: Fixture = Fixture {
    name: "sequence-of-faults",
    xml: r#"<sequence xmlns="https://qworum.net/ns/v1/instruction/">
  <data path='["user"]'/>
  <fault type="* out of stock"/>
  <fault type="entitlement"></fault>
  <goto/>
</sequence>"#,
    json: r#"{
  "type": "sequence",
  "value": {
    "statements": [
      {"type": "data", "value": {"path": ["user"], "statement": null}},
      {"type": "fault", "value": {"type": "* out of stock"}},
      {"type": "fault", "value": {"type": "entitlement"}},
      {"type": "goto", "value": {"href": null}}
    ]
  }
}"#,
};
