//! A guarded call with a specific and a catch-all clause.

use super::Fixture;

/// Pays, redirecting on a declined payment and returning null on any other fault.
pub const TRY_CATCH: Fixture = Fixture {
    name: "try-catch",
    xml: r#"<?xml version="1.0"?>
<!-- checkout step -->
<q:try xmlns:q="https://qworum.net/ns/v1/instruction/">
  <q:call href="../pay/"/>
  <q:catch faults='["* payment declined"]'>
    <q:goto href="../declined/"/>
  </q:catch>
  <q:catch>
    <q:return><json xmlns="https://qworum.net/ns/v1/data/">null</json></q:return>
  </q:catch>
</q:try>
"#,
    json: r#"{
  "type": "try",
  "value": {
    "statement": {
      "type": "call",
      "value": {"object": ["@"], "href": "../pay/", "parameters": [], "objectParameters": []}
    },
    "catch": [
      {
        "catch": ["* payment declined"],
        "do": [{"type": "goto", "value": {"href": "../declined/"}}]
      },
      {
        "catch": [],
        "do": [
          {
            "type": "return",
            "value": {"statement": {"type": "https://qworum.net/ns/v1/data/ json", "value": null}}
          }
        ]
      }
    ]
  }
}"#,
};
