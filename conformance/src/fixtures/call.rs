//! A call with one data argument and one object argument.

use super::Fixture;

/// Calls the shop service on a sub-object, passing the total and the cart.
pub const CALL: Fixture = Fixture {
    name: "call",
    xml: r#"<?xml version="1.0" encoding="UTF-8"?>
<call xmlns="https://qworum.net/ns/v1/instruction/" object='["@", "shop"]' href="../shop/">
  <data-args>
    <data-arg name="total">
      <d:json xmlns:d="https://qworum.net/ns/v1/data/">42</d:json>
    </data-arg>
  </data-args>
  <object-args>
    <object-arg name="cart" object='["@", "cart"]'/>
  </object-args>
</call>
"#,
    json: r#"{
  "type": "call",
  "value": {
    "object": ["@", "shop"],
    "href": "../shop/",
    "parameters": [
      {"name": "total", "value": {"type": "https://qworum.net/ns/v1/data/ json", "value": 42}}
    ],
    "objectParameters": [
      {"name": "cart", "object": ["@", "cart"]}
    ]
  }
}"#,
};
