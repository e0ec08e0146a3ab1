//! Writing a JSON value into the object store.

use super::Fixture;

/// Stores a basket line under `basket/items`.
pub const DATA_WRITE: Fixture = Fixture {
    name: "data-write",
    xml: r#"<data xmlns="https://qworum.net/ns/v1/instruction/" path='["basket", "items"]'><json xmlns="https://qworum.net/ns/v1/data/">{"sku": "A-1", "qty": 2, "note": "&lt;fragile&gt;"}</json></data>"#,
    json: r#"{
  "type": "data",
  "value": {
    "path": ["basket", "items"],
    "statement": {
      "type": "https://qworum.net/ns/v1/data/ json",
      "value": {"sku": "A-1", "qty": 2, "note": "<fragile>"}
    }
  }
}"#,
};
