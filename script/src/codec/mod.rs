//! Wire codecs for scripts, statements and data values.
//!
//! Two encodings are supported, and must agree on every construct:
//! - **JSON** ([`json`]): a `serde_json::Value` tree tagged with `type`
//! - **XML** ([`xml`]): namespaced elements written with `qworum-xml`
//!
//! Both are exposed as inherent methods on [`Script`](crate::Script),
//! [`Statement`](crate::Statement), [`Instruction`](crate::Instruction)
//! and [`DataValue`](crate::DataValue).

pub mod json;
pub mod xml;
