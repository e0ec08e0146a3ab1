//! Data values.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::rdf::SemanticData;

/// Namespace of data values, in both wire formats.
pub const DATA_NAMESPACE: &str = "https://qworum.net/ns/v1/data/";

/// A payload. The variant set is closed.
#[derive(Debug, Clone, PartialEq)]
pub enum DataValue {
    /// Any JSON value.
    Json(Json),
    /// An RDF dataset.
    SemanticData(SemanticData),
}

impl DataValue {
    /// The unqualified wire tag.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            DataValue::Json(_) => Json::TAG,
            DataValue::SemanticData(_) => SemanticData::TAG,
        }
    }
}

impl From<Json> for DataValue {
    fn from(v: Json) -> Self {
        DataValue::Json(v)
    }
}

impl From<SemanticData> for DataValue {
    fn from(v: SemanticData) -> Self {
        DataValue::SemanticData(v)
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Json(v) => v.fmt(f),
            DataValue::SemanticData(v) => v.fmt(f),
        }
    }
}

/// A JSON value.
#[derive(Debug, Clone, PartialEq)]
pub struct Json {
    value: Value,
}

impl Json {
    /// Wire tag.
    pub const TAG: &'static str = "json";

    /// Builds a JSON data value from anything serializable.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::NotJson`] when `value` has no JSON
    /// representation, e.g. a map with non-string keys.
    pub fn build<T: Serialize + ?Sized>(value: &T) -> Result<Self, ValidationError> {
        serde_json::to_value(value)
            .map(Self::from_value)
            .map_err(|e| ValidationError::NotJson(e.to_string()))
    }

    /// Wraps a value that is already JSON.
    #[must_use]
    pub fn from_value(value: Value) -> Self {
        Self { value }
    }

    /// The JSON value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Consumes the data value, returning the JSON value.
    #[must_use]
    pub fn into_value(self) -> Value {
        self.value
    }
}

impl fmt::Display for Json {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Json({})", self.value)
    }
}
