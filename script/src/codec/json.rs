//! JSON encoding.
//!
//! Instructions encode as `{"type": <tag>, "value": {...}}`; data values
//! as `{"type": "<data namespace> <tag>", "value": ...}`. Decoding reads
//! the `type` discriminant first and dispatches straight to the matching
//! variant.

use serde_json::{json, Map, Value};
use tracing::trace;

use crate::error::{DecodeError, FaultTypeError};
use crate::fault;
use crate::model::{
    Call, CatchClause, Data, DataValue, Fault, Goto, Instruction, Json, PlatformFault, Return,
    Script, Sequence, Statement, Try, DATA_NAMESPACE,
};
use crate::rdf::{RdfQuad, SemanticData};

/// The JSON `type` of a data value tag.
#[must_use]
pub fn data_type(tag: &str) -> String {
    format!("{DATA_NAMESPACE} {tag}")
}

/// The data value tag of a JSON `type`, if it is one.
fn data_tag(type_: &str) -> Option<&str> {
    type_.strip_prefix(DATA_NAMESPACE)?.strip_prefix(' ')
}

impl Script {
    /// Encodes the script as its root instruction's JSON form.
    #[must_use]
    pub fn to_jsonable(&self) -> Value {
        self.instruction().to_jsonable()
    }

    /// Decodes a script from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the value is not a valid instruction.
    pub fn from_jsonable(value: &Value) -> Result<Self, DecodeError> {
        Instruction::from_jsonable(value).map(Script::build)
    }
}

impl Statement {
    /// Encodes the statement.
    #[must_use]
    pub fn to_jsonable(&self) -> Value {
        match self {
            Statement::Instruction(i) => i.to_jsonable(),
            Statement::Data(d) => d.to_jsonable(),
        }
    }

    /// Decodes an instruction or a data value, as its `type` says.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] when the value is neither.
    pub fn from_jsonable(value: &Value) -> Result<Self, DecodeError> {
        let (type_, _) = tagged(value)?;
        if data_tag(type_).is_some() {
            DataValue::from_jsonable(value).map(Statement::from)
        } else {
            Instruction::from_jsonable(value).map(Statement::from)
        }
    }
}

impl Instruction {
    /// Encodes the instruction.
    #[must_use]
    pub fn to_jsonable(&self) -> Value {
        let value = match self {
            Instruction::Fault(f) => json!({ "type": f.fault_type() }),
            Instruction::PlatformFault(f) => json!({ "type": f.fault_type() }),
            Instruction::Return(r) => json!({ "statement": r.statement().to_jsonable() }),
            Instruction::Sequence(s) => json!({ "statements": statements(s.statements()) }),
            Instruction::Data(d) => json!({
                "path": d.path(),
                "statement": d.statement().map(Statement::to_jsonable),
            }),
            Instruction::Try(t) => json!({
                "statement": t.statement().to_jsonable(),
                "catch": t
                    .catch_clauses()
                    .iter()
                    .map(|c| json!({ "catch": c.catch(), "do": statements(c.statements()) }))
                    .collect::<Vec<_>>(),
            }),
            Instruction::Goto(g) => json!({ "href": g.href() }),
            Instruction::Call(c) => json!({
                "object": c.object(),
                "href": c.href(),
                "parameters": c
                    .parameters()
                    .iter()
                    .map(|p| json!({ "name": p.name, "value": p.value.to_jsonable() }))
                    .collect::<Vec<_>>(),
                "objectParameters": c
                    .object_parameters()
                    .iter()
                    .map(|p| json!({ "name": p.name, "object": p.object }))
                    .collect::<Vec<_>>(),
            }),
        };
        json!({ "type": self.tag(), "value": value })
    }

    /// Decodes an instruction.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotAnInstruction`] for a data value,
    /// [`DecodeError::UnknownTag`] for an unknown `type`, and field or
    /// validation errors for malformed operands.
    pub fn from_jsonable(value: &Value) -> Result<Self, DecodeError> {
        let (tag, body) = tagged(value)?;
        trace!(tag, "decoding JSON instruction");
        if data_tag(tag).is_some() {
            return Err(DecodeError::NotAnInstruction);
        }
        let context = match tag {
            Fault::TAG => Fault::TAG,
            Return::TAG => Return::TAG,
            Sequence::TAG => Sequence::TAG,
            Data::TAG => Data::TAG,
            Try::TAG => Try::TAG,
            Goto::TAG => Goto::TAG,
            Call::TAG => Call::TAG,
            other => return Err(DecodeError::UnknownTag(other.to_owned())),
        };
        let fields = body
            .and_then(Value::as_object)
            .ok_or(DecodeError::MissingField {
                context,
                field: "value",
            })?;
        let operands = Fields { context, fields };

        Ok(match context {
            Fault::TAG => fault_from_type(operands.optional_str("type")?)?,
            Return::TAG => Return::build(operands.statement("statement")?).into(),
            Sequence::TAG => Sequence::build(operands.statements("statements")?)?.into(),
            Data::TAG => Data::build(
                &operands.strings("path")?,
                operands.optional_statement("statement")?,
            )?
            .into(),
            Try::TAG => {
                let clauses = operands
                    .array("catch")?
                    .iter()
                    .map(catch_clause_from_jsonable)
                    .collect::<Result<Vec<_>, _>>()?;
                Try::build(operands.statement("statement")?, clauses)?.into()
            }
            Goto::TAG => Goto::build(operands.optional_str("href")?).into(),
            _ => call_from_jsonable(&operands)?.into(),
        })
    }
}

impl DataValue {
    /// Encodes the data value.
    #[must_use]
    pub fn to_jsonable(&self) -> Value {
        let value = match self {
            DataValue::Json(j) => j.value().clone(),
            DataValue::SemanticData(s) => {
                Value::Array(s.quads().map(RdfQuad::to_jsonable).collect())
            }
        };
        json!({ "type": data_type(self.tag()), "value": value })
    }

    /// Decodes a data value.
    ///
    /// Semantic data is accepted either as an array of quad objects or as
    /// RDF text, in which case an optional `url` member is the base IRI.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotADataValue`] for an instruction,
    /// [`DecodeError::UnknownTag`] for an unknown data `type`, and
    /// [`DecodeError::Rdf`] for invalid semantic data.
    pub fn from_jsonable(value: &Value) -> Result<Self, DecodeError> {
        let (type_, body) = tagged(value)?;
        let tag = data_tag(type_).ok_or(DecodeError::NotADataValue)?;
        trace!(tag, "decoding JSON data value");
        match tag {
            Json::TAG => {
                let body = body.ok_or(DecodeError::MissingField {
                    context: Json::TAG,
                    field: "value",
                })?;
                Ok(Json::from_value(body.clone()).into())
            }
            SemanticData::TAG => {
                let mut data = SemanticData::build();
                match body {
                    Some(Value::Array(quads)) => {
                        let quads = quads
                            .iter()
                            .map(RdfQuad::from_jsonable)
                            .collect::<Result<Vec<_>, _>>()?;
                        data.read_from_quads(quads, None)?;
                    }
                    Some(Value::String(text)) => {
                        let base = value.get("url").and_then(Value::as_str);
                        data.read_from_text(text, base)?;
                    }
                    Some(_) => {
                        return Err(DecodeError::InvalidField {
                            context: SemanticData::TAG,
                            field: "value",
                            reason: "expected an array of quads or RDF text".to_owned(),
                        })
                    }
                    None => {
                        return Err(DecodeError::MissingField {
                            context: SemanticData::TAG,
                            field: "value",
                        })
                    }
                }
                Ok(data.into())
            }
            other => Err(DecodeError::UnknownTag(data_type(other))),
        }
    }
}

/// Splits a tagged object into its `type` and optional `value`.
fn tagged(value: &Value) -> Result<(&str, Option<&Value>), DecodeError> {
    let object = value.as_object().ok_or(DecodeError::NotTagged)?;
    let type_ = object
        .get("type")
        .and_then(Value::as_str)
        .ok_or(DecodeError::NotTagged)?;
    Ok((type_, object.get("value")))
}

fn statements(items: &[Statement]) -> Vec<Value> {
    items.iter().map(Statement::to_jsonable).collect()
}

/// Picks the fault variant a wire type belongs to.
pub(crate) fn fault_from_type(fault_type: Option<&str>) -> Result<Instruction, DecodeError> {
    match fault_type {
        Some(t) if fault::is_platform(t) => Ok(PlatformFault::build(t)?.into()),
        Some(t) if !fault::is_service_specific(t) => {
            Err(FaultTypeError::NotServiceSpecific(t.to_owned()).into())
        }
        t => Ok(Fault::build(t)?.into()),
    }
}

fn catch_clause_from_jsonable(value: &Value) -> Result<CatchClause, DecodeError> {
    let fields = value.as_object().ok_or_else(|| DecodeError::InvalidField {
        context: Try::TAG,
        field: "catch",
        reason: format!("expected an object, found {value}"),
    })?;
    let clause = Fields {
        context: "catch clause",
        fields,
    };
    let catch = clause.optional_strings("catch")?.unwrap_or_default();
    Ok(CatchClause::build(&catch, clause.statements("do")?)?)
}

fn call_from_jsonable(operands: &Fields<'_>) -> Result<Call, DecodeError> {
    let object = operands.optional_strings("object")?.unwrap_or_default();
    let mut call = Call::build(&object, operands.optional_str("href")?);

    for parameter in operands.optional_array("parameters")? {
        let parameter = operands.nested(parameter, "parameters")?;
        call = call.with_parameter(
            parameter.str("name")?,
            parameter.statement("value")?,
        );
    }
    for parameter in operands.optional_array("objectParameters")? {
        let parameter = operands.nested(parameter, "objectParameters")?;
        call = call.with_object_parameter(
            parameter.str("name")?,
            &parameter.optional_strings("object")?.unwrap_or_default(),
        );
    }
    Ok(call)
}

/// Typed access to the members of an operand object.
struct Fields<'v> {
    context: &'static str,
    fields: &'v Map<String, Value>,
}

impl<'v> Fields<'v> {
    fn invalid(&self, field: &'static str, reason: impl Into<String>) -> DecodeError {
        DecodeError::InvalidField {
            context: self.context,
            field,
            reason: reason.into(),
        }
    }

    /// A member, with `null` read as absent.
    fn get(&self, field: &'static str) -> Option<&'v Value> {
        self.fields.get(field).filter(|v| !v.is_null())
    }

    fn required(&self, field: &'static str) -> Result<&'v Value, DecodeError> {
        self.get(field).ok_or(DecodeError::MissingField {
            context: self.context,
            field,
        })
    }

    fn str(&self, field: &'static str) -> Result<&'v str, DecodeError> {
        self.optional_str(field)?.ok_or(DecodeError::MissingField {
            context: self.context,
            field,
        })
    }

    fn optional_str(&self, field: &'static str) -> Result<Option<&'v str>, DecodeError> {
        self.get(field)
            .map(|v| {
                v.as_str()
                    .ok_or_else(|| self.invalid(field, format!("expected a string, found {v}")))
            })
            .transpose()
    }

    fn array(&self, field: &'static str) -> Result<&'v [Value], DecodeError> {
        let value = self.required(field)?;
        value
            .as_array()
            .map(Vec::as_slice)
            .ok_or_else(|| self.invalid(field, format!("expected an array, found {value}")))
    }

    fn optional_array(&self, field: &'static str) -> Result<&'v [Value], DecodeError> {
        match self.get(field) {
            Some(_) => self.array(field),
            None => Ok(&[]),
        }
    }

    fn strings(&self, field: &'static str) -> Result<Vec<String>, DecodeError> {
        self.optional_strings(field)?.ok_or(DecodeError::MissingField {
            context: self.context,
            field,
        })
    }

    fn optional_strings(&self, field: &'static str) -> Result<Option<Vec<String>>, DecodeError> {
        if self.get(field).is_none() {
            return Ok(None);
        }
        self.array(field)?
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_owned)
                    .ok_or_else(|| self.invalid(field, format!("expected strings, found {item}")))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some)
    }

    fn statement(&self, field: &'static str) -> Result<Statement, DecodeError> {
        Statement::from_jsonable(self.required(field)?)
    }

    fn optional_statement(&self, field: &'static str) -> Result<Option<Statement>, DecodeError> {
        self.get(field).map(Statement::from_jsonable).transpose()
    }

    fn statements(&self, field: &'static str) -> Result<Vec<Statement>, DecodeError> {
        self.array(field)?.iter().map(Statement::from_jsonable).collect()
    }

    /// An element of an array member, itself an object.
    fn nested(&self, value: &'v Value, field: &'static str) -> Result<Fields<'v>, DecodeError> {
        value
            .as_object()
            .map(|fields| Fields {
                context: self.context,
                fields,
            })
            .ok_or_else(|| self.invalid(field, format!("expected objects, found {value}")))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::error::ValidationError;
    use crate::rdf::{Literal, RdfTerm};

    fn json_value(v: Value) -> Statement {
        Json::from_value(v).into()
    }

    #[test]
    fn call_wire_shape() {
        let call = Call::build(&[" @ ", "cart"], Some("../cart/"))
            .with_parameter("item", json_value(json!({"id": 7})))
            .with_object_parameter("shop", &["@"]);
        assert_eq!(
            Instruction::from(call).to_jsonable(),
            json!({
                "type": "call",
                "value": {
                    "object": ["@", "cart"],
                    "href": "../cart/",
                    "parameters": [{
                        "name": "item",
                        "value": {
                            "type": "https://qworum.net/ns/v1/data/ json",
                            "value": {"id": 7},
                        },
                    }],
                    "objectParameters": [{"name": "shop", "object": ["@"]}],
                },
            })
        );
    }

    #[test]
    fn call_defaults() {
        let encoded = json!({"type": "call", "value": {"href": "home/"}});
        let decoded = Instruction::from_jsonable(&encoded).expect("decodes");
        let Instruction::Call(call) = decoded else {
            panic!("expected a call");
        };
        assert_eq!(call.object(), ["@"]);
        assert!(call.parameters().is_empty());
        assert!(call.object_parameters().is_empty());
    }

    #[test]
    fn data_read_and_write() {
        let read = Script::build(Data::build(&["a", "b"], None).expect("valid"));
        assert_eq!(
            read.to_jsonable(),
            json!({"type": "data", "value": {"path": ["a", "b"], "statement": null}})
        );
        assert_eq!(Script::from_jsonable(&read.to_jsonable()).expect("decodes"), read);

        let write = Script::build(Data::build(&["a"], Some(json_value(json!(5)))).expect("valid"));
        let decoded = Script::from_jsonable(&write.to_jsonable()).expect("decodes");
        let Instruction::Data(data) = decoded.instruction() else {
            panic!("expected data");
        };
        assert!(data.statement().is_some());
        assert_eq!(decoded, write);
    }

    #[test]
    fn try_wire_shape() {
        let clause =
            CatchClause::build(&["* empty cart"], vec![json_value(json!(0))]).expect("valid");
        let t = Try::build(Call::build::<&str>(&[], Some("cart/")), vec![clause]).expect("valid");
        let encoded = Instruction::from(t).to_jsonable();
        assert_eq!(
            encoded["value"]["catch"],
            json!([{
                "catch": ["* empty cart"],
                "do": [{"type": "https://qworum.net/ns/v1/data/ json", "value": 0}],
            }])
        );
    }

    #[test]
    fn faults_dispatch_on_type() {
        let decode_fault =
            |value: Value| Instruction::from_jsonable(&json!({"type": "fault", "value": value}));
        let service = decode_fault(json!({"type": "* x"})).expect("decodes");
        assert!(matches!(service, Instruction::Fault(_)));
        let platform = decode_fault(json!({"type": "origin"})).expect("decodes");
        assert!(matches!(platform, Instruction::PlatformFault(_)));
        let default = decode_fault(json!({})).expect("decodes");
        assert_eq!(default, Instruction::Fault(Fault::default()));
        assert!(matches!(
            Instruction::from_jsonable(&json!({"type": "fault", "value": {"type": "bogus"}})),
            Err(DecodeError::Validation(ValidationError::FaultType(
                FaultTypeError::NotServiceSpecific(_)
            )))
        ));
    }

    #[test]
    fn precise_decode_errors() {
        assert!(matches!(
            Statement::from_jsonable(&json!({"type": "jump", "value": {}})),
            Err(DecodeError::UnknownTag(t)) if t == "jump"
        ));
        assert!(matches!(Statement::from_jsonable(&json!([1])), Err(DecodeError::NotTagged)));
        assert!(matches!(
            Instruction::from_jsonable(&json!({"type": "return", "value": {}})),
            Err(DecodeError::MissingField { context: "return", field: "statement" })
        ));
        assert!(matches!(
            Instruction::from_jsonable(&json!({"type": "data", "value": {"path": ["a", 1]}})),
            Err(DecodeError::InvalidField { context: "data", field: "path", .. })
        ));
        assert!(matches!(
            Instruction::from_jsonable(&json!({"type": "sequence", "value": {"statements": []}})),
            Err(DecodeError::Validation(ValidationError::Empty { what: "sequence" }))
        ));
        assert!(matches!(
            Script::from_jsonable(&json!({
                "type": "https://qworum.net/ns/v1/data/ json",
                "value": 1,
            })),
            Err(DecodeError::NotAnInstruction)
        ));
        assert!(matches!(
            DataValue::from_jsonable(&json!({"type": "goto", "value": {}})),
            Err(DecodeError::NotADataValue)
        ));
    }

    #[test]
    fn semantic_data_as_quads_or_text() {
        let quad = RdfQuad::triple(
            RdfTerm::iri("urn:a"),
            RdfTerm::iri("urn:b"),
            RdfTerm::literal(Literal::simple("c")),
        )
        .expect("valid");
        let data: SemanticData = [quad.clone()].into_iter().collect();
        let encoded = DataValue::from(data.clone()).to_jsonable();
        assert_eq!(encoded["type"], json!("https://qworum.net/ns/v1/data/ semantic"));
        assert_eq!(encoded["value"], json!([quad.to_jsonable()]));
        assert_eq!(
            DataValue::from_jsonable(&encoded).expect("decodes"),
            DataValue::from(data.clone())
        );

        let text = json!({
            "type": "https://qworum.net/ns/v1/data/ semantic",
            "value": "<a> <urn:b> \"c\" .",
            "url": "https://example.org/",
        });
        let decoded = DataValue::from_jsonable(&text).expect("decodes");
        let DataValue::SemanticData(from_text) = decoded else {
            panic!("expected semantic data");
        };
        let quad = from_text.quads().next().expect("one quad");
        assert_eq!(quad.subject(), &RdfTerm::iri("https://example.org/a"));
    }
}
