//! XML encoding.
//!
//! Instructions are elements of [`INSTRUCTION_NAMESPACE`], data values
//! elements of [`DATA_NAMESPACE`]. The outermost element declares its
//! namespace as the default one; a nested element reuses a prefix already
//! bound to its namespace or declares a fresh one. Path and object lists
//! travel as JSON arrays inside a single attribute.
//!
//! Decoding resolves each element's namespace through a
//! [`NamespaceScope`] chain and dispatches on the local name. Comments,
//! processing instructions and whitespace-only text between elements are
//! ignored; any other text where elements are expected is an error.

use qworum_xml::namespace::{local_name, qualified_name, xmlns_attribute};
use qworum_xml::syntax::is_blank;
use qworum_xml::{parse_with, write, Element, NamespaceScope, Node, ParserOptions};
use serde_json::Value;
use tracing::trace;

use super::json::fault_from_type;
use crate::error::{DecodeError, EncodeError, RdfError};
use crate::model::{
    Call, CatchClause, Data, DataValue, Fault, Goto, Instruction, Json, Return, Script, Sequence,
    Statement, Try, DATA_NAMESPACE, INSTRUCTION_NAMESPACE,
};
use crate::rdf::{RdfFormat, SemanticData};

const INSTRUCTION_PREFIXES: &[&str] = &["q"];
const DATA_PREFIXES: &[&str] = &["d"];

const CATCH: &str = "catch";
const DATA_ARGS: &str = "data-args";
const DATA_ARG: &str = "data-arg";
const OBJECT_ARGS: &str = "object-args";
const OBJECT_ARG: &str = "object-arg";

fn parser_options() -> ParserOptions {
    ParserOptions {
        drop_blank_text: true,
        ..ParserOptions::default()
    }
}

impl Script {
    /// Encodes the script as an XML document.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::Rdf`] when embedded semantic data cannot be
    /// written as RDF text, and [`EncodeError::Xml`] when a string holds a
    /// character outside the XML character range.
    pub fn to_xml(&self) -> Result<String, EncodeError> {
        Ok(write(&self.to_xml_element(&NamespaceScope::new())?)?)
    }

    /// Encodes the root instruction as an element nested in `scope`.
    ///
    /// # Errors
    ///
    /// As [`Script::to_xml`].
    pub fn to_xml_element(&self, scope: &NamespaceScope<'_>) -> Result<Element, RdfError> {
        self.instruction().to_xml_element(scope)
    }

    /// Decodes a script from XML text.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Syntax`] for malformed XML and the other
    /// [`DecodeError`] variants when the root is not a valid instruction.
    pub fn from_xml(text: &str) -> Result<Self, DecodeError> {
        let document = parse_with(text, &parser_options())?;
        Self::from_xml_element(document.root(), &NamespaceScope::new())
    }

    /// Decodes a script from an element nested in `scope`.
    ///
    /// # Errors
    ///
    /// As [`Script::from_xml`], minus syntax errors.
    pub fn from_xml_element(
        element: &Element,
        scope: &NamespaceScope<'_>,
    ) -> Result<Self, DecodeError> {
        Instruction::from_xml_element(element, scope).map(Script::build)
    }
}

impl Statement {
    /// Encodes the statement as an element nested in `scope`.
    ///
    /// # Errors
    ///
    /// Returns an [`RdfError`] when embedded semantic data cannot be
    /// written.
    pub fn to_xml_element(&self, scope: &NamespaceScope<'_>) -> Result<Element, RdfError> {
        match self {
            Statement::Instruction(i) => i.to_xml_element(scope),
            Statement::Data(d) => d.to_xml_element(scope),
        }
    }

    /// Decodes an instruction or data value from its element.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnknownElement`] when the element is in
    /// neither namespace, and the variant's errors otherwise.
    pub fn from_xml_element(
        element: &Element,
        scope: &NamespaceScope<'_>,
    ) -> Result<Self, DecodeError> {
        let inner = scope.push(element);
        match inner.find_namespace(&element.name) {
            Some(DATA_NAMESPACE) => DataValue::decode(element).map(Statement::from),
            Some(INSTRUCTION_NAMESPACE) => {
                Instruction::decode(element, &inner).map(Statement::from)
            }
            namespace => Err(unknown_element(element, namespace)),
        }
    }
}

impl Instruction {
    /// Encodes the instruction as an element nested in `scope`.
    ///
    /// # Errors
    ///
    /// Returns an [`RdfError`] when embedded semantic data cannot be
    /// written.
    pub fn to_xml_element(&self, scope: &NamespaceScope<'_>) -> Result<Element, RdfError> {
        let (mut element, scope) = open_instruction(scope, self.tag());
        match self {
            Instruction::Fault(f) => {
                element = element.with_attribute("type", f.fault_type());
            }
            Instruction::PlatformFault(f) => {
                element = element.with_attribute("type", f.fault_type());
            }
            Instruction::Return(r) => element = append(element, &scope, [r.statement()])?,
            Instruction::Sequence(s) => element = append(element, &scope, s.statements())?,
            Instruction::Data(d) => {
                element = element.with_attribute("path", json_list(d.path()));
                element = append(element, &scope, d.statement())?;
            }
            Instruction::Try(t) => {
                element = append(element, &scope, [t.statement()])?;
                for clause in t.catch_clauses() {
                    let (mut catch, inner) = open_instruction(&scope, CATCH);
                    if !clause.catch().is_empty() {
                        catch = catch.with_attribute("faults", json_list(clause.catch()));
                    }
                    catch = append(catch, &inner, clause.statements())?;
                    element = element.with_child(Node::Element(catch));
                }
            }
            Instruction::Goto(g) => {
                if let Some(href) = g.href() {
                    element = element.with_attribute("href", href);
                }
            }
            Instruction::Call(c) => element = call_element(element, &scope, c)?,
        }
        Ok(element)
    }

    /// Decodes an instruction from its element.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotAnInstruction`] for a data element,
    /// [`DecodeError::UnknownElement`] for anything else that is not an
    /// instruction, and field, content or validation errors for malformed
    /// operands.
    pub fn from_xml_element(
        element: &Element,
        scope: &NamespaceScope<'_>,
    ) -> Result<Self, DecodeError> {
        let inner = scope.push(element);
        match inner.find_namespace(&element.name) {
            Some(INSTRUCTION_NAMESPACE) => Self::decode(element, &inner),
            Some(DATA_NAMESPACE) => Err(DecodeError::NotAnInstruction),
            namespace => Err(unknown_element(element, namespace)),
        }
    }

    /// Decodes an element already known to be in the instruction
    /// namespace. `scope` includes the element's own declarations.
    fn decode(element: &Element, scope: &NamespaceScope<'_>) -> Result<Self, DecodeError> {
        let tag = local_name(&element.name);
        trace!(tag, "decoding XML instruction");
        match tag {
            Fault::TAG => {
                expect_no_children(element, Fault::TAG)?;
                fault_from_type(element.attribute("type"))
            }
            Return::TAG => {
                let child = single(element, Return::TAG, "statement")?;
                Ok(Return::build(Statement::from_xml_element(child, scope)?).into())
            }
            Sequence::TAG => {
                Ok(Sequence::build(statements(element, scope, Sequence::TAG)?)?.into())
            }
            Data::TAG => {
                let path = json_list_attribute(element, Data::TAG, "path")?
                    .ok_or(DecodeError::MissingField {
                        context: Data::TAG,
                        field: "path",
                    })?;
                let statement = match children(element, Data::TAG)?.as_slice() {
                    [] => None,
                    [child] => Some(Statement::from_xml_element(child, scope)?),
                    [_, extra, ..] => {
                        return Err(DecodeError::UnexpectedContent {
                            context: Data::TAG,
                            found: format!("second statement <{}>", extra.name),
                        })
                    }
                };
                Ok(Data::build(&path, statement)?.into())
            }
            Try::TAG => try_from_element(element, scope),
            Goto::TAG => {
                expect_no_children(element, Goto::TAG)?;
                Ok(Goto::build(element.attribute("href")).into())
            }
            Call::TAG => call_from_element(element, scope).map(Instruction::from),
            _ => Err(unknown_element(element, Some(INSTRUCTION_NAMESPACE))),
        }
    }
}

impl DataValue {
    /// Encodes the data value as a standalone XML document.
    ///
    /// # Errors
    ///
    /// As [`Script::to_xml`].
    pub fn to_xml(&self) -> Result<String, EncodeError> {
        Ok(write(&self.to_xml_element(&NamespaceScope::new())?)?)
    }

    /// Encodes the data value as an element nested in `scope`.
    ///
    /// # Errors
    ///
    /// Returns an [`RdfError`] when semantic data cannot be written.
    pub fn to_xml_element(&self, scope: &NamespaceScope<'_>) -> Result<Element, RdfError> {
        let (element, _) = open(scope, DATA_NAMESPACE, DATA_PREFIXES, self.tag());
        Ok(match self {
            DataValue::Json(j) => element.with_text(json_text(j.value())),
            DataValue::SemanticData(s) => {
                let format = RdfFormat::default();
                element
                    .with_attribute("type", format.as_str())
                    .with_text(s.to_raw_string(format)?)
            }
        })
    }

    /// Decodes a standalone data value document.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Syntax`] for malformed XML and the other
    /// [`DecodeError`] variants when the root is not a valid data value.
    pub fn from_xml(text: &str) -> Result<Self, DecodeError> {
        let document = parse_with(text, &parser_options())?;
        Self::from_xml_element(document.root(), &NamespaceScope::new())
    }

    /// Decodes a data value from its element.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::NotADataValue`] for an instruction element,
    /// [`DecodeError::UnknownElement`] for anything else that is not a data
    /// value, and content or RDF errors for a malformed payload.
    pub fn from_xml_element(
        element: &Element,
        scope: &NamespaceScope<'_>,
    ) -> Result<Self, DecodeError> {
        let inner = scope.push(element);
        match inner.find_namespace(&element.name) {
            Some(DATA_NAMESPACE) => Self::decode(element),
            Some(INSTRUCTION_NAMESPACE) => Err(DecodeError::NotADataValue),
            namespace => Err(unknown_element(element, namespace)),
        }
    }

    fn decode(element: &Element) -> Result<Self, DecodeError> {
        let tag = local_name(&element.name);
        trace!(tag, "decoding XML data value");
        match tag {
            Json::TAG => {
                let text = text_content(element, Json::TAG)?;
                let value: Value =
                    serde_json::from_str(&text).map_err(|e| DecodeError::InvalidField {
                        context: Json::TAG,
                        field: "content",
                        reason: e.to_string(),
                    })?;
                Ok(Json::from_value(value).into())
            }
            SemanticData::TAG => {
                let format = element
                    .attribute("type")
                    .map(str::parse::<RdfFormat>)
                    .transpose()?
                    .unwrap_or_default();
                let mut data = SemanticData::build();
                data.read_from_text_as(format, &text_content(element, SemanticData::TAG)?, None)?;
                Ok(data.into())
            }
            _ => Err(unknown_element(element, Some(DATA_NAMESPACE))),
        }
    }
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Starts an element named `local` in `namespace`, declaring the namespace
/// when no prefix is bound to it yet. Returns the element and the scope
/// its children are written in.
fn open<'s>(
    scope: &'s NamespaceScope<'s>,
    namespace: &str,
    candidates: &[&str],
    local: &str,
) -> (Element, NamespaceScope<'s>) {
    let (name, declared) = match scope.bound_prefix(namespace) {
        Some(prefix) => (qualified_name(prefix, local), None),
        None if scope.lookup("").is_none() => (local.to_owned(), Some(String::new())),
        None => {
            let prefix = scope.prefix_for(namespace, candidates).prefix().to_owned();
            (qualified_name(&prefix, local), Some(prefix))
        }
    };
    let mut element = Element::new(name);
    if let Some(prefix) = declared {
        element = element.with_attribute(xmlns_attribute(&prefix), namespace);
    }
    let inner = scope.push(&element);
    (element, inner)
}

fn open_instruction<'s>(
    scope: &'s NamespaceScope<'s>,
    local: &str,
) -> (Element, NamespaceScope<'s>) {
    open(scope, INSTRUCTION_NAMESPACE, INSTRUCTION_PREFIXES, local)
}

fn append<'a>(
    mut element: Element,
    scope: &NamespaceScope<'_>,
    statements: impl IntoIterator<Item = &'a Statement>,
) -> Result<Element, RdfError> {
    for statement in statements {
        element = element.with_child(Node::Element(statement.to_xml_element(scope)?));
    }
    Ok(element)
}

fn json_list(items: &[String]) -> String {
    json_text(&Value::from(items.to_vec()))
}

/// JSON text with the two noncharacters XML cannot carry written as
/// `\u` escapes. They only occur inside strings, where the escape is exact.
fn json_text(value: &Value) -> String {
    let text = value.to_string();
    if text.contains(['\u{FFFE}', '\u{FFFF}']) {
        text.replace('\u{FFFE}', "\\ufffe").replace('\u{FFFF}', "\\uffff")
    } else {
        text
    }
}

fn call_element(
    mut element: Element,
    scope: &NamespaceScope<'_>,
    call: &Call,
) -> Result<Element, RdfError> {
    element = element.with_attribute("object", json_list(call.object()));
    if let Some(href) = call.href() {
        element = element.with_attribute("href", href);
    }

    if !call.parameters().is_empty() {
        let (mut args, args_scope) = open_instruction(scope, DATA_ARGS);
        for parameter in call.parameters() {
            let (arg, arg_scope) = open_instruction(&args_scope, DATA_ARG);
            let arg = arg.with_attribute("name", &parameter.name);
            let arg = append(arg, &arg_scope, [&parameter.value])?;
            args = args.with_child(Node::Element(arg));
        }
        element = element.with_child(Node::Element(args));
    }

    if !call.object_parameters().is_empty() {
        let (mut args, args_scope) = open_instruction(scope, OBJECT_ARGS);
        for parameter in call.object_parameters() {
            let (arg, _) = open_instruction(&args_scope, OBJECT_ARG);
            let arg = arg
                .with_attribute("name", &parameter.name)
                .with_attribute("object", json_list(&parameter.object));
            args = args.with_child(Node::Element(arg));
        }
        element = element.with_child(Node::Element(args));
    }
    Ok(element)
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

fn unknown_element(element: &Element, namespace: Option<&str>) -> DecodeError {
    DecodeError::UnknownElement {
        name: element.name.clone(),
        namespace: namespace.map(str::to_owned),
    }
}

/// The child elements, rejecting non-blank text.
fn children<'e>(
    element: &'e Element,
    context: &'static str,
) -> Result<Vec<&'e Element>, DecodeError> {
    let mut elements = Vec::new();
    for node in &element.children {
        match node {
            Node::Element(e) => elements.push(e),
            Node::Text(t) | Node::CData(t) if !is_blank(t) => {
                return Err(DecodeError::UnexpectedContent {
                    context,
                    found: format!("text {:?}", t.trim()),
                })
            }
            _ => {}
        }
    }
    Ok(elements)
}

fn expect_no_children(element: &Element, context: &'static str) -> Result<(), DecodeError> {
    match children(element, context)?.first() {
        None => Ok(()),
        Some(child) => Err(DecodeError::UnexpectedContent {
            context,
            found: format!("element <{}>", child.name),
        }),
    }
}

fn single<'e>(
    element: &'e Element,
    context: &'static str,
    field: &'static str,
) -> Result<&'e Element, DecodeError> {
    match children(element, context)?.as_slice() {
        [child] => Ok(child),
        [] => Err(DecodeError::MissingField { context, field }),
        [_, extra, ..] => Err(DecodeError::UnexpectedContent {
            context,
            found: format!("element <{}>", extra.name),
        }),
    }
}

fn statements(
    element: &Element,
    scope: &NamespaceScope<'_>,
    context: &'static str,
) -> Result<Vec<Statement>, DecodeError> {
    children(element, context)?
        .into_iter()
        .map(|child| Statement::from_xml_element(child, scope))
        .collect()
}

/// Text and CDATA content of a data element, which must hold no element.
fn text_content(element: &Element, context: &'static str) -> Result<String, DecodeError> {
    if let Some(child) = element.child_elements().next() {
        return Err(DecodeError::UnexpectedContent {
            context,
            found: format!("element <{}>", child.name),
        });
    }
    Ok(element.text())
}

fn json_list_attribute(
    element: &Element,
    context: &'static str,
    field: &'static str,
) -> Result<Option<Vec<String>>, DecodeError> {
    element
        .attribute(field)
        .map(|text| {
            serde_json::from_str::<Vec<String>>(text).map_err(|e| DecodeError::InvalidField {
                context,
                field,
                reason: e.to_string(),
            })
        })
        .transpose()
}

/// Whether `element` is the instruction-namespace element `local`.
fn is_instruction_element(element: &Element, scope: &NamespaceScope<'_>, local: &str) -> bool {
    let inner = scope.push(element);
    inner.find_namespace(&element.name) == Some(INSTRUCTION_NAMESPACE)
        && local_name(&element.name) == local
}

fn try_from_element(
    element: &Element,
    scope: &NamespaceScope<'_>,
) -> Result<Instruction, DecodeError> {
    let mut children = children(element, Try::TAG)?.into_iter();
    let statement = children.next().ok_or(DecodeError::MissingField {
        context: Try::TAG,
        field: "statement",
    })?;
    let statement = Statement::from_xml_element(statement, scope)?;

    let clauses = children
        .map(|child| {
            if !is_instruction_element(child, scope, CATCH) {
                return Err(DecodeError::UnexpectedContent {
                    context: Try::TAG,
                    found: format!("element <{}> where a catch clause was expected", child.name),
                });
            }
            let inner = scope.push(child);
            let catch = json_list_attribute(child, CATCH, "faults")?.unwrap_or_default();
            Ok(CatchClause::build(&catch, statements(child, &inner, CATCH)?)?)
        })
        .collect::<Result<Vec<_>, DecodeError>>()?;
    Ok(Try::build(statement, clauses)?.into())
}

fn call_from_element(element: &Element, scope: &NamespaceScope<'_>) -> Result<Call, DecodeError> {
    let object = json_list_attribute(element, Call::TAG, "object")?.unwrap_or_default();
    let mut call = Call::build(&object, element.attribute("href"));

    for container in children(element, Call::TAG)? {
        let container_scope = scope.push(container);
        if is_instruction_element(container, scope, DATA_ARGS) {
            for arg in children(container, DATA_ARGS)? {
                if !is_instruction_element(arg, &container_scope, DATA_ARG) {
                    return Err(unexpected_child(DATA_ARGS, arg));
                }
                let arg_scope = container_scope.push(arg);
                let name = arg.attribute("name").ok_or(DecodeError::MissingField {
                    context: DATA_ARG,
                    field: "name",
                })?;
                let value = single(arg, DATA_ARG, "statement")?;
                call = call.with_parameter(name, Statement::from_xml_element(value, &arg_scope)?);
            }
        } else if is_instruction_element(container, scope, OBJECT_ARGS) {
            for arg in children(container, OBJECT_ARGS)? {
                if !is_instruction_element(arg, &container_scope, OBJECT_ARG) {
                    return Err(unexpected_child(OBJECT_ARGS, arg));
                }
                expect_no_children(arg, OBJECT_ARG)?;
                let name = arg.attribute("name").ok_or(DecodeError::MissingField {
                    context: OBJECT_ARG,
                    field: "name",
                })?;
                let object = json_list_attribute(arg, OBJECT_ARG, "object")?.unwrap_or_default();
                call = call.with_object_parameter(name, &object);
            }
        } else {
            return Err(unexpected_child(Call::TAG, container));
        }
    }
    Ok(call)
}

fn unexpected_child(context: &'static str, child: &Element) -> DecodeError {
    DecodeError::UnexpectedContent {
        context,
        found: format!("element <{}>", child.name),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::error::ValidationError;
    use crate::rdf::{Literal, RdfQuad, RdfTerm};

    fn json_value(v: Value) -> Statement {
        Json::from_value(v).into()
    }

    fn round_trip(script: &Script) -> Script {
        let xml = script.to_xml().expect("encodes");
        Script::from_xml(&xml).expect("decodes")
    }

    #[test]
    fn call_wire_shape() {
        let call = Call::build::<&str>(&[], Some("home/"))
            .with_parameter("x", json_value(json!(1)))
            .with_object_parameter("o", &["@", "a"]);
        let xml = Script::build(call).to_xml().expect("encodes");
        assert_eq!(
            xml,
            concat!(
                r#"<call xmlns="https://qworum.net/ns/v1/instruction/" object="[&quot;@&quot;]" href="home/">"#,
                r#"<data-args><data-arg name="x">"#,
                r#"<d:json xmlns:d="https://qworum.net/ns/v1/data/">1</d:json>"#,
                r#"</data-arg></data-args>"#,
                r#"<object-args><object-arg name="o" object="[&quot;@&quot;,&quot;a&quot;]"></object-arg></object-args>"#,
                r#"</call>"#,
            )
        );
    }

    #[test]
    fn standalone_data_uses_default_namespace() {
        let xml = DataValue::from(Json::from_value(json!({"a": [1, 2]})))
            .to_xml()
            .expect("encodes");
        assert_eq!(
            xml,
            r#"<json xmlns="https://qworum.net/ns/v1/data/">{&quot;a&quot;:[1,2]}</json>"#
        );
        let back = DataValue::from_xml(&xml).expect("decodes");
        assert_eq!(back, DataValue::from(Json::from_value(json!({"a": [1, 2]}))));
    }

    #[test]
    fn data_with_and_without_statement() {
        let read = Script::build(Data::build(&["a", "b"], None).expect("valid"));
        assert_eq!(
            read.to_xml().expect("encodes"),
            r#"<data xmlns="https://qworum.net/ns/v1/instruction/" path="[&quot;a&quot;,&quot;b&quot;]"></data>"#
        );
        assert_eq!(round_trip(&read), read);

        let write = Script::build(Data::build(&["a"], Some(json_value(json!(5)))).expect("valid"));
        assert_eq!(round_trip(&write), write);
    }

    #[test]
    fn try_and_faults_round_trip() {
        let other = Fault::build(Some("* other")).expect("valid");
        let clauses = vec![
            CatchClause::build(&["* empty cart"], vec![json_value(json!(0))]).expect("valid"),
            CatchClause::build::<&str>(&[], vec![other.into()]).expect("valid"),
        ];
        let call = Call::build(&["@", "cart"], None);
        let script = Script::build(Try::build(call, clauses).expect("valid"));
        let xml = script.to_xml().expect("encodes");
        assert!(xml.contains(r#"<catch faults="[&quot;* empty cart&quot;]">"#), "{xml}");
        assert!(xml.contains("<catch><fault type=\"* other\"></fault></catch>"), "{xml}");
        assert_eq!(round_trip(&script), script);
    }

    #[test]
    fn foreign_prefixes_are_resolved() {
        let xml = r#"<?xml version="1.0"?>
            <!-- a comment -->
            <q:sequence xmlns:q="https://qworum.net/ns/v1/instruction/" xmlns:x="https://qworum.net/ns/v1/data/">
                <?keep going?>
                <q:goto href="next/"/>
                <x:json> "hello" </x:json>
            </q:sequence>"#;
        let script = Script::from_xml(xml).expect("decodes");
        let expected = Script::build(
            Sequence::build(vec![
                Goto::build(Some("next/")).into(),
                json_value(json!("hello")),
            ])
            .expect("valid"),
        );
        assert_eq!(script, expected);
    }

    #[test]
    fn semantic_data_defaults_to_trig() {
        let xml = r#"<semantic xmlns="https://qworum.net/ns/v1/data/"><![CDATA[<urn:g> { <urn:a> <urn:b> "c" . }]]></semantic>"#;
        let DataValue::SemanticData(data) = DataValue::from_xml(xml).expect("decodes") else {
            panic!("expected semantic data");
        };
        let quad = data.quads().next().expect("one quad");
        assert_eq!(quad.graph(), &RdfTerm::iri("urn:g"));

        let encoded = DataValue::from(data.clone()).to_xml().expect("encodes");
        let head = r#"<semantic xmlns="https://qworum.net/ns/v1/data/" type="trig">"#;
        assert!(encoded.starts_with(head), "{encoded}");
        assert_eq!(DataValue::from_xml(&encoded).expect("decodes"), DataValue::from(data));
    }

    #[test]
    fn semantic_data_inside_a_return() {
        let quad = RdfQuad::triple(
            RdfTerm::iri("https://example.org/a"),
            RdfTerm::iri("https://schema.org/name"),
            RdfTerm::literal(Literal::lang("A & B", "en")),
        )
        .expect("valid");
        let data: SemanticData = [quad].into_iter().collect();
        let script = Script::build(Return::build(data));
        assert_eq!(round_trip(&script), script);
    }

    #[test]
    fn decode_errors() {
        let stray = r#"<sequence xmlns="https://qworum.net/ns/v1/instruction/">stray<goto/></sequence>"#;
        let empty = r#"<sequence xmlns="https://qworum.net/ns/v1/instruction/"></sequence>"#;
        let rdf_xml = r#"<semantic xmlns="https://qworum.net/ns/v1/data/" type="rdf-xml"></semantic>"#;
        assert!(matches!(
            Script::from_xml(r#"<call xmlns="urn:other"/>"#),
            Err(DecodeError::UnknownElement { namespace: Some(ns), .. }) if ns == "urn:other"
        ));
        assert!(matches!(
            Script::from_xml("<call/>"),
            Err(DecodeError::UnknownElement { namespace: None, .. })
        ));
        assert!(matches!(
            Script::from_xml(r#"<json xmlns="https://qworum.net/ns/v1/data/">1</json>"#),
            Err(DecodeError::NotAnInstruction)
        ));
        assert!(matches!(
            Script::from_xml(stray),
            Err(DecodeError::UnexpectedContent { context: "sequence", .. })
        ));
        assert!(matches!(
            Script::from_xml(empty),
            Err(DecodeError::Validation(ValidationError::Empty { .. }))
        ));
        assert!(matches!(
            Script::from_xml(r#"<data xmlns="https://qworum.net/ns/v1/instruction/" path="a"/>"#),
            Err(DecodeError::InvalidField { field: "path", .. })
        ));
        assert!(matches!(
            Script::from_xml(r#"<a><b></a>"#),
            Err(DecodeError::Syntax(_))
        ));
        assert!(matches!(
            DataValue::from_xml(rdf_xml),
            Err(DecodeError::Rdf(RdfError::UnknownFormat(_)))
        ));
    }

    #[test]
    fn line_breaks_in_attributes_survive() {
        let call = Call::build(&["@"], Some("a\tb\nc\r"))
            .with_parameter("a\tb", json_value(json!("x\ry")))
            .with_object_parameter("line\none", &["@"]);
        let fault = Fault::build(Some("* line1\nline2")).expect("valid");
        let sequence = Sequence::build(vec![call.into(), fault.into()]).expect("valid");
        let script = Script::build(sequence);
        let xml = script.to_xml().expect("encodes");
        assert!(xml.contains(r#"href="a&#9;b&#10;c&#13;""#), "{xml}");
        assert!(xml.contains(r#"type="* line1&#10;line2""#), "{xml}");
        assert_eq!(round_trip(&script), script);
    }

    #[test]
    fn noncharacters_in_json_are_escaped() {
        let value = DataValue::from(Json::from_value(json!(["\u{FFFE}", "\u{FFFF}"])));
        let xml = value.to_xml().expect("encodes");
        assert!(xml.contains(r#"["\ufffe","\uffff"]"#), "{xml}");
        assert_eq!(DataValue::from_xml(&xml).expect("decodes"), value);
    }

    #[test]
    fn unrepresentable_characters_fail_to_encode() {
        let script = Script::build(Goto::build(Some("a\u{1}b")));
        assert!(matches!(
            script.to_xml(),
            Err(EncodeError::Xml(qworum_xml::WriteError::InvalidChar { character: '\u{1}', .. }))
        ));
    }

    #[test]
    fn deep_nesting_is_a_syntax_error() {
        let open = r#"<sequence xmlns="https://qworum.net/ns/v1/instruction/">"#;
        let xml = format!("{open}{}", "<sequence>".repeat(10_000));
        let Err(DecodeError::Syntax(err)) = Script::from_xml(&xml) else {
            panic!("expected a syntax error");
        };
        assert!(err.message.starts_with("Excessive depth"), "{err}");
    }
}
