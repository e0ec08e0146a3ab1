//! Instruction variants.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::{FaultTypeError, ValidationError};
use crate::fault::{self, Category};
use crate::model::{join, NonEmpty, Statement};

/// Object path used by a [`Call`] that names no object: the current one.
pub const CURRENT_OBJECT: &str = "@";

/// Namespace of instruction elements in the XML encoding.
pub const INSTRUCTION_NAMESPACE: &str = "https://qworum.net/ns/v1/instruction/";

/// An executable step. The variant set is closed.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// A fault raised by a service.
    Fault(Fault),
    /// A fault raised by the runtime.
    PlatformFault(PlatformFault),
    /// Ends the current call with a result.
    Return(Return),
    /// Runs statements in order.
    Sequence(Sequence),
    /// Reads or writes a data container.
    Data(Data),
    /// Runs a statement, handling faults it raises.
    Try(Try),
    /// Starts a new call phase.
    Goto(Goto),
    /// Calls a remote object.
    Call(Call),
}

impl Instruction {
    /// The wire tag shared by the JSON and XML encodings.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Instruction::Fault(_) | Instruction::PlatformFault(_) => Fault::TAG,
            Instruction::Return(_) => Return::TAG,
            Instruction::Sequence(_) => Sequence::TAG,
            Instruction::Data(_) => Data::TAG,
            Instruction::Try(_) => Try::TAG,
            Instruction::Goto(_) => Goto::TAG,
            Instruction::Call(_) => Call::TAG,
        }
    }
}

macro_rules! instruction_from {
    ($($variant:ident),* $(,)?) => {
        $(
            impl From<$variant> for Instruction {
                fn from(v: $variant) -> Self {
                    Instruction::$variant(v)
                }
            }
        )*
    };
}

instruction_from!(Fault, PlatformFault, Return, Sequence, Data, Try, Goto, Call);

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Fault(i) => i.fmt(f),
            Instruction::PlatformFault(i) => i.fmt(f),
            Instruction::Return(i) => i.fmt(f),
            Instruction::Sequence(i) => i.fmt(f),
            Instruction::Data(i) => i.fmt(f),
            Instruction::Try(i) => i.fmt(f),
            Instruction::Goto(i) => i.fmt(f),
            Instruction::Call(i) => i.fmt(f),
        }
    }
}

// ===========================================================================
// Faults
// ===========================================================================

/// A service-specific fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    fault_type: String,
}

impl Fault {
    /// Wire tag.
    pub const TAG: &'static str = "fault";

    /// Builds a fault of the given service-specific type, or of type
    /// `"service-specific"` when none is given.
    ///
    /// # Errors
    ///
    /// Returns [`FaultTypeError::NotServiceSpecific`] when the type is neither
    /// `"service-specific"` nor starts with `*`.
    pub fn build(fault_type: Option<&str>) -> Result<Self, FaultTypeError> {
        let fault_type = fault_type.unwrap_or(fault::SERVICE_SPECIFIC);
        if !fault::is_service_specific(fault_type) {
            return Err(FaultTypeError::NotServiceSpecific(fault_type.to_owned()));
        }
        Ok(Self {
            fault_type: fault_type.to_owned(),
        })
    }

    /// The fault type.
    #[must_use]
    pub fn fault_type(&self) -> &str {
        &self.fault_type
    }

    /// The categories of this fault's type.
    #[must_use]
    pub fn categories(&self) -> BTreeSet<Category> {
        fault::classify(&self.fault_type)
    }

    /// Whether a catch clause listing `requested` catches this fault.
    #[must_use]
    pub fn matches<S: AsRef<str>>(&self, requested: &[S]) -> bool {
        fault::matches(&self.fault_type, requested)
    }
}

impl Default for Fault {
    fn default() -> Self {
        Self {
            fault_type: fault::SERVICE_SPECIFIC.to_owned(),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fault(type: {})", self.fault_type)
    }
}

/// A fault raised by the runtime rather than by a service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformFault(Fault);

impl PlatformFault {
    /// Builds a platform fault.
    ///
    /// # Errors
    ///
    /// Returns [`FaultTypeError::NotPlatform`] unless the type belongs to the
    /// platform subset of the taxonomy.
    pub fn build(fault_type: &str) -> Result<Self, FaultTypeError> {
        if !fault::is_platform(fault_type) {
            return Err(FaultTypeError::NotPlatform(fault_type.to_owned()));
        }
        Ok(Self(Fault {
            fault_type: fault_type.to_owned(),
        }))
    }

    /// The fault type.
    #[must_use]
    pub fn fault_type(&self) -> &str {
        self.0.fault_type()
    }

    /// The underlying fault, which carries the full set of known types.
    #[must_use]
    pub fn as_fault(&self) -> &Fault {
        &self.0
    }

    /// Whether a catch clause listing `requested` catches this fault.
    #[must_use]
    pub fn matches<S: AsRef<str>>(&self, requested: &[S]) -> bool {
        self.0.matches(requested)
    }
}

impl fmt::Display for PlatformFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlatformFault(type: {})", self.fault_type())
    }
}

// ===========================================================================
// Control flow
// ===========================================================================

/// Ends the current call, yielding a statement's result.
#[derive(Debug, Clone, PartialEq)]
pub struct Return {
    statement: Statement,
}

impl Return {
    /// Wire tag.
    pub const TAG: &'static str = "return";

    /// Returns the result of `statement`.
    pub fn build(statement: impl Into<Statement>) -> Self {
        Self {
            statement: statement.into(),
        }
    }

    /// The returned statement.
    #[must_use]
    pub fn statement(&self) -> &Statement {
        &self.statement
    }
}

impl fmt::Display for Return {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Return({})", self.statement)
    }
}

/// Statements executed in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequence {
    statements: NonEmpty<Statement>,
}

impl Sequence {
    /// Wire tag.
    pub const TAG: &'static str = "sequence";

    /// Builds a sequence.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] when `statements` is empty.
    pub fn build(statements: Vec<Statement>) -> Result<Self, ValidationError> {
        Ok(Self {
            statements: NonEmpty::new(statements, "sequence")?,
        })
    }

    /// The statements, in execution order.
    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Sequence(")?;
        join(f, &self.statements)?;
        f.write_str(")")
    }
}

/// Reads a data container, or writes one when a statement is present.
#[derive(Debug, Clone, PartialEq)]
pub struct Data {
    path: NonEmpty<String>,
    statement: Option<Statement>,
}

impl Data {
    /// Wire tag.
    pub const TAG: &'static str = "data";

    /// Builds a read (`statement` absent) or write of the container at
    /// `path`. Path elements are trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] when `path` is empty.
    pub fn build<S: AsRef<str>>(
        path: &[S],
        statement: Option<Statement>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            path: NonEmpty::new(trimmed(path), "data path")?,
            statement,
        })
    }

    /// The container path.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// The value to write, absent for reads.
    #[must_use]
    pub fn statement(&self) -> Option<&Statement> {
        self.statement.as_ref()
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Data(path: [")?;
        join(f, &self.path)?;
        match &self.statement {
            Some(s) => write!(f, "], statement: {s})"),
            None => f.write_str("], statement: null)"),
        }
    }
}

/// Runs a statement and handles the faults it raises.
#[derive(Debug, Clone, PartialEq)]
pub struct Try {
    statement: Statement,
    catch_clauses: NonEmpty<CatchClause>,
}

impl Try {
    /// Wire tag.
    pub const TAG: &'static str = "try";

    /// Builds a try instruction.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] when `catch_clauses` is empty.
    pub fn build(
        statement: impl Into<Statement>,
        catch_clauses: Vec<CatchClause>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            statement: statement.into(),
            catch_clauses: NonEmpty::new(catch_clauses, "try catch clauses")?,
        })
    }

    /// The guarded statement.
    #[must_use]
    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    /// The catch clauses, in declaration order.
    #[must_use]
    pub fn catch_clauses(&self) -> &[CatchClause] {
        &self.catch_clauses
    }

    /// The first clause catching a fault of type `fault_type`, or `None`
    /// when the fault propagates.
    #[must_use]
    pub fn select(&self, fault_type: &str) -> Option<&CatchClause> {
        self.catch_clauses.iter().find(|c| c.catches(fault_type))
    }
}

impl fmt::Display for Try {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Try({}, ", self.statement)?;
        join(f, &self.catch_clauses)?;
        f.write_str(")")
    }
}

/// Fault types to catch, and the statements run when one is caught.
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    catch: Vec<String>,
    statements: NonEmpty<Statement>,
}

impl CatchClause {
    /// Builds a clause. An empty `catch` list catches every fault.
    ///
    /// # Errors
    ///
    /// Returns [`FaultTypeError::InvalidCatchType`] (wrapped) when a listed
    /// type is not a known fault type, and [`ValidationError::Empty`] when
    /// `statements` is empty.
    pub fn build<S: AsRef<str>>(
        catch: &[S],
        statements: Vec<Statement>,
    ) -> Result<Self, ValidationError> {
        let catch = catch
            .iter()
            .map(|t| {
                let t = t.as_ref();
                if fault::is_platform(t) || fault::is_service_specific(t) {
                    Ok(t.to_owned())
                } else {
                    Err(FaultTypeError::InvalidCatchType(t.to_owned()))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            catch,
            statements: NonEmpty::new(statements, "catch clause")?,
        })
    }

    /// The fault types caught.
    #[must_use]
    pub fn catch(&self) -> &[String] {
        &self.catch
    }

    /// The statements run on a catch.
    #[must_use]
    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    /// Whether this clause catches a fault of type `fault_type`.
    #[must_use]
    pub fn catches(&self, fault_type: &str) -> bool {
        fault::matches(fault_type, &self.catch)
    }
}

impl fmt::Display for CatchClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{catch: \"{}\", do: [", self.catch.join(", "))?;
        join(f, &self.statements)?;
        f.write_str("]}")
    }
}

/// Starts a new call phase at a relative or absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Goto {
    href: Option<String>,
}

impl Goto {
    /// Wire tag.
    pub const TAG: &'static str = "goto";

    /// Builds a goto instruction.
    pub fn build(href: Option<&str>) -> Self {
        Self {
            href: href.map(str::to_owned),
        }
    }

    /// The target URL.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }
}

impl fmt::Display for Goto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Goto(href: {})", self.href.as_deref().unwrap_or("null"))
    }
}

// ===========================================================================
// Call
// ===========================================================================

/// A named statement passed to a call.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// Parameter name.
    pub name: String,
    /// Parameter value.
    pub value: Statement,
}

/// A named object path passed to a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectParameter {
    /// Parameter name.
    pub name: String,
    /// Path of the object passed.
    pub object: Vec<String>,
}

/// Calls an object at a URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    object: NonEmpty<String>,
    href: Option<String>,
    parameters: Vec<Parameter>,
    object_parameters: Vec<ObjectParameter>,
}

impl Call {
    /// Wire tag.
    pub const TAG: &'static str = "call";

    /// Builds a call on the object at path `object` (trimmed; `["@"]` when
    /// empty) with no parameters.
    pub fn build<S: AsRef<str>>(object: &[S], href: Option<&str>) -> Self {
        let object = NonEmpty::new(trimmed(object), "call object")
            .unwrap_or_else(|_| NonEmpty(vec![CURRENT_OBJECT.to_owned()]));
        Self {
            object,
            href: href.map(str::to_owned),
            parameters: Vec::new(),
            object_parameters: Vec::new(),
        }
    }

    /// Adds a data parameter.
    #[must_use]
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<Statement>) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Adds an object parameter.
    #[must_use]
    pub fn with_object_parameter<S: AsRef<str>>(
        mut self,
        name: impl Into<String>,
        object: &[S],
    ) -> Self {
        self.object_parameters.push(ObjectParameter {
            name: name.into(),
            object: object.iter().map(|s| s.as_ref().to_owned()).collect(),
        });
        self
    }

    /// Path of the called object.
    #[must_use]
    pub fn object(&self) -> &[String] {
        &self.object
    }

    /// The URL of the called method.
    #[must_use]
    pub fn href(&self) -> Option<&str> {
        self.href.as_deref()
    }

    /// Data parameters, in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Object parameters, in declaration order.
    #[must_use]
    pub fn object_parameters(&self) -> &[ObjectParameter] {
        &self.object_parameters
    }

    /// The first data parameter named `name`.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&Statement> {
        self.parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| &p.value)
    }

    /// The first object parameter named `name`.
    #[must_use]
    pub fn object_parameter(&self, name: &str) -> Option<&[String]> {
        self.object_parameters
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.object.as_slice())
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Call(object: [")?;
        join(f, &self.object)?;
        f.write_str("]")?;
        if let Some(href) = &self.href {
            write!(f, ", href: {href}")?;
        }
        if !self.object_parameters.is_empty() {
            f.write_str(", objectParameters: [")?;
            for (i, p) in self.object_parameters.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                let object = serde_json::to_string(&p.object).map_err(|_| fmt::Error)?;
                write!(f, "{{name: {}, object: {object}}}", p.name)?;
            }
            f.write_str("]")?;
        }
        if !self.parameters.is_empty() {
            f.write_str(", parameters: [")?;
            for (i, p) in self.parameters.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{{name: {}, value: {}}}", p.name, p.value)?;
            }
            f.write_str("]")?;
        }
        f.write_str(")")
    }
}

fn trimmed<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items.iter().map(|s| s.as_ref().trim().to_owned()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Json;

    fn json(v: serde_json::Value) -> Statement {
        Json::from_value(v).into()
    }

    #[test]
    fn fault_defaults_and_validation() {
        let f = Fault::build(None).expect("default type");
        assert_eq!(f.fault_type(), "service-specific");
        assert!(Fault::build(Some("* payment cancelled")).is_ok());
        assert_eq!(
            Fault::build(Some("runtime")),
            Err(FaultTypeError::NotServiceSpecific("runtime".into()))
        );
        assert_eq!(f.to_string(), "Fault(type: service-specific)");
    }

    #[test]
    fn platform_fault_validation() {
        let f = PlatformFault::build("origin").expect("platform type");
        assert_eq!(f.fault_type(), "origin");
        assert_eq!(
            PlatformFault::build("* mine"),
            Err(FaultTypeError::NotPlatform("* mine".into()))
        );
        assert_eq!(
            PlatformFault::build("bogus"),
            Err(FaultTypeError::NotPlatform("bogus".into()))
        );
        assert!(f.matches(&["service"]));
    }

    #[test]
    fn fault_matching_is_categorical() {
        let f = Fault::build(Some("* foo")).expect("valid");
        assert!(f.matches(&["service-specific"]));
        assert!(!f.matches(&["user-agent"]));
        assert!(f.matches::<&str>(&[]));
    }

    #[test]
    fn call_normalizes_object() {
        let call = Call::build::<&str>(&[], Some("home/"));
        assert_eq!(call.object(), &["@".to_owned()]);
        assert_eq!(call.href(), Some("home/"));

        let call = Call::build(&[" @ ", " cart"], None);
        assert_eq!(call.object(), &["@".to_owned(), "cart".to_owned()]);
    }

    #[test]
    fn call_parameters_and_display() {
        let call = Call::build(&["@", "cart"], Some("https://cart.example/view/"))
            .with_parameter("item", json(serde_json::json!({"id": 1})))
            .with_object_parameter("owner", &["@"]);
        assert_eq!(call.parameter("item"), Some(&json(serde_json::json!({"id": 1}))));
        assert_eq!(call.parameter("missing"), None);
        assert_eq!(call.object_parameter("owner"), Some(&["@".to_owned()][..]));
        assert_eq!(
            call.to_string(),
            "Call(object: [@, cart], href: https://cart.example/view/, \
             objectParameters: [{name: owner, object: [\"@\"]}], \
             parameters: [{name: item, value: Json({\"id\":1})}])"
        );
    }

    #[test]
    fn data_requires_a_path() {
        assert_eq!(
            Data::build::<&str>(&[], None),
            Err(ValidationError::Empty { what: "data path" })
        );
        let d = Data::build(&[" a ", "b"], None).expect("valid");
        assert_eq!(d.path(), &["a".to_owned(), "b".to_owned()]);
        assert_eq!(d.statement(), None);
        assert_eq!(d.to_string(), "Data(path: [a, b], statement: null)");
    }

    #[test]
    fn sequence_requires_statements() {
        assert_eq!(
            Sequence::build(vec![]),
            Err(ValidationError::Empty { what: "sequence" })
        );
        let s = Sequence::build(vec![Goto::build(None).into(), json(5.into())]).expect("valid");
        assert_eq!(s.to_string(), "Sequence(Goto(href: null), Json(5))");
    }

    #[test]
    fn catch_clause_validation() {
        assert!(CatchClause::build(&["* x", "service", "runtime"], vec![json(0.into())]).is_ok());
        assert_eq!(
            CatchClause::build(&["nope"], vec![json(0.into())]),
            Err(ValidationError::FaultType(FaultTypeError::InvalidCatchType(
                "nope".into()
            )))
        );
        assert_eq!(
            CatchClause::build(&["* x"], vec![]),
            Err(ValidationError::Empty {
                what: "catch clause"
            })
        );
    }

    #[test]
    fn try_selects_first_matching_clause() {
        let empty_cart =
            CatchClause::build(&["* empty cart"], vec![json(0.into())]).expect("valid");
        let anything = CatchClause::build::<&str>(&[], vec![json(1.into())]).expect("valid");
        let t = Try::build(
            Call::build::<&str>(&[], Some("cart/")),
            vec![empty_cart.clone()],
        )
        .expect("valid");
        assert_eq!(t.select("* empty cart"), Some(&empty_cart));
        assert_eq!(t.select("* other"), None);

        let t = Try::build(Goto::build(None), vec![empty_cart.clone(), anything.clone()])
            .expect("valid");
        assert_eq!(t.select("* empty cart"), Some(&empty_cart));
        assert_eq!(t.select("runtime"), Some(&anything));

        assert_eq!(
            Try::build(Goto::build(None), vec![]),
            Err(ValidationError::Empty {
                what: "try catch clauses"
            })
        );
        assert_eq!(
            t.to_string(),
            "Try(Goto(href: null), {catch: \"* empty cart\", do: [Json(0)]}, {catch: \"\", do: [Json(1)]})"
        );
    }
}
