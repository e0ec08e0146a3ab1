//! The script model: scripts, instructions and data values.
//!
//! Every node is built by a builder that validates its operands and either
//! returns a complete value or fails; there are no setters. Ownership is
//! strictly parent to child.

mod data;
mod instruction;

use std::fmt;
use std::ops::Deref;

pub use data::{DataValue, Json, DATA_NAMESPACE};
pub use instruction::{
    Call, CatchClause, Data, Fault, Goto, Instruction, ObjectParameter, Parameter, PlatformFault,
    Return, Sequence, Try, CURRENT_OBJECT, INSTRUCTION_NAMESPACE,
};

use crate::error::ValidationError;
use crate::rdf::SemanticData;

/// An ordered list holding at least one element.
#[derive(Debug, Clone, PartialEq)]
pub struct NonEmpty<T>(Vec<T>);

impl<T> NonEmpty<T> {
    /// Wraps `items`, failing when it is empty. `what` names the list in
    /// the error.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Empty`] when `items` is empty.
    pub fn new(items: Vec<T>, what: &'static str) -> Result<Self, ValidationError> {
        if items.is_empty() {
            Err(ValidationError::Empty { what })
        } else {
            Ok(Self(items))
        }
    }

    /// Returns the elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.0
    }

    /// Consumes the list, returning its elements.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T> Deref for NonEmpty<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<'a, T> IntoIterator for &'a NonEmpty<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Either an instruction or a data value, wherever either is accepted.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// An executable step.
    Instruction(Box<Instruction>),
    /// A payload.
    Data(DataValue),
}

impl Statement {
    /// The instruction, if this statement is one.
    #[must_use]
    pub fn as_instruction(&self) -> Option<&Instruction> {
        match self {
            Statement::Instruction(i) => Some(i),
            Statement::Data(_) => None,
        }
    }

    /// The data value, if this statement is one.
    #[must_use]
    pub fn as_data(&self) -> Option<&DataValue> {
        match self {
            Statement::Data(d) => Some(d),
            Statement::Instruction(_) => None,
        }
    }
}

impl From<Instruction> for Statement {
    fn from(i: Instruction) -> Self {
        Statement::Instruction(Box::new(i))
    }
}

impl From<DataValue> for Statement {
    fn from(d: DataValue) -> Self {
        Statement::Data(d)
    }
}

macro_rules! statement_from {
    ($($variant:ident => $via:ident),* $(,)?) => {
        $(
            impl From<$variant> for Statement {
                fn from(v: $variant) -> Self {
                    Statement::from($via::from(v))
                }
            }
        )*
    };
}

statement_from! {
    Fault => Instruction,
    PlatformFault => Instruction,
    Return => Instruction,
    Sequence => Instruction,
    Data => Instruction,
    Try => Instruction,
    Goto => Instruction,
    Call => Instruction,
    Json => DataValue,
    SemanticData => DataValue,
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Instruction(i) => i.fmt(f),
            Statement::Data(d) => d.fmt(f),
        }
    }
}

/// Root of a script: exactly one instruction.
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    instruction: Instruction,
}

impl Script {
    /// Wraps the instruction to execute.
    pub fn build(instruction: impl Into<Instruction>) -> Self {
        Self {
            instruction: instruction.into(),
        }
    }

    /// The root instruction.
    #[must_use]
    pub fn instruction(&self) -> &Instruction {
        &self.instruction
    }

    /// Consumes the script, returning its root instruction.
    #[must_use]
    pub fn into_instruction(self) -> Instruction {
        self.instruction
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.instruction.fmt(f)
    }
}

/// Writes `items` separated by `, `.
pub(crate) fn join<T: fmt::Display>(f: &mut fmt::Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        item.fmt(f)?;
    }
    Ok(())
}
