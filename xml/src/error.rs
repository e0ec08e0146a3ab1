//! Position-annotated syntax errors and writer errors.

use thiserror::Error;

const EXCERPT_WIDTH: usize = 50;

/// A well-formedness error, fatal to the parse that raised it.
///
/// The `Display` form is the message followed by the position, the
/// offending line (truncated to 50 chars around the error) and a caret:
///
/// ```text
/// Missing end tag for element b (line 1, column 7)
///   <a><b></a>
///         ^
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (line {line}, column {column})\n  {excerpt}\n{marker}^")]
pub struct SyntaxError {
    /// What went wrong.
    pub message: String,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number, counted in chars.
    pub column: usize,
    /// The offending line, or a slice of it when it is long.
    pub excerpt: String,
    /// Byte offset into the normalized input.
    pub offset: usize,
    marker: String,
}

impl SyntaxError {
    /// Builds an error for `offset` in `input`.
    pub(crate) fn at(input: &str, offset: usize, message: impl Into<String>) -> Self {
        let offset = offset.min(input.len());
        let before = &input[..offset];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let line = before.matches('\n').count() + 1;
        let column = before[line_start..].chars().count() + 1;
        let line_end = input[offset..]
            .find('\n')
            .map_or(input.len(), |i| offset + i);
        let full: Vec<char> = input[line_start..line_end].chars().collect();

        let (start, end) = if full.len() <= EXCERPT_WIDTH {
            (0, full.len())
        } else if column < 40 {
            (0, EXCERPT_WIDTH)
        } else {
            let start = column - 20;
            (start, (column + 30).min(full.len()))
        };
        let excerpt: String = full[start..end].iter().collect();
        let marker = " ".repeat(column - start + 1);

        Self {
            message: message.into(),
            line,
            column,
            excerpt,
            offset,
            marker,
        }
    }
}

/// A tree that cannot be written as well-formed XML.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WriteError {
    /// A character outside the XML 1.0 `Char` production, which no
    /// escape can carry.
    #[error("character U+{:04X} cannot appear in XML ({context})", u32::from(*character))]
    InvalidChar {
        /// The offending character.
        character: char,
        /// Where it was found, e.g. ``attribute `href` of <goto>``.
        context: String,
    },
    /// Comment text containing `--` or ending with `-`.
    #[error("comment in <{element}> cannot contain `--` or end with `-`")]
    InvalidComment {
        /// Name of the enclosing element.
        element: String,
    },
    /// Processing instruction content containing `?>`, or an invalid target.
    #[error("processing instruction `{target}` in <{element}> cannot be written")]
    InvalidProcessingInstruction {
        /// The instruction's target name.
        target: String,
        /// Name of the enclosing element.
        element: String,
    },
}
