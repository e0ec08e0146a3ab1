//! Minimal XML serializer.
//!
//! Output is not pretty-printed. Every element gets an explicit end tag,
//! attributes are double-quoted, and `< > & ' "` are escaped in both
//! attribute values and text. Whitespace the parser would normalize is
//! written as character references: tab, LF and CR in attribute values,
//! CR in text. CDATA nodes are written as escaped text.
//!
//! Characters outside the XML `Char` production have no escape, so a tree
//! holding one fails with [`WriteError::InvalidChar`] instead of producing
//! a document the parser rejects.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::error::WriteError;
use crate::node::{Element, Node};
use crate::syntax;

/// Writer configuration.
#[derive(Debug, Clone, Default)]
pub struct WriterOptions {
    /// Emit attributes ordered by name instead of insertion order.
    pub sort_attributes: bool,
}

/// Serializes an element and its subtree.
///
/// # Errors
///
/// Returns a [`WriteError`] when the tree holds text that XML cannot
/// represent.
pub fn write(element: &Element) -> Result<String, WriteError> {
    write_with(element, &WriterOptions::default())
}

/// Serializes an element and its subtree with explicit options.
///
/// # Errors
///
/// As [`write`].
pub fn write_with(element: &Element, options: &WriterOptions) -> Result<String, WriteError> {
    let mut out = String::new();
    write_element(&mut out, element, options)?;
    Ok(out)
}

/// Escapes text content: the five special characters, and CR, which the
/// parser would otherwise fold into LF.
#[must_use]
pub fn escape(text: &str) -> Cow<'_, str> {
    escape_with(text, |c| matches!(c, '\r'))
}

/// Escapes an attribute value: as [`escape`], plus tab and LF, which the
/// parser would otherwise normalize to spaces.
#[must_use]
pub fn escape_attribute(value: &str) -> Cow<'_, str> {
    escape_with(value, |c| matches!(c, '\t' | '\n' | '\r'))
}

fn escape_with(text: &str, as_reference: fn(char) -> bool) -> Cow<'_, str> {
    let special = |c: char| matches!(c, '<' | '>' | '&' | '\'' | '"') || as_reference(c);
    if !text.contains(special) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '\'' => out.push_str("&apos;"),
            '"' => out.push_str("&quot;"),
            c if as_reference(c) => {
                let _ = write!(out, "&#{};", u32::from(c));
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn check_chars(text: &str, context: impl FnOnce() -> String) -> Result<(), WriteError> {
    match text.chars().find(|&c| !syntax::is_xml_char(c)) {
        Some(character) => Err(WriteError::InvalidChar {
            character,
            context: context(),
        }),
        None => Ok(()),
    }
}

fn write_element(
    out: &mut String,
    element: &Element,
    options: &WriterOptions,
) -> Result<(), WriteError> {
    out.push('<');
    out.push_str(&element.name);

    let mut attributes: Vec<_> = element.attributes.iter().collect();
    if options.sort_attributes {
        attributes.sort_by(|a, b| a.0.cmp(b.0));
    }
    for (name, value) in attributes {
        check_chars(value, || format!("attribute `{name}` of <{}>", element.name))?;
        let _ = write!(out, " {name}=\"{}\"", escape_attribute(value));
    }
    out.push('>');

    for child in &element.children {
        match child {
            Node::Element(e) => write_element(out, e, options)?,
            Node::Text(t) | Node::CData(t) => {
                check_chars(t, || format!("text of <{}>", element.name))?;
                out.push_str(&escape(t));
            }
            Node::Comment(c) => {
                check_chars(c, || format!("comment in <{}>", element.name))?;
                if c.contains("--") || c.ends_with('-') {
                    return Err(WriteError::InvalidComment {
                        element: element.name.clone(),
                    });
                }
                let _ = write!(out, "<!--{c}-->");
            }
            Node::ProcessingInstruction(pi) => {
                check_chars(&pi.content, || {
                    format!("processing instruction in <{}>", element.name)
                })?;
                if !syntax::is_name(&pi.name)
                    || pi.name.eq_ignore_ascii_case("xml")
                    || pi.content.contains("?>")
                {
                    return Err(WriteError::InvalidProcessingInstruction {
                        target: pi.name.clone(),
                        element: element.name.clone(),
                    });
                }
                if pi.content.is_empty() {
                    let _ = write!(out, "<?{}?>", pi.name);
                } else {
                    let _ = write!(out, "<?{} {}?>", pi.name, pi.content);
                }
            }
        }
    }

    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
    Ok(())
}
