//! XML 1.0 character classes.
//!
//! Productions follow the Fifth Edition of the XML 1.0 recommendation:
//! `Char`, `S`, `NameStartChar` and `NameChar`.

/// The replacement text of the five predefined entities.
#[must_use]
pub fn predefined_entity(name: &str) -> Option<&'static str> {
    match name {
        "amp" => Some("&"),
        "apos" => Some("'"),
        "gt" => Some(">"),
        "lt" => Some("<"),
        "quot" => Some("\""),
        _ => None,
    }
}

/// `Char`: any character legal in an XML 1.0 document.
#[must_use]
pub fn is_xml_char(c: char) -> bool {
    matches!(c as u32,
        0x9 | 0xA | 0xD
        | 0x20..=0xD7FF
        | 0xE000..=0xFFFD
        | 0x10000..=0x10_FFFF)
}

/// `S`: space, tab, line feed or carriage return.
#[must_use]
pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// `NameStartChar`.
#[must_use]
pub fn is_name_start_char(c: char) -> bool {
    matches!(c as u32,
        0x3A | 0x5F
        | 0x41..=0x5A
        | 0x61..=0x7A
        | 0xC0..=0xD6
        | 0xD8..=0xF6
        | 0xF8..=0x2FF
        | 0x370..=0x37D
        | 0x37F..=0x1FFF
        | 0x200C..=0x200D
        | 0x2070..=0x218F
        | 0x2C00..=0x2FEF
        | 0x3001..=0xD7FF
        | 0xF900..=0xFDCF
        | 0xFDF0..=0xFFFD
        | 0x10000..=0xE_FFFF)
}

/// `NameChar`.
#[must_use]
pub fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c as u32,
            0x2D | 0x2E
            | 0x30..=0x39
            | 0xB7
            | 0x300..=0x36F
            | 0x203F..=0x2040)
}

/// Characters allowed between `&` and `;` of a reference.
#[must_use]
pub fn is_reference_char(c: char) -> bool {
    c == '#' || is_name_char(c)
}

/// Returns true when `text` is a well-formed `Name`.
#[must_use]
pub fn is_name(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if is_name_start_char(first) => chars.all(is_name_char),
        _ => false,
    }
}

/// Returns true when `text` consists of `S` characters only.
#[must_use]
pub fn is_blank(text: &str) -> bool {
    text.chars().all(is_whitespace)
}
