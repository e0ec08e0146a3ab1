//! Recursive-descent XML 1.0 parser.
//!
//! A single left-to-right pass over the input: prolog, exactly one root
//! element, trailing misc. Lookahead is bounded to the current token.
//! DOCTYPE declarations are skipped without interpreting the internal
//! subset, so only the predefined entities are known unless a resolver
//! is supplied.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::SyntaxError;
use crate::node::{Document, Element, Node, ProcessingInstruction, XML_SPACE};
use crate::scanner::Scanner;
use crate::syntax;

type Result<T> = std::result::Result<T, SyntaxError>;

/// Resolves a reference to an entity other than the five predefined ones.
///
/// Receives the whole reference (`&name;`) and returns its replacement
/// text, or `None` to fall back to the default handling.
pub type EntityResolver = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

/// Element nesting accepted by [`ParserOptions::default`].
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Parser configuration. The default is a strict parser that folds CDATA
/// into text, drops comments, rejects undefined entities and accepts at
/// most [`DEFAULT_MAX_DEPTH`] levels of element nesting.
pub struct ParserOptions {
    /// Keep CDATA sections as [`Node::CData`] instead of merging them into text.
    pub preserve_cdata: bool,
    /// Keep comments as [`Node::Comment`] (trimmed).
    pub preserve_comments: bool,
    /// Reorder each element's attributes by name.
    pub sort_attributes: bool,
    /// Leave undefined entity references in the text verbatim.
    pub ignore_undefined_entities: bool,
    /// Drop whitespace-only text nodes unless `xml:space="preserve"` is in effect.
    pub drop_blank_text: bool,
    /// Fallback for undefined entity references.
    pub resolve_undefined_entity: Option<EntityResolver>,
    /// Deepest element nesting accepted; the root is at depth 1.
    pub max_depth: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            preserve_cdata: false,
            preserve_comments: false,
            sort_attributes: false,
            ignore_undefined_entities: false,
            drop_blank_text: false,
            resolve_undefined_entity: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl fmt::Debug for ParserOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserOptions")
            .field("preserve_cdata", &self.preserve_cdata)
            .field("preserve_comments", &self.preserve_comments)
            .field("sort_attributes", &self.sort_attributes)
            .field("ignore_undefined_entities", &self.ignore_undefined_entities)
            .field("drop_blank_text", &self.drop_blank_text)
            .field(
                "resolve_undefined_entity",
                &self.resolve_undefined_entity.as_ref().map(|_| ".."),
            )
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Parses `text` with the default options.
///
/// # Errors
///
/// Returns a [`SyntaxError`] locating the first well-formedness violation.
pub fn parse(text: &str) -> Result<Document> {
    parse_with(text, &ParserOptions::default())
}

/// Parses `text` with explicit options.
///
/// # Errors
///
/// Returns a [`SyntaxError`] locating the first well-formedness violation.
pub fn parse_with(text: &str, options: &ParserOptions) -> Result<Document> {
    debug!(bytes = text.len(), "parsing XML document");
    let input = normalize(text);
    let document = Parser {
        scanner: Scanner::new(&input),
        options,
    }
    .document()?;
    debug!(root = %document.root.name, "parsed XML document");
    Ok(document)
}

impl FromStr for Document {
    type Err = SyntaxError;

    fn from_str(s: &str) -> Result<Self> {
        parse(s)
    }
}

/// Strips a leading byte order mark and folds CRLF and CR into LF.
fn normalize(text: &str) -> Cow<'_, str> {
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(text);
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}

struct Parser<'a, 'o> {
    scanner: Scanner<'a>,
    options: &'o ParserOptions,
}

impl<'a> Parser<'a, '_> {
    fn error<T>(&self, message: impl Into<String>) -> Result<T> {
        self.error_at(self.scanner.pos(), message)
    }

    fn error_at<T>(&self, offset: usize, message: impl Into<String>) -> Result<T> {
        Err(SyntaxError::at(self.scanner.input(), offset, message))
    }

    fn document(mut self) -> Result<Document> {
        self.xml_declaration()?;
        let mut prolog = Vec::new();
        while self.misc(&mut prolog)? {}
        if self.doctype()? {
            while self.misc(&mut prolog)? {}
        }
        let Some(root) = self.element(false, 1)? else {
            return self.error("Root element is missing or invalid");
        };
        let mut epilog = Vec::new();
        while self.misc(&mut epilog)? {}
        if !self.scanner.is_end() {
            return self.error("Extra content at the end of the document");
        }
        Ok(Document {
            prolog,
            root,
            epilog,
        })
    }

    fn misc(&mut self, out: &mut Vec<Node>) -> Result<bool> {
        Ok(self.comment(out)? || self.processing_instruction(out)? || self.whitespace())
    }

    fn whitespace(&mut self) -> bool {
        !self.scanner.consume_while(syntax::is_whitespace).is_empty()
    }

    fn name(&mut self) -> &'a str {
        match self.scanner.peek() {
            Some(c) if syntax::is_name_start_char(c) => {
                self.scanner.consume_while(syntax::is_name_char)
            }
            _ => "",
        }
    }

    fn equal(&mut self) -> bool {
        self.whitespace();
        if self.scanner.consume_str("=") {
            self.whitespace();
            true
        } else {
            false
        }
    }

    fn validate_chars(&self, text: &str, start: usize) -> Result<()> {
        match text.char_indices().find(|&(_, c)| !syntax::is_xml_char(c)) {
            Some((i, _)) => self.error_at(start + i, "Invalid character"),
            None => Ok(()),
        }
    }

    fn xml_declaration(&mut self) -> Result<bool> {
        let Some(after) = self.scanner.rest().strip_prefix("<?xml") else {
            return Ok(false);
        };
        if after.chars().next().is_some_and(syntax::is_name_char) {
            // `<?xml-stylesheet ...?>` and friends are ordinary PIs.
            return Ok(false);
        }
        self.scanner.consume_str("<?xml");
        if !self.whitespace() {
            return self.error("Invalid XML declaration");
        }

        if !(self.scanner.consume_str("version") && self.equal()) {
            return self.error("XML version is missing or invalid");
        }
        let Some(version) = self.system_literal()? else {
            return self.error("XML version is missing or invalid");
        };
        let valid_version = version
            .strip_prefix("1.")
            .is_some_and(|minor| !minor.is_empty() && minor.bytes().all(|b| b.is_ascii_digit()));
        if !valid_version {
            return self.error("Invalid character in version number");
        }

        if self.whitespace() {
            if self.scanner.consume_str("encoding") {
                if !self.equal() || self.system_literal()?.is_none() {
                    return self.error("Invalid encoding declaration");
                }
                self.whitespace();
            }
            if self.scanner.consume_str("standalone") {
                if !self.equal() {
                    return self.error("Invalid standalone declaration");
                }
                match self.system_literal()? {
                    Some("yes" | "no") => {}
                    _ => {
                        return self
                            .error("Only \"yes\" and \"no\" are permitted as values of `standalone`")
                    }
                }
                self.whitespace();
            }
        }

        if !self.scanner.consume_str("?>") {
            return self.error("Invalid or unclosed XML declaration");
        }
        Ok(true)
    }

    fn system_literal(&mut self) -> Result<Option<&'a str>> {
        let quote = match self.scanner.peek() {
            Some('"') => "\"",
            Some('\'') => "'",
            _ => return Ok(None),
        };
        self.scanner.advance();
        let start = self.scanner.pos();
        let Some(value) = self.scanner.consume_until(quote) else {
            return self.error("Missing end quote");
        };
        self.validate_chars(value, start)?;
        self.scanner.consume_str(quote);
        Ok(Some(value))
    }

    fn doctype(&mut self) -> Result<bool> {
        if !self.scanner.consume_str("<!DOCTYPE") {
            return Ok(false);
        }
        if !self.whitespace() {
            return self.error("Invalid doctype declaration");
        }
        self.scanner.consume_while(|c| c != '[' && c != '>');
        if self.scanner.consume_str("[") {
            loop {
                if self.scanner.consume_until("]").is_none() {
                    return self.error("Unclosed doctype declaration");
                }
                self.scanner.consume_str("]");
                self.whitespace();
                if self.scanner.starts_with(">") {
                    break;
                }
            }
        }
        if !self.scanner.consume_str(">") {
            return self.error("Unclosed doctype declaration");
        }
        Ok(true)
    }

    fn comment(&mut self, out: &mut Vec<Node>) -> Result<bool> {
        if !self.scanner.consume_str("<!--") {
            return Ok(false);
        }
        let start = self.scanner.pos();
        let Some(content) = self.scanner.consume_until("--") else {
            return self.error("Unclosed comment");
        };
        self.validate_chars(content, start)?;
        if !self.scanner.consume_str("-->") {
            return self.error("The string `--` isn't allowed inside a comment");
        }
        if self.options.preserve_comments {
            out.push(Node::Comment(content.trim().to_owned()));
        }
        Ok(true)
    }

    fn processing_instruction(&mut self, out: &mut Vec<Node>) -> Result<bool> {
        let mark = self.scanner.pos();
        if !self.scanner.consume_str("<?") {
            return Ok(false);
        }
        let name = self.name();
        if name.is_empty() {
            return self.error("Invalid processing instruction");
        }
        if name.eq_ignore_ascii_case("xml") {
            return self.error_at(mark, "XML declaration isn't allowed here");
        }
        let content = if self.whitespace() {
            let start = self.scanner.pos();
            let Some(content) = self.scanner.consume_until("?>") else {
                return self.error("Unterminated processing instruction");
            };
            self.validate_chars(content, start)?;
            content
        } else if self.scanner.starts_with("?>") {
            ""
        } else {
            return self.error("Whitespace is required after a processing instruction name");
        };
        self.scanner.consume_str("?>");
        out.push(Node::ProcessingInstruction(ProcessingInstruction {
            name: name.to_owned(),
            content: content.to_owned(),
        }));
        Ok(true)
    }

    fn element(&mut self, inherited_preserve: bool, depth: usize) -> Result<Option<Element>> {
        let mark = self.scanner.pos();
        if !self.scanner.consume_str("<") {
            return Ok(None);
        }
        let name = self.name();
        if name.is_empty() {
            self.scanner.reset(mark);
            return Ok(None);
        }
        if depth > self.options.max_depth {
            return self.error_at(
                mark,
                format!(
                    "Excessive depth in document: {} levels of nesting allowed",
                    self.options.max_depth
                ),
            );
        }

        let mut element = Element::new(name);
        while self.whitespace() {
            let attr_start = self.scanner.pos();
            let attr_name = self.name();
            if attr_name.is_empty() {
                continue;
            }
            if !self.equal() {
                return self.error("Attribute value expected");
            }
            let Some(value) = self.attribute_value()? else {
                return self.error("Attribute value expected");
            };
            if element.attributes.contains_key(attr_name) {
                return self.error_at(attr_start, format!("Duplicate attribute: {attr_name}"));
            }
            if attr_name == XML_SPACE && value != "default" && value != "preserve" {
                return self.error_at(
                    attr_start,
                    "Value of the `xml:space` attribute must be \"default\" or \"preserve\"",
                );
            }
            element.attributes.insert(attr_name.to_owned(), value);
        }
        if self.options.sort_attributes {
            element.attributes.sort_keys();
        }

        if self.scanner.consume_str("/>") {
            return Ok(Some(element));
        }
        if !self.scanner.consume_str(">") {
            return self.error(format!("Unclosed start tag for element `{name}`"));
        }

        let preserve = element.preserves_whitespace(inherited_preserve);
        let children = &mut element.children;
        loop {
            self.char_data(children)?;
            if let Some(child) = self.element(preserve, depth + 1)? {
                children.push(Node::Element(child));
            } else if let Some(text) = self.reference()? {
                push_text(children, &text);
            } else if !(self.cdata(children)?
                || self.processing_instruction(children)?
                || self.comment(children)?)
            {
                break;
            }
        }

        let end_mark = self.scanner.pos();
        if !(self.scanner.consume_str("</") && self.name() == name) {
            self.scanner.reset(end_mark);
            return self.error(format!("Missing end tag for element {name}"));
        }
        self.whitespace();
        if !self.scanner.consume_str(">") {
            return self.error(format!("Unclosed end tag for element {name}"));
        }

        if self.options.drop_blank_text && !preserve {
            children.retain(|n| !matches!(n, Node::Text(t) if syntax::is_blank(t)));
        }
        Ok(Some(element))
    }

    fn attribute_value(&mut self) -> Result<Option<String>> {
        let quote = match self.scanner.peek() {
            Some(q @ ('"' | '\'')) => q,
            _ => return Ok(None),
        };
        self.scanner.advance();
        let mut value = String::new();
        loop {
            let start = self.scanner.pos();
            let chars = self
                .scanner
                .consume_while(move |c| c != quote && c != '&' && c != '<');
            self.validate_chars(chars, start)?;
            value.extend(
                chars
                    .chars()
                    .map(|c| if matches!(c, '\t' | '\r' | '\n') { ' ' } else { c }),
            );
            match self.scanner.peek() {
                Some(c) if c == quote => {
                    self.scanner.advance();
                    return Ok(Some(value));
                }
                Some('&') => {
                    if let Some(text) = self.reference()? {
                        value.push_str(&text);
                    }
                }
                Some('<') => {
                    return self.error("Unescaped `<` is not allowed in an attribute value")
                }
                _ => return self.error("Unclosed attribute"),
            }
        }
    }

    fn char_data(&mut self, children: &mut Vec<Node>) -> Result<bool> {
        let start = self.scanner.pos();
        let text = self
            .scanner
            .consume_until_fn(|rest| rest.starts_with(['<', '&']) || rest.starts_with("]]>"));
        if text.is_empty() {
            if self.scanner.starts_with("]]>") {
                return self.error(
                    "Element content may not contain the CDATA section close delimiter `]]>`",
                );
            }
            return Ok(false);
        }
        self.validate_chars(text, start)?;
        if self.scanner.starts_with("]]>") {
            return self
                .error("Element content may not contain the CDATA section close delimiter `]]>`");
        }
        push_text(children, text);
        Ok(true)
    }

    fn cdata(&mut self, children: &mut Vec<Node>) -> Result<bool> {
        if !self.scanner.consume_str("<![CDATA[") {
            return Ok(false);
        }
        let start = self.scanner.pos();
        let Some(text) = self.scanner.consume_until("]]>") else {
            return self.error("Unclosed CDATA section");
        };
        self.validate_chars(text, start)?;
        self.scanner.consume_str("]]>");
        if self.options.preserve_cdata {
            children.push(Node::CData(text.to_owned()));
        } else {
            push_text(children, text);
        }
        Ok(true)
    }

    /// Decodes a character or entity reference at the cursor.
    fn reference(&mut self) -> Result<Option<String>> {
        let start = self.scanner.pos();
        if !self.scanner.consume_str("&") {
            return Ok(None);
        }
        let name = self.scanner.consume_while(syntax::is_reference_char);
        if self.scanner.advance() != Some(';') {
            return self.error("Unterminated reference (a reference must end with `;`)");
        }

        if let Some(number) = name.strip_prefix('#') {
            let code = match number.strip_prefix('x') {
                Some(hex) => u32::from_str_radix(hex, 16),
                None => number.parse::<u32>(),
            };
            let Some(c) = code.ok().and_then(char::from_u32) else {
                return self.error("Invalid character reference");
            };
            if !syntax::is_xml_char(c) {
                return self.error("Character reference resolves to an invalid character");
            }
            return Ok(Some(c.to_string()));
        }

        if let Some(text) = syntax::predefined_entity(name) {
            return Ok(Some(text.to_owned()));
        }
        let reference = format!("&{name};");
        if let Some(resolved) = self
            .options
            .resolve_undefined_entity
            .as_ref()
            .and_then(|resolve| resolve(&reference))
        {
            return Ok(Some(resolved));
        }
        if self.options.ignore_undefined_entities {
            return Ok(Some(reference));
        }
        self.error_at(start, format!("Named entity isn't defined: {reference}"))
    }
}

fn push_text(children: &mut Vec<Node>, text: &str) {
    if let Some(Node::Text(last)) = children.last_mut() {
        last.push_str(text);
    } else {
        children.push(Node::Text(text.to_owned()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn root(text: &str) -> Element {
        match parse(text) {
            Ok(doc) => doc.into_root(),
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    fn fails(text: &str) -> SyntaxError {
        match parse(text) {
            Ok(doc) => panic!("accepted malformed input: {doc:?}"),
            Err(e) => e,
        }
    }

    #[test]
    fn nested_elements_and_attributes() {
        let e = root(r#"<a x="1" y='2'><b/>text<c z="&lt;&#65;&#x42;"></c></a>"#);
        assert_eq!(e.name, "a");
        assert_eq!(e.attribute("x"), Some("1"));
        assert_eq!(e.attribute("y"), Some("2"));
        assert_eq!(e.children.len(), 3);
        let c = e.child_elements().nth(1).map(|c| c.attribute("z"));
        assert_eq!(c, Some(Some("<AB")));
        assert_eq!(e.text(), "text");
    }

    #[test]
    fn mismatched_end_tag_is_rejected_at_its_position() {
        let err = fails("<a><b></a>");
        assert_eq!(err.message, "Missing end tag for element b");
        assert_eq!(err.line, 1);
        assert_eq!(err.column, 7);
    }

    #[test]
    fn unclosed_root() {
        assert_eq!(fails("<a>").message, "Missing end tag for element a");
        assert_eq!(fails("<a").message, "Unclosed start tag for element `a`");
    }

    #[test]
    fn duplicate_attribute() {
        assert_eq!(fails(r#"<a x="1" x="2"/>"#).message, "Duplicate attribute: x");
    }

    #[test]
    fn attribute_value_rules() {
        assert!(fails(r#"<a x="<"/>"#).message.starts_with("Unescaped `<`"));
        assert!(fails(r#"<a x="&"/>"#).message.starts_with("Unterminated reference"));
        assert_eq!(fails(r#"<a x="1/>"#).message, "Unclosed attribute");
        assert_eq!(fails(r#"<a x/>"#).message, "Attribute value expected");
        assert_eq!(root("<a x=\"1\t2\n3\"/>").attribute("x"), Some("1 2 3"));
    }

    #[test]
    fn xml_space_values() {
        assert!(fails(r#"<a xml:space="keep"/>"#).message.contains("xml:space"));
        assert!(parse(r#"<a xml:space="preserve"/>"#).is_ok());
    }

    #[test]
    fn cdata_close_delimiter_in_content() {
        assert!(fails("<a>x]]>y</a>").message.contains("`]]>`"));
        assert!(fails("<a>]]></a>").message.contains("`]]>`"));
        assert_eq!(root("<a>x]y]</a>").text(), "x]y]");
    }

    #[test]
    fn undefined_entities() {
        let err = fails("<a>&nbsp;</a>");
        assert_eq!(err.message, "Named entity isn't defined: &nbsp;");
        assert_eq!(err.column, 4);

        let options = ParserOptions {
            ignore_undefined_entities: true,
            ..ParserOptions::default()
        };
        let doc = parse_with("<a>&nbsp;</a>", &options).map(Document::into_root);
        assert_eq!(doc.map(|e| e.text()), Ok("&nbsp;".to_owned()));

        let options = ParserOptions {
            resolve_undefined_entity: Some(Box::new(|r| {
                (r == "&nbsp;").then(|| "\u{A0}".to_owned())
            })),
            ..ParserOptions::default()
        };
        let doc = parse_with("<a>&nbsp;</a>", &options).map(Document::into_root);
        assert_eq!(doc.map(|e| e.text()), Ok("\u{A0}".to_owned()));
    }

    #[test]
    fn character_references_are_validated() {
        assert_eq!(
            fails("<a>&#0;</a>").message,
            "Character reference resolves to an invalid character"
        );
        assert_eq!(fails("<a>&#xZZ;</a>").message, "Invalid character reference");
        assert_eq!(fails("<a>&#xD800;</a>").message, "Invalid character reference");
        assert_eq!(root("<a>&#x1F600;</a>").text(), "\u{1F600}");
    }

    #[test]
    fn illegal_characters() {
        let err = fails("<a>ok\u{1}</a>");
        assert_eq!(err.message, "Invalid character");
        assert_eq!(err.column, 6);
    }

    #[test]
    fn cdata_and_comments() {
        let e = root("<a>x<![CDATA[<&>]]>y<!-- note --></a>");
        assert_eq!(e.children, vec![Node::Text("x<&>y".into())]);

        let options = ParserOptions {
            preserve_cdata: true,
            preserve_comments: true,
            ..ParserOptions::default()
        };
        let e = parse_with("<a>x<![CDATA[<&>]]><!-- note --></a>", &options)
            .map(Document::into_root);
        assert_eq!(
            e.map(|e| e.children),
            Ok(vec![
                Node::Text("x".into()),
                Node::CData("<&>".into()),
                Node::Comment("note".into()),
            ])
        );

        assert!(fails("<a><!-- a -- b --></a>").message.contains("`--`"));
        assert_eq!(fails("<a><!-- open</a>").message, "Unclosed comment");
        assert_eq!(fails("<a><![CDATA[x</a>").message, "Unclosed CDATA section");
    }

    #[test]
    fn processing_instructions() {
        let e = root("<a><?target some data?><?bare?></a>");
        let pis: Vec<_> = e
            .children
            .iter()
            .filter_map(|n| match n {
                Node::ProcessingInstruction(pi) => Some((pi.name.as_str(), pi.content.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(pis, vec![("target", "some data"), ("bare", "")]);
        assert_eq!(
            fails("<a><?xml version=\"1.0\"?></a>").message,
            "XML declaration isn't allowed here"
        );
        assert!(fails("<a><?t!?></a>").message.starts_with("Whitespace is required"));
    }

    #[test]
    fn prolog() {
        let doc = parse(
            "\u{FEFF}<?xml version=\"1.0\" encoding=\"UTF-8\" standalone='yes'?>\r\n\
             <!DOCTYPE a [<!ENTITY x \"y\">]>\r\n<?xml-stylesheet href=\"s\"?><a/>\n<!-- end -->",
        );
        let doc = match doc {
            Ok(doc) => doc,
            Err(e) => panic!("{e}"),
        };
        assert_eq!(doc.root().name, "a");
        assert_eq!(doc.prolog.len(), 1);

        assert_eq!(
            fails("<?xml version=\"2.0\"?><a/>").message,
            "Invalid character in version number"
        );
        assert!(fails("<?xml version=\"1.0\" standalone=\"maybe\"?><a/>")
            .message
            .starts_with("Only \"yes\" and \"no\""));
        assert_eq!(fails("<?xml?><a/>").message, "Invalid XML declaration");
    }

    #[test]
    fn document_structure() {
        assert_eq!(fails("").message, "Root element is missing or invalid");
        assert_eq!(fails("text").message, "Root element is missing or invalid");
        assert_eq!(
            fails("<a/><b/>").message,
            "Extra content at the end of the document"
        );
    }

    #[test]
    fn line_endings_are_normalized() {
        assert_eq!(root("<a>1\r\n2\r3</a>").text(), "1\n2\n3");
    }

    #[test]
    fn sorted_attributes() {
        let options = ParserOptions {
            sort_attributes: true,
            ..ParserOptions::default()
        };
        let e = parse_with(r#"<a c="3" a="1" b="2"/>"#, &options).map(Document::into_root);
        let names = e.map(|e| e.attributes.keys().cloned().collect::<Vec<_>>());
        assert_eq!(names, Ok(vec!["a".into(), "b".into(), "c".into()]));
    }

    #[test]
    fn blank_text_follows_xml_space() {
        let options = ParserOptions {
            drop_blank_text: true,
            ..ParserOptions::default()
        };
        let e = parse_with(
            "<a>\n  <b> </b>\n  <c xml:space=\"preserve\"> <d> </d></c></a>",
            &options,
        )
        .map(Document::into_root);
        let e = match e {
            Ok(e) => e,
            Err(err) => panic!("{err}"),
        };
        assert_eq!(e.children.len(), 2);
        let c = e.child_elements().nth(1).map(|c| c.children.len());
        assert_eq!(c, Some(2));
    }

    #[test]
    fn nesting_depth_is_bounded() {
        let options = ParserOptions {
            max_depth: 2,
            ..ParserOptions::default()
        };
        assert!(parse_with("<a><b/></a>", &options).is_ok());
        let err = parse_with("<a><b><c/></b></a>", &options).map(|_| ());
        let err = err.expect_err("too deep");
        assert_eq!(
            err.message,
            "Excessive depth in document: 2 levels of nesting allowed"
        );
        assert_eq!((err.line, err.column), (1, 7));

        let deep = "<a>".repeat(100_000);
        let err = fails(&deep);
        assert!(err.message.starts_with("Excessive depth"), "{err}");
        assert_eq!(err.column, 3 * DEFAULT_MAX_DEPTH + 1);

        let ok = format!(
            "{}{}",
            "<a>".repeat(DEFAULT_MAX_DEPTH),
            "</a>".repeat(DEFAULT_MAX_DEPTH)
        );
        assert!(parse(&ok).is_ok());
    }

    #[test]
    fn from_str() {
        let doc: std::result::Result<Document, _> = "<a/>".parse();
        assert!(doc.is_ok());
    }
}
