//! Generic XML node tree.

use indexmap::IndexMap;

/// The name of the attribute controlling whitespace significance.
pub const XML_SPACE: &str = "xml:space";

/// A parsed XML document: prolog, exactly one root element, trailing misc.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Comments and processing instructions before the root element.
    pub prolog: Vec<Node>,
    /// The document element.
    pub root: Element,
    /// Comments and processing instructions after the root element.
    pub epilog: Vec<Node>,
}

impl Document {
    /// The document element.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Consumes the document, keeping only its root element.
    #[must_use]
    pub fn into_root(self) -> Element {
        self.root
    }
}

/// A node in element content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A nested element.
    Element(Element),
    /// Character data with references already decoded.
    Text(String),
    /// A CDATA section, kept distinct only when the parser is asked to.
    CData(String),
    /// A comment, kept only when the parser is asked to.
    Comment(String),
    /// A processing instruction.
    ProcessingInstruction(ProcessingInstruction),
}

impl Node {
    /// The element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    /// The character data carried by text and CDATA nodes.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(t) | Node::CData(t) => Some(t),
            _ => None,
        }
    }
}

/// `<?name content?>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingInstruction {
    /// The PI target.
    pub name: String,
    /// Everything between the target and `?>`, possibly empty.
    pub content: String,
}

/// Value of an `xml:space` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Space {
    /// `xml:space="default"`
    Default,
    /// `xml:space="preserve"`
    Preserve,
}

/// An element with its attributes in document (or sorted) order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Qualified name as written, e.g. `q:call`.
    pub name: String,
    /// Attributes keyed by qualified name.
    pub attributes: IndexMap<String, String>,
    /// Content nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// An element with no attributes and no content.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Builder-style child appender.
    #[must_use]
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    /// Builder-style text appender.
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::Text(text.into()))
    }

    /// Looks up an attribute by qualified name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// True when the element has no content at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Direct child elements, skipping every other node kind.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Concatenated text and CDATA of the direct children.
    #[must_use]
    pub fn text(&self) -> String {
        self.children.iter().filter_map(Node::as_text).collect()
    }

    /// The element's own `xml:space` setting, if it declares one.
    #[must_use]
    pub fn space(&self) -> Option<Space> {
        match self.attribute(XML_SPACE)? {
            "preserve" => Some(Space::Preserve),
            "default" => Some(Space::Default),
            _ => None,
        }
    }

    /// Whether whitespace is significant inside this element, given the
    /// setting inherited from its parent.
    #[must_use]
    pub fn preserves_whitespace(&self, inherited: bool) -> bool {
        match self.space() {
            Some(Space::Preserve) => true,
            Some(Space::Default) => false,
            None => inherited,
        }
    }
}
