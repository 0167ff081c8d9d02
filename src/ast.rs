//! Parsed document types
//!
//! A minimal element tree: names, attributes and children, each with byte
//! spans back into the source for diagnostics. Text content is dropped.

use miette::SourceSpan;

/// Byte range in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<pest::Span<'_>> for Span {
    fn from(span: pest::Span<'_>) -> Self {
        Span::new(span.start(), span.end())
    }
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.len()).into()
    }
}

/// A parsed document: its single root element
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// One markup element
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub name: String,
    /// Span of the element name in the opening tag
    pub name_span: Span,
    /// Span of the whole element, opening tag to closing tag
    pub span: Span,
    pub attributes: Vec<Attribute>,
    pub children: Vec<Element>,
}

impl Element {
    /// First attribute called `name`.
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// Value of the first attribute called `name`.
    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attr(name).map(|a| a.value.as_str())
    }
}

/// `name="value"`, with entity references already decoded
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    /// Span of the raw value between the quotes
    pub value_span: Span,
}
