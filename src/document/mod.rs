//! Mutable SVG document tree.
//!
//! quick-xml only hands out a stream of events. The rewriters need to look
//! at the whole document at once (a reference may appear before or after the
//! element it points at), so the event stream is folded into a small owned
//! tree and written back afterwards.
//!
//! # Structure
//!
//! ```text
//! Document
//! ├── prolog / trailing   Node::Markup (declaration, comments, whitespace)
//! └── root                Element
//!     ├── attrs           [(name, value)] in source order
//!     └── children        Node::Element | Node::Markup
//! ```
//!
//! Everything that is not an element (text, CDATA, comments, entity refs,
//! processing instructions) is kept as the original quick-xml event and
//! written back untouched.

mod error;
mod parse;
mod serialize;

pub use error::DocumentError;

use quick_xml::events::Event;

/// A single attribute, value already unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

impl Attr {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An element node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<Attr>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Get attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set attribute value, keeping its position if it already exists.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|a| a.name == name) {
            Some(attr) => attr.value = value,
            None => self.attrs.push(Attr::new(name, value)),
        }
    }

    /// Child elements (markup nodes skipped).
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Visit this element and all descendants in pre-order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        f(self);
        for child in self.child_elements() {
            child.walk(f);
        }
    }

    /// Mutable pre-order visit.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        f(self);
        for child in &mut self.children {
            if let Node::Element(elem) = child {
                elem.walk_mut(f);
            }
        }
    }
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    /// Any non-element event, replayed verbatim on serialization.
    Markup(Event<'static>),
}

impl Node {
    #[inline]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(elem) => Some(elem),
            Self::Markup(_) => None,
        }
    }
}

/// A parsed SVG document.
///
/// Prolog and trailing markup (declaration, doctype, comments, whitespace)
/// are kept around the single root element.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub prolog: Vec<Node>,
    pub root: Element,
    pub trailing: Vec<Node>,
}

impl Document {
    /// Parse document text.
    pub fn parse(text: &str) -> Result<Self, DocumentError> {
        parse::parse_document(text)
    }

    /// Serialize back to text.
    pub fn to_xml(&self) -> Result<String, DocumentError> {
        serialize::write_document(self)
    }

    /// Visit every element in pre-order.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Element)) {
        self.root.walk(f);
    }

    /// Mutable pre-order visit of every element.
    pub fn walk_mut(&mut self, f: &mut impl FnMut(&mut Element)) {
        self.root.walk_mut(f);
    }
}
