//! [`Document`] tree -> text.
//!
//! Elements without children are written self-closed (`<rect/>`). Attribute
//! values are re-escaped (`&`, `<`, `>`, `"` only); markup nodes are replayed
//! as read.

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::borrow::Cow;
use std::io::Cursor;

use super::{Document, DocumentError, Element, Node};

type XmlWriter = Writer<Cursor<Vec<u8>>>;

pub(super) fn write_document(doc: &Document) -> Result<String, DocumentError> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));

    for node in &doc.prolog {
        write_node(&mut writer, node)?;
    }
    write_element(&mut writer, &doc.root)?;
    for node in &doc.trailing {
        write_node(&mut writer, node)?;
    }

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| DocumentError::Write(e.to_string()))
}

fn write_node(writer: &mut XmlWriter, node: &Node) -> Result<(), DocumentError> {
    match node {
        Node::Element(elem) => write_element(writer, elem),
        Node::Markup(event) => emit(writer, event.clone()),
    }
}

fn write_element(writer: &mut XmlWriter, elem: &Element) -> Result<(), DocumentError> {
    let mut start = BytesStart::new(elem.name.as_str());
    for attr in &elem.attrs {
        let value = escape_attr(&attr.value);
        start.push_attribute((attr.name.as_bytes(), value.as_bytes()));
    }

    if elem.children.is_empty() {
        return emit(writer, Event::Empty(start));
    }

    emit(writer, Event::Start(start))?;
    for child in &elem.children {
        write_node(writer, child)?;
    }
    emit(writer, Event::End(BytesEnd::new(elem.name.as_str())))
}

#[inline]
fn emit(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), DocumentError> {
    writer
        .write_event(event)
        .map_err(|e| DocumentError::Write(e.to_string()))
}

/// Escape an attribute value for a double-quoted attribute.
///
/// Apostrophes are left alone so values like `font-family="'Inter'"` come
/// back unchanged. Tabs and line breaks become character references, since
/// a literal one is read back as a space.
fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\n', '\r', '\t']) {
        return Cow::Borrowed(value);
    }

    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
