//! Event stream -> [`Document`] tree.

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use rustc_hash::FxHashMap;

use super::{Attr, Document, DocumentError, Element, Node};

/// Where a finished node goes.
#[derive(Default)]
struct TreeBuilder {
    prolog: Vec<Node>,
    root: Option<Element>,
    trailing: Vec<Node>,
    open: Vec<Element>,
    /// Internal entities declared in the DOCTYPE.
    entities: FxHashMap<String, String>,
}

impl TreeBuilder {
    fn attach(&mut self, node: Node) -> Result<(), DocumentError> {
        if let Some(parent) = self.open.last_mut() {
            parent.children.push(node);
            return Ok(());
        }

        match node {
            Node::Element(elem) if self.root.is_none() => self.root = Some(elem),
            Node::Element(elem) => return Err(DocumentError::MultipleRoots(elem.name)),
            markup if self.root.is_none() => self.prolog.push(markup),
            markup => self.trailing.push(markup),
        }
        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<(), DocumentError> {
        let elem = self
            .open
            .pop()
            .ok_or_else(|| DocumentError::UnexpectedEnd(name.to_string()))?;
        if elem.name != name {
            return Err(DocumentError::UnexpectedEnd(name.to_string()));
        }
        self.attach(Node::Element(elem))
    }

    fn finish(self) -> Result<Document, DocumentError> {
        if let Some(elem) = self.open.last() {
            return Err(DocumentError::Unclosed(elem.name.clone()));
        }
        let root = self.root.ok_or(DocumentError::NoRoot)?;
        Ok(Document {
            prolog: self.prolog,
            root,
            trailing: self.trailing,
        })
    }
}

pub(super) fn parse_document(text: &str) -> Result<Document, DocumentError> {
    let mut reader = Reader::from_str(text);
    let mut builder = TreeBuilder::default();

    loop {
        match reader.read_event() {
            Ok(Event::Start(elem)) => {
                let elem = read_element(&elem, &builder.entities)?;
                builder.open.push(elem);
            }
            Ok(Event::Empty(elem)) => {
                let elem = read_element(&elem, &builder.entities)?;
                builder.attach(Node::Element(elem))?;
            }
            Ok(Event::DocType(doctype)) => {
                collect_entities(std::str::from_utf8(&doctype)?, &mut builder.entities);
                builder.attach(Node::Markup(Event::DocType(doctype.into_owned())))?;
            }
            Ok(Event::End(elem)) => builder.close(std::str::from_utf8(elem.name().as_ref())?)?,
            Ok(Event::Eof) => break,
            Ok(event) => builder.attach(Node::Markup(event.into_owned()))?,
            Err(e) => {
                return Err(DocumentError::Xml {
                    position: reader.error_position() as u64,
                    source: e,
                });
            }
        }
    }

    builder.finish()
}

/// Build an element (without children) from a start tag.
///
/// Attribute values are unescaped with the predefined entities plus the
/// ones declared in the DOCTYPE (`xmlns="&ns_svg;"` in Illustrator exports).
fn read_element(
    start: &BytesStart<'_>,
    entities: &FxHashMap<String, String>,
) -> Result<Element, DocumentError> {
    let name = std::str::from_utf8(start.name().as_ref())?.to_string();
    let mut attrs = Vec::new();

    for attr in start.attributes() {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let raw = std::str::from_utf8(&attr.value)?;
        let value = unescape_with(raw, |entity| {
            resolve_predefined_entity(entity).or_else(|| entities.get(entity).map(String::as_str))
        })?;
        attrs.push(Attr::new(key, value));
    }

    Ok(Element {
        attrs,
        ..Element::new(name)
    })
}

/// Record `<!ENTITY name "value">` declarations from a DOCTYPE body.
///
/// Parameter (`%`) and external (`SYSTEM`/`PUBLIC`) entities are skipped.
/// The first declaration of a name wins.
fn collect_entities(doctype: &str, entities: &mut FxHashMap<String, String>) {
    let mut rest = doctype;
    while let Some(at) = rest.find("<!ENTITY") {
        rest = rest[at + "<!ENTITY".len()..].trim_start();

        if rest.starts_with('%') {
            continue;
        }
        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let (name, tail) = rest.split_at(name_end);
        rest = tail.trim_start();

        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let Some(len) = rest[1..].find(quote) else {
            break;
        };
        entities
            .entry(name.to_string())
            .or_insert_with(|| rest[1..1 + len].to_string());
        rest = &rest[1 + len + 1..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let doc = parse_document(
            r#"<svg viewBox="0 0 10 10"><defs><linearGradient id="g1"/></defs><rect fill="url(#g1)"/></svg>"#,
        )
        .unwrap();

        assert_eq!(doc.root.name, "svg");
        assert_eq!(doc.root.attr("viewBox"), Some("0 0 10 10"));

        let children: Vec<_> = doc.root.child_elements().map(|e| e.name.as_str()).collect();
        assert_eq!(children, ["defs", "rect"]);

        let defs = doc.root.child_elements().next().unwrap();
        let gradient = defs.child_elements().next().unwrap();
        assert_eq!(gradient.attr("id"), Some("g1"));
    }

    #[test]
    fn test_parse_keeps_attribute_order() {
        let doc = parse_document(r#"<svg><path fill="red" d="M0 0" id="p" class="x"/></svg>"#)
            .unwrap();
        let path = doc.root.child_elements().next().unwrap();
        let names: Vec<_> = path.attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["fill", "d", "id", "class"]);
    }

    #[test]
    fn test_parse_unescapes_attribute_values() {
        let doc = parse_document(r#"<svg aria-label="a &amp; b"/>"#).unwrap();
        assert_eq!(doc.root.attr("aria-label"), Some("a & b"));
    }

    #[test]
    fn test_parse_namespaced_attribute_name() {
        let doc = parse_document(
            r##"<svg xmlns:xlink="http://www.w3.org/1999/xlink"><use xlink:href="#a"/></svg>"##,
        )
        .unwrap();
        let used = doc.root.child_elements().next().unwrap();
        assert_eq!(used.attr("xlink:href"), Some("#a"));
    }

    #[test]
    fn test_parse_prolog_and_text() {
        let doc = parse_document(
            "<?xml version=\"1.0\"?>\n<!-- icon --><svg><text>hi</text></svg>\n",
        )
        .unwrap();
        assert!(!doc.prolog.is_empty());
        assert_eq!(doc.root.name, "svg");
        let text = doc.root.child_elements().next().unwrap();
        assert!(matches!(text.children.first(), Some(Node::Markup(Event::Text(_)))));
    }

    #[test]
    fn test_parse_resolves_doctype_entities() {
        let doc = parse_document(concat!(
            r#"<?xml version="1.0"?>"#,
            r#"<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd" ["#,
            r#"<!ENTITY ns_svg "http://www.w3.org/2000/svg">"#,
            r#"<!ENTITY ns_xlink 'http://www.w3.org/1999/xlink'>"#,
            r#"]>"#,
            r#"<svg xmlns="&ns_svg;" xmlns:xlink="&ns_xlink;"><g id="a" data-x="&amp;&#65;"/></svg>"#,
        ))
        .unwrap();

        assert_eq!(doc.root.attr("xmlns"), Some("http://www.w3.org/2000/svg"));
        assert_eq!(doc.root.attr("xmlns:xlink"), Some("http://www.w3.org/1999/xlink"));
        let g = doc.root.child_elements().next().unwrap();
        assert_eq!(g.attr("data-x"), Some("&A"));
        assert!(matches!(doc.prolog.last(), Some(Node::Markup(Event::DocType(_)))));
    }

    #[test]
    fn test_parse_undeclared_entity_fails() {
        let err = parse_document(r#"<svg xmlns="&ns_svg;"/>"#).unwrap_err();
        assert!(matches!(err, DocumentError::Escape(_)));
    }

    #[test]
    fn test_collect_entities() {
        let mut entities = FxHashMap::default();
        collect_entities(
            r#"svg [<!ENTITY % param "x"><!ENTITY ext SYSTEM "a.ent"><!ENTITY a "1"><!ENTITY a "2"><!ENTITY b '"q"'>]"#,
            &mut entities,
        );
        assert_eq!(entities.len(), 2);
        assert_eq!(entities["a"], "1");
        assert_eq!(entities["b"], "\"q\"");
    }

    #[test]
    fn test_parse_failures() {
        assert!(parse_document("").is_err());
        assert!(parse_document("just text").is_err());
        assert!(parse_document("<svg><g></svg>").is_err());
        assert!(parse_document("<svg>").is_err());
        assert!(parse_document("<svg/><svg/>").is_err());
        assert!(parse_document(r#"<svg id="a" id="b"/>"#).is_err());
    }
}
