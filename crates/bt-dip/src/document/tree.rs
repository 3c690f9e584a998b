//! Minimal element tree built from quick-xml events
//!
//! Protocol transcripts are small enough (a few MB) to hold in memory, and
//! the extractors need random access to descendants, so the event stream is
//! folded into owned [`Element`]s once.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Error, Result};

/// One XML element with its attributes, direct text and child elements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    attributes: Vec<(String, String)>,
    text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>) -> Self {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let attributes = start
            .attributes()
            .flatten()
            .map(|attr| {
                (
                    String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                    decode_entities(&String::from_utf8_lossy(&attr.value)),
                )
            })
            .collect();
        Self {
            name,
            attributes,
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Parse a complete document and return its root element
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) => stack.push(Element::from_start(e)),
                Event::Empty(ref e) => {
                    let element = Element::from_start(e);
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    if let Some(element) = stack.pop() {
                        attach(&mut stack, &mut root, element);
                    }
                }
                Event::Text(ref e) => {
                    if let Some(current) = stack.last_mut() {
                        current
                            .text
                            .push_str(&decode_entities(&String::from_utf8_lossy(&**e)));
                    }
                }
                Event::CData(ref e) => {
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&String::from_utf8_lossy(&**e));
                    }
                }
                Event::GeneralRef(ref e) => {
                    if let Some(current) = stack.last_mut() {
                        let name = String::from_utf8_lossy(&**e);
                        current.text.push_str(&resolve_entity(&name));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(Error::UnexpectedShape {
                message: format!("unclosed element <{}>", stack[stack.len() - 1].name),
            });
        }
        root.ok_or_else(|| Error::UnexpectedShape {
            message: "document has no root element".to_string(),
        })
    }

    /// Attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct text content, trimmed
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Direct text content, or `None` when empty
    pub fn non_empty_text(&self) -> Option<&str> {
        Some(self.text()).filter(|t| !t.is_empty())
    }

    /// First direct child with the given name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given name
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a `/`-separated path of direct children
    pub fn path(&self, path: &str) -> Option<&Element> {
        path.split('/').try_fold(self, |el, segment| el.child(segment))
    }

    /// Text at a child path, empty when absent
    pub fn text_at(&self, path: &str) -> String {
        self.path(path)
            .map(|el| el.text().to_string())
            .unwrap_or_default()
    }

    /// All descendants (excluding `self`) in document order
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        let mut pending: Vec<&Element> = self.children.iter().rev().collect();
        while let Some(el) = pending.pop() {
            out.push(el);
            pending.extend(el.children.iter().rev());
        }
        out
    }

    /// Descendants with the given name in document order
    pub fn find_all<'a>(&'a self, name: &str) -> Vec<&'a Element> {
        self.descendants()
            .into_iter()
            .filter(|el| el.name == name)
            .collect()
    }

    /// First descendant with the given name
    pub fn find(&self, name: &str) -> Option<&Element> {
        self.descendants().into_iter().find(|el| el.name == name)
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Resolve one entity reference name (without `&` and `;`)
fn resolve_entity(name: &str) -> String {
    let resolved = match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => name
            .strip_prefix("#x")
            .or_else(|| name.strip_prefix("#X"))
            .and_then(|hex| u32::from_str_radix(hex, 16).ok())
            .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
            .and_then(char::from_u32),
    };
    match resolved {
        Some(c) => c.to_string(),
        None => format!("&{name};"),
    }
}

/// Decode entity references embedded in raw text
fn decode_entities(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find(';') {
            Some(end) if end > 0 && !after[..end].contains(char::is_whitespace) => {
                out.push_str(&resolve_entity(&after[..end]));
                rest = &after[end + 1..];
            }
            _ => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_nested_tree() {
        let root = Element::parse(r#"<a x="1"><b>one</b><c/><b>two</b></a>"#).unwrap();
        assert_eq!(root.name, "a");
        assert_eq!(root.attr("x"), Some("1"));
        assert_eq!(root.children.len(), 3);
        let texts: Vec<&str> = root.children_named("b").map(|b| b.text()).collect();
        assert_eq!(texts, vec!["one", "two"]);
    }

    #[test]
    fn descendants_are_in_document_order() {
        let root = Element::parse("<r><a><b/></a><c/></r>").unwrap();
        let names: Vec<&str> = root.descendants().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
    }

    #[test]
    fn decodes_entities_in_text_and_attributes() {
        let root = Element::parse(r#"<p t="A &amp; B">Fisch &amp; Chips &#8211; &#x41;</p>"#).unwrap();
        assert_eq!(root.attr("t"), Some("A & B"));
        assert_eq!(root.text(), "Fisch & Chips \u{2013} A");
    }

    #[test]
    fn path_lookup() {
        let root = Element::parse("<r><name><rolle><rolle_lang>Präsidentin</rolle_lang></rolle></name></r>").unwrap();
        assert_eq!(root.text_at("name/rolle/rolle_lang"), "Präsidentin");
        assert_eq!(root.text_at("name/missing"), "");
    }

    #[test]
    fn rejects_mismatched_tags() {
        assert!(Element::parse("<a><b></a>").is_err());
    }

    #[test]
    fn rejects_empty_input() {
        assert!(matches!(
            Element::parse("   "),
            Err(Error::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn unknown_entity_kept_verbatim() {
        assert_eq!(decode_entities("a &foo; b & c"), "a &foo; b & c");
    }
}
