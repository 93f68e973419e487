/*!
 * In-memory model of an NFO sidecar document.
 *
 * The document keeps everything under the root element (child elements,
 * attributes, text, CDATA and comments) so that merging tags never drops
 * unrelated metadata. Content outside the root is not kept; entities
 * declared in an internal DTD subset are expanded in place.
 */

use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::collections::HashMap;

use crate::errors::SidecarError;

/// Element name of a single tag entry
pub const TAG_ELEMENT: &str = "tag";

/// Node below an element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Unescaped character data
    Text(String),
    CData(String),
    Comment(String),
}

/// XML element with its attributes and children
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Element holding a single text node
    pub fn with_text(name: &str, text: &str) -> Self {
        let mut element = Self::new(name);
        element.children.push(Node::Text(text.to_string()));
        element
    }

    /// Character data before the first child element
    pub fn text(&self) -> String {
        let mut text = String::new();
        for child in &self.children {
            match child {
                Node::Text(t) | Node::CData(t) => text.push_str(t),
                Node::Comment(_) => {}
                Node::Element(_) => break,
            }
        }
        text
    }

    /// Immediate child elements
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|child| match child {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// Append a child element, following the existing line layout if any
    fn append_element(&mut self, element: Element) {
        let closing = match self.children.last() {
            Some(Node::Text(t)) if is_layout(t) => Some(t.clone()),
            _ => None,
        };

        let Some(closing) = closing else {
            self.children.push(Node::Element(element));
            return;
        };

        let at = self.children.len() - 1;
        let indent = self.children[..at]
            .iter()
            .find_map(|child| match child {
                Node::Text(t) if is_layout(t) => Some(t.clone()),
                _ => None,
            })
            .unwrap_or_else(|| format!("{}  ", closing));

        self.children.insert(at, Node::Element(element));
        self.children.insert(at, Node::Text(indent));
    }
}

/// Whitespace that only separates lines
fn is_layout(text: &str) -> bool {
    text.contains('\n') && text.trim().is_empty()
}

/// Parsed sidecar document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfoDocument {
    root: Element,
}

impl NfoDocument {
    /// Empty document with the given root element
    pub fn new(root_name: &str) -> Self {
        let mut root = Element::new(root_name);
        root.children.push(Node::Text("\n".to_string()));
        Self { root }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Parse a document, rejecting anything that is not well-formed
    pub fn parse(xml: &str) -> Result<Self, SidecarError> {
        let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);
        reader.config_mut().check_end_names = true;

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;
        let mut entities: HashMap<String, String> = HashMap::new();

        loop {
            let event = reader.read_event().map_err(|e| {
                SidecarError::Malformed(format!("{} at byte {}", e, reader.buffer_position()))
            })?;

            match event {
                Event::Start(start) => {
                    if stack.is_empty() && root.is_some() {
                        return Err(malformed("content after the root element"));
                    }
                    stack.push(element_from_start(&start, &entities)?);
                }
                Event::Empty(start) => {
                    let element = element_from_start(&start, &entities)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| malformed("closing tag without an open element"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape_with(|name| resolve_entity(&entities, name))
                        .map_err(|e| SidecarError::Malformed(e.to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Text(text.into_owned())),
                        None if text.trim().is_empty() => {}
                        None => return Err(malformed("text outside the root element")),
                    }
                }
                Event::CData(data) => {
                    let data = String::from_utf8_lossy(&data.into_inner()).into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::CData(data)),
                        None => return Err(malformed("CDATA outside the root element")),
                    }
                }
                Event::Comment(comment) => {
                    if let Some(parent) = stack.last_mut() {
                        let comment = String::from_utf8_lossy(&comment).into_owned();
                        parent.children.push(Node::Comment(comment));
                    }
                }
                Event::DocType(doctype) => {
                    entities.extend(internal_entities(&String::from_utf8_lossy(&doctype)));
                }
                Event::Eof => break,
                // Declaration and processing instructions are not kept
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(SidecarError::Malformed(format!("unclosed element <{}>", open.name)));
        }

        root.map(|root| Self { root })
            .ok_or_else(|| malformed("no root element"))
    }

    /// Text of every immediate tag child of the root, in document order
    pub fn tags(&self) -> Vec<String> {
        self.root
            .elements()
            .filter(|element| element.name == TAG_ELEMENT)
            .map(|element| element.text())
            .collect()
    }

    /// Exact (case and whitespace sensitive) lookup of a tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.root
            .elements()
            .any(|element| element.name == TAG_ELEMENT && element.text() == tag)
    }

    /// Append a tag unless it is already present; returns whether it was added
    pub fn add_tag(&mut self, tag: &str) -> bool {
        if self.has_tag(tag) {
            return false;
        }
        self.root.append_element(Element::with_text(TAG_ELEMENT, tag));
        true
    }

    /// Serialize with an XML declaration
    pub fn to_xml(&self) -> Result<String, SidecarError> {
        let mut writer = Writer::new(Vec::new());

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(|e| SidecarError::Serialize(e.to_string()))?;
        writer
            .write_event(Event::Text(BytesText::new("\n")))
            .map_err(|e| SidecarError::Serialize(e.to_string()))?;
        write_element(&mut writer, &self.root)?;
        writer
            .write_event(Event::Text(BytesText::new("\n")))
            .map_err(|e| SidecarError::Serialize(e.to_string()))?;

        String::from_utf8(writer.into_inner()).map_err(|e| SidecarError::Serialize(e.to_string()))
    }
}

fn malformed(message: &str) -> SidecarError {
    SidecarError::Malformed(message.to_string())
}

/// Predefined XML entities, then the document's own declarations
fn resolve_entity<'a>(entities: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    match name {
        "lt" => Some("<"),
        "gt" => Some(">"),
        "amp" => Some("&"),
        "apos" => Some("'"),
        "quot" => Some("\""),
        _ => entities.get(name).map(String::as_str),
    }
}

/// General entities with a literal value from a DOCTYPE internal subset
///
/// Parameter entities and external (SYSTEM/PUBLIC) entities are ignored.
fn internal_entities(doctype: &str) -> Vec<(String, String)> {
    let mut entities = Vec::new();
    let mut rest = doctype;

    while let Some(at) = rest.find("<!ENTITY") {
        rest = rest[at + "<!ENTITY".len()..].trim_start();
        if rest.starts_with('%') {
            continue;
        }

        let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = rest[name_end..].trim_start();

        let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
            continue;
        };
        let value = &rest[1..];
        let Some(close) = value.find(quote) else {
            break;
        };
        if !name.is_empty() {
            entities.push((name.to_string(), value[..close].to_string()));
        }
        rest = &value[close + 1..];
    }

    entities
}

fn element_from_start(start: &BytesStart, entities: &HashMap<String, String>) -> Result<Element, SidecarError> {
    let mut element = Element::new(&String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| SidecarError::Malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value_with(|name| resolve_entity(entities, name))
            .map_err(|e| SidecarError::Malformed(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), SidecarError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(element));
        return Ok(());
    }
    if root.is_some() {
        return Err(malformed("more than one root element"));
    }
    *root = Some(element);
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), SidecarError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| SidecarError::Serialize(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| SidecarError::Serialize(e.to_string()))?;

    for child in &element.children {
        let result = match child {
            Node::Element(child) => {
                write_element(writer, child)?;
                Ok(())
            }
            // Only markup characters are escaped so untouched text keeps its quotes
            Node::Text(text) => {
                writer.write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))
            }
            Node::CData(data) => writer.write_event(Event::CData(BytesCData::new(data.as_str()))),
            Node::Comment(comment) => {
                writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))
            }
        };
        result.map_err(|e| SidecarError::Serialize(e.to_string()))?;
    }

    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| SidecarError::Serialize(e.to_string()))
}
