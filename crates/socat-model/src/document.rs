//! Minimal XML document tree used to read and emit metadata records.

use std::io::Write;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use crate::error::{MetadataError, Result};

/// An XML element with ordered attributes and children.
///
/// Text content is kept trimmed; mixed content is not supported.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: Option<String>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Element holding only text content.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        let mut element = Self::new(name);
        element.set_text(text);
        element
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        let text = text.into();
        self.text = if text.is_empty() { None } else { Some(text) };
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    /// Sets an attribute, replacing an existing one of the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(key, _)| *key == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }

    pub fn push_child(&mut self, child: Element) {
        self.children.push(child);
    }

    /// First child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Trimmed text of the named child, or `None` when the child is absent.
    ///
    /// A present but empty child yields `Some("")`.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).map(|child| child.text().unwrap_or("").trim())
    }

    /// Follows `segments` downwards, creating missing elements on the way.
    pub fn descend_mut(&mut self, segments: &[&str]) -> &mut Element {
        let Some((first, rest)) = segments.split_first() else {
            return self;
        };
        let index = match self.children.iter().position(|child| child.name == *first) {
            Some(index) => index,
            None => {
                self.children.push(Element::new(*first));
                self.children.len() - 1
            }
        };
        self.children[index].descend_mut(rest)
    }

    /// Follows `segments` downwards without creating anything.
    pub fn descend(&self, segments: &[&str]) -> Option<&Element> {
        match segments.split_first() {
            None => Some(self),
            Some((first, rest)) => self.child(first)?.descend(rest),
        }
    }

    /// Parses a document and returns its root element.
    pub fn parse_xml(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event().map_err(MetadataError::xml)? {
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let element = element_from_start(&start)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let mut element = stack.pop().ok_or_else(|| {
                        MetadataError::MalformedDocument("unbalanced end tag".to_string())
                    })?;
                    element.finish_text();
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(text) => {
                    if let Some(current) = stack.last_mut() {
                        current.append_text(&String::from_utf8_lossy(&text));
                    }
                }
                Event::CData(data) => {
                    if let Some(current) = stack.last_mut() {
                        current.append_text(&String::from_utf8_lossy(&data));
                    }
                }
                Event::GeneralRef(reference) => {
                    let resolved = match reference.resolve_char_ref().map_err(MetadataError::xml)? {
                        Some(ch) => ch.to_string(),
                        None => {
                            let name = String::from_utf8_lossy(&reference);
                            resolve_predefined_entity(&name)
                                .ok_or_else(|| {
                                    MetadataError::MalformedDocument(format!(
                                        "unknown entity &{name};"
                                    ))
                                })?
                                .to_string()
                        }
                    };
                    if let Some(current) = stack.last_mut() {
                        current.append_text(&resolved);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(MetadataError::MalformedDocument(
                "document ended inside an element".to_string(),
            ));
        }
        root.ok_or_else(|| MetadataError::MalformedDocument("no root element".to_string()))
    }

    /// Writes the element as an indented document with an XML declaration.
    pub fn write_xml<W: Write>(&self, writer: W) -> Result<()> {
        let mut xml = Writer::new_with_indent(writer, b' ', 2);
        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(MetadataError::xml)?;
        self.write_events(&mut xml)
    }

    pub fn to_xml_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        self.write_xml(&mut buffer)?;
        String::from_utf8(buffer).map_err(MetadataError::xml)
    }

    fn write_events<W: Write>(&self, xml: &mut Writer<W>) -> Result<()> {
        let mut start = BytesStart::new(self.name.as_str());
        for (key, value) in &self.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }
        if self.children.is_empty() && self.text.is_none() {
            return xml
                .write_event(Event::Empty(start))
                .map_err(MetadataError::xml);
        }
        xml.write_event(Event::Start(start))
            .map_err(MetadataError::xml)?;
        if let Some(text) = &self.text {
            xml.write_event(Event::Text(BytesText::new(text)))
                .map_err(MetadataError::xml)?;
        }
        for child in &self.children {
            child.write_events(xml)?;
        }
        xml.write_event(Event::End(BytesEnd::new(self.name.as_str())))
            .map_err(MetadataError::xml)
    }

    fn append_text(&mut self, text: &str) {
        self.text.get_or_insert_with(String::new).push_str(text);
    }

    fn finish_text(&mut self) {
        if let Some(text) = self.text.take() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                self.text = Some(trimmed.to_string());
            }
        }
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(MetadataError::xml)?
        .to_string();
    let mut element = Element::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(MetadataError::xml)?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value().map_err(MetadataError::xml)?;
        element.set_attribute(key, value.into_owned());
    }
    Ok(element)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.push_child(element);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(element);
            Ok(())
        }
        None => Err(MetadataError::MalformedDocument(
            "more than one root element".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_and_text() {
        let xml = r#"<?xml version="1.0"?>
            <x_tags>
              <Investigator>
                <Name>  Jane Doe </Name>
                <Email/>
              </Investigator>
            </x_tags>"#;
        let root = Element::parse_xml(xml).unwrap();
        assert_eq!(root.name(), "x_tags");
        assert_eq!(root.text(), None);
        let investigator = root.child("Investigator").unwrap();
        assert_eq!(investigator.child_text("Name"), Some("Jane Doe"));
        assert_eq!(investigator.child_text("Email"), Some(""));
        assert_eq!(investigator.child_text("Phone"), None);
    }

    #[test]
    fn resolves_entities_and_attributes() {
        let xml = r#"<Conflict path="a/b"><Name>Smith &amp; Sons &#65;</Name></Conflict>"#;
        let root = Element::parse_xml(xml).unwrap();
        assert_eq!(root.attribute("path"), Some("a/b"));
        assert_eq!(root.child_text("Name"), Some("Smith & Sons A"));
    }

    #[test]
    fn rejects_multiple_roots() {
        let err = Element::parse_xml("<a/><b/>").unwrap_err();
        assert!(matches!(err, MetadataError::MalformedDocument(_)));
    }

    #[test]
    fn resolves_hex_and_predefined_references() {
        let root = Element::parse_xml("<a>&lt;&#x42;&gt; &quot;&apos;</a>").unwrap();
        assert_eq!(root.text(), Some("<B> \"'"));
    }

    #[test]
    fn rejects_unknown_entity() {
        assert!(Element::parse_xml("<a>&nbsp;</a>").is_err());
    }

    #[test]
    fn descend_mut_creates_missing_levels() {
        let mut root = Element::new("x_tags");
        root.descend_mut(&["Cruise_Info", "Vessel"])
            .push_child(Element::with_text("Vessel_Name", "Knorr"));
        root.descend_mut(&["Cruise_Info", "Vessel"])
            .push_child(Element::with_text("Country", "USA"));
        let vessel = root.descend(&["Cruise_Info", "Vessel"]).unwrap();
        assert_eq!(vessel.children().len(), 2);
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn written_document_parses_back() {
        let element = Element::new("Variable")
            .with_attribute("Variable_Name", "SST")
            .with_child(Element::with_text("Unit_of_Variable", "<degC>"));
        let xml = element.to_xml_string().unwrap();
        let parsed = Element::parse_xml(&xml).unwrap();
        assert_eq!(parsed, element);
    }
}
