//! A minimal owned element tree for XMI documents.
//!
//! Only element names, attributes, and nesting are kept; text content,
//! comments, and processing instructions are dropped. Names are stored
//! exactly as written (`sysml:Namespace`), and lookups compare local names
//! so the queries don't depend on which prefix a document binds.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// One XML element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    /// Returns the element name with any namespace prefix removed.
    pub(crate) fn local_name(&self) -> &str {
        local(&self.name)
    }

    /// Returns the value of the first attribute whose local name is `name`.
    pub(crate) fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| local(key) == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the `xsi:type` tag with its namespace prefix removed.
    pub(crate) fn type_tag(&self) -> Option<&str> {
        self.attr("type").map(local)
    }

    /// Iterates direct children whose local name is `name`.
    pub(crate) fn children_named<'a>(
        &'a self,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.local_name() == name)
    }
}

/// Strips a `prefix:` from a qualified XML name or type tag.
pub(crate) fn local(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Reasons a document failed to parse.
#[derive(Debug)]
pub(crate) enum ParseError {
    Xml(quick_xml::Error),
    Malformed(&'static str),
}

impl From<quick_xml::Error> for ParseError {
    fn from(err: quick_xml::Error) -> Self {
        ParseError::Xml(err)
    }
}

/// Parses `text` into its root element.
pub(crate) fn parse(text: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(text);
    let mut open: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => open.push(element(&start)?),
            Event::Empty(start) => {
                let elem = element(&start)?;
                attach(&mut open, &mut root, elem)?;
            }
            Event::End(_) => {
                // quick-xml has already checked that the end name matches.
                let elem = open
                    .pop()
                    .ok_or(ParseError::Malformed("unexpected closing tag"))?;
                attach(&mut open, &mut root, elem)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(ParseError::Malformed("unclosed element at end of input"));
    }
    root.ok_or(ParseError::Malformed("document has no root element"))
}

fn element(start: &BytesStart<'_>) -> Result<Element, quick_xml::Error> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value()?.into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
    })
}

/// Adds a finished element to its parent, or makes it the root.
fn attach(
    open: &mut [Element],
    root: &mut Option<Element>,
    elem: Element,
) -> Result<(), ParseError> {
    match open.last_mut() {
        Some(parent) => parent.children.push(elem),
        None if root.is_none() => *root = Some(elem),
        None => return Err(ParseError::Malformed("multiple root elements")),
    }
    Ok(())
}
