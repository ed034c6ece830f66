use crate::errors::{AppError, AppResult};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Read-only element tree built from one XML document.
///
/// Only element names, text content and child order are kept; attributes,
/// comments and processing instructions are dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    /// Text between the start tag and the first child (or the end tag).
    /// `None` when empty or whitespace-only.
    pub text: Option<String>,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: None,
            children: Vec::new(),
        }
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All direct children with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Text of the first direct child with the given name.
    ///
    /// Yields `None` both when the child is absent and when it has no text.
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name).and_then(|c| c.text.as_deref())
    }
}

/// Element under construction, with its text accumulated across events.
struct OpenElement {
    element: XmlElement,
    text: String,
}

impl OpenElement {
    fn new(start: &BytesStart) -> Self {
        Self {
            element: XmlElement::new(String::from_utf8_lossy(start.name().as_ref())),
            text: String::new(),
        }
    }

    fn close(mut self) -> XmlElement {
        if !self.text.trim().is_empty() {
            self.element.text = Some(self.text);
        }
        self.element
    }
}

/// Parses XML content provided as bytes into an element tree.
///
/// # Errors
///
/// Returns `ParseError` if the content is not a single well-formed XML element:
/// syntax errors, mismatched or unclosed tags, unknown entities, text or a
/// second element after the root, or no root at all.
pub fn parse_document(content: &[u8]) -> AppResult<XmlElement> {
    let mut reader = Reader::from_reader(content);
    let mut buf = Vec::with_capacity(8192);
    let mut stack: Vec<OpenElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|e| {
            AppError::ParseError(format!(
                "Malformed XML at byte {}: {e}",
                reader.error_position()
            ))
        })?;

        match event {
            Event::Start(e) => {
                ensure_no_second_root(&root, &stack)?;
                stack.push(OpenElement::new(&e));
            }
            Event::Empty(e) => {
                ensure_no_second_root(&root, &stack)?;
                let element = OpenElement::new(&e).close();
                attach(element, &mut stack, &mut root);
            }
            Event::End(_) => {
                let open = stack.pop().ok_or_else(|| {
                    AppError::ParseError("Closing tag without matching opening tag".into())
                })?;
                attach(open.close(), &mut stack, &mut root);
            }
            Event::Text(e) => {
                let txt = e
                    .decode()
                    .map_err(|e| AppError::ParseError(format!("Failed to decode XML text: {e}")))?;
                push_text(&mut stack, &txt)?;
            }
            Event::CData(e) => {
                let txt = String::from_utf8_lossy(&e).into_owned();
                push_text(&mut stack, &txt)?;
            }
            Event::GeneralRef(e) => {
                let resolved = match e.resolve_char_ref().map_err(|e| {
                    AppError::ParseError(format!("Invalid character reference: {e}"))
                })? {
                    Some(ch) => ch.to_string(),
                    None => {
                        let name = e.decode().map_err(|e| {
                            AppError::ParseError(format!("Failed to decode entity name: {e}"))
                        })?;
                        resolve_predefined_entity(&name)
                            .ok_or_else(|| {
                                AppError::ParseError(format!("Unknown entity reference &{name};"))
                            })?
                            .to_string()
                    }
                };
                push_text(&mut stack, &resolved)?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(AppError::ParseError(format!(
            "Unexpected end of document: <{}> is not closed",
            open.element.name
        )));
    }

    root.ok_or_else(|| AppError::ParseError("Document has no root element".into()))
}

fn ensure_no_second_root(root: &Option<XmlElement>, stack: &[OpenElement]) -> AppResult<()> {
    if root.is_some() && stack.is_empty() {
        return Err(AppError::ParseError(
            "Unexpected element after the root element".into(),
        ));
    }
    Ok(())
}

fn attach(element: XmlElement, stack: &mut [OpenElement], root: &mut Option<XmlElement>) {
    match stack.last_mut() {
        Some(parent) => parent.element.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(stack: &mut [OpenElement], txt: &str) -> AppResult<()> {
    match stack.last_mut() {
        // Only text before the first child belongs to the element
        Some(open) if open.element.children.is_empty() => open.text.push_str(txt),
        Some(_) => {}
        // Whitespace between the prolog, the root and trailing comments is fine
        None if txt.trim().is_empty() => {}
        None => {
            return Err(AppError::ParseError(
                "Text content outside the root element".into(),
            ))
        }
    }
    Ok(())
}
