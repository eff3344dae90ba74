use std::collections::BTreeMap;

use indexmap::map::Entry;
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::DecodeError;
use crate::value::{StructuredValue, ATTRIBUTES_KEY, VALUE_KEY};

/// A parsed document. The root element's name is kept apart from its content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    pub root: String,
    pub value: StructuredValue,
}

/// An element whose end tag has not been seen yet.
struct Frame {
    name: String,
    attributes: BTreeMap<String, String>,
    children: IndexMap<String, StructuredValue>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self, DecodeError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = BTreeMap::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(markup_error)?;
            let key = attribute.key.as_ref();
            if key == b"xmlns" || key.starts_with(b"xmlns:") {
                continue;
            }
            let value = attribute.unescape_value().map_err(markup_error)?;
            attributes.insert(
                String::from_utf8_lossy(key).into_owned(),
                value.into_owned(),
            );
        }

        Ok(Self {
            name,
            attributes,
            children: IndexMap::new(),
            text: String::new(),
        })
    }

    /// A second sibling with the same name turns the entry into a list.
    fn push_child(&mut self, name: String, value: StructuredValue) {
        match self.children.entry(name) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                StructuredValue::List(items) => items.push(value),
                existing => {
                    let first = std::mem::take(existing);
                    *existing = StructuredValue::List(vec![first, value]);
                }
            },
        }
    }

    fn finish(self) -> (String, StructuredValue) {
        let text = if self.text.trim().is_empty() {
            String::new()
        } else {
            self.text
        };

        if self.attributes.is_empty() && self.children.is_empty() {
            return (self.name, StructuredValue::Scalar(text));
        }

        let mut map = IndexMap::with_capacity(self.children.len() + 2);
        if !self.attributes.is_empty() {
            map.insert(
                ATTRIBUTES_KEY.to_owned(),
                StructuredValue::Attributes(self.attributes),
            );
        }
        let has_children = !self.children.is_empty();
        map.extend(self.children);
        if !has_children && !text.is_empty() {
            map.insert(VALUE_KEY.to_owned(), StructuredValue::Scalar(text));
        }
        (self.name, StructuredValue::Object(map))
    }
}

/// Parses a markup document into a [`StructuredValue`] tree.
pub fn parse(text: &str) -> Result<XmlDocument, DecodeError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Frame> = Vec::new();
    let mut document: Option<XmlDocument> = None;

    loop {
        match reader.read_event().map_err(markup_error)? {
            Event::Start(start) => {
                ensure_single_root(&stack, &document)?;
                stack.push(Frame::open(&start)?);
            }
            Event::Empty(start) => {
                ensure_single_root(&stack, &document)?;
                close(Frame::open(&start)?, &mut stack, &mut document);
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| DecodeError::Markup {
                    message: String::from("closing tag without an open element"),
                })?;
                close(frame, &mut stack, &mut document);
            }
            Event::Text(content) => {
                if let Some(frame) = stack.last_mut() {
                    frame
                        .text
                        .push_str(&content.unescape().map_err(markup_error)?);
                }
            }
            Event::CData(content) => {
                if let Some(frame) = stack.last_mut() {
                    frame
                        .text
                        .push_str(&String::from_utf8_lossy(&content.into_inner()));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(frame) = stack.last() {
        return Err(DecodeError::Markup {
            message: format!("element '{}' is never closed", frame.name),
        });
    }

    document.ok_or_else(|| DecodeError::Markup {
        message: String::from("document has no root element"),
    })
}

fn close(frame: Frame, stack: &mut [Frame], document: &mut Option<XmlDocument>) {
    let (name, value) = frame.finish();
    match stack.last_mut() {
        Some(parent) => parent.push_child(name, value),
        None => *document = Some(XmlDocument { root: name, value }),
    }
}

fn ensure_single_root(stack: &[Frame], document: &Option<XmlDocument>) -> Result<(), DecodeError> {
    if stack.is_empty() && document.is_some() {
        return Err(DecodeError::Markup {
            message: String::from("more than one root element"),
        });
    }
    Ok(())
}

fn markup_error(error: impl std::fmt::Display) -> DecodeError {
    DecodeError::Markup {
        message: error.to_string(),
    }
}
