//! Markup to nested-value deserialization.
//!
//! Conventions for the produced tree:
//!
//! - the root element's content is the document root (its name is dropped)
//! - namespace prefixes are dropped from element and attribute names
//! - a text-only element becomes a string; an empty element becomes `""`
//! - repeated sibling elements merge into a sequence in document order
//! - attributes become `@name` keys; text beside child elements goes to `#text`

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{IngestError, Result};

const TEXT_KEY: &str = "#text";
const ATTRIBUTE_PREFIX: &str = "@";

/// An element whose end tag has not been read yet.
struct Frame {
    name: String,
    children: Map<String, Value>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> Result<Self> {
        Ok(Self {
            name: local_name(start.local_name().as_ref())?,
            children: attributes(start)?,
            text: String::new(),
        })
    }

    fn close(self) -> (String, Value) {
        let text = self.text.trim().to_string();
        let value = if self.children.is_empty() {
            Value::String(text)
        } else {
            let mut children = self.children;
            if !text.is_empty() {
                children.insert(TEXT_KEY.to_string(), Value::String(text));
            }
            Value::Object(children)
        };
        (self.name, value)
    }
}

/// Parses markup into a nested value tree.
///
/// # Errors
///
/// Fails on malformed or unbalanced markup, or when there is no root element.
pub fn parse_markup(xml: &str) -> Result<Value> {
    let mut reader = Reader::from_str(xml);
    // Text is trimmed per element on close; trimming each event would eat the
    // spaces around entity references.
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<Value> = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Eof => break,
            Event::Start(start) => stack.push(Frame::open(&start)?),
            Event::Empty(start) => {
                let frame = Frame::open(&start)?;
                let (name, value) = frame.close();
                attach(&mut stack, &mut root, name, value)?;
            }
            Event::End(_) => {
                let frame = stack.pop().ok_or_else(|| IngestError::Unbalanced {
                    message: "closing tag without an open element".to_string(),
                })?;
                let (name, value) = frame.close();
                attach(&mut stack, &mut root, name, value)?;
            }
            Event::Text(text) => {
                if let Some(frame) = stack.last_mut() {
                    let raw = std::str::from_utf8(&text)?;
                    frame.text.push_str(&unescape(raw)?);
                }
            }
            Event::CData(data) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(std::str::from_utf8(&data)?);
                }
            }
            Event::GeneralRef(reference) => {
                if let Some(frame) = stack.last_mut() {
                    let name = std::str::from_utf8(&reference)?;
                    frame.text.push_str(&resolve_reference(name));
                }
            }
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(IngestError::Unbalanced {
            message: format!("element <{}> is never closed", open.name),
        });
    }
    let root = root.ok_or(IngestError::Empty)?;
    debug!(
        top_level_keys = root.as_object().map_or(0, Map::len),
        "parsed markup document"
    );
    Ok(root)
}

/// Adds a finished element to its parent, merging repeated names into a
/// sequence. With no parent the element is the document root.
fn attach(
    stack: &mut [Frame],
    root: &mut Option<Value>,
    name: String,
    value: Value,
) -> Result<()> {
    let Some(parent) = stack.last_mut() else {
        if root.is_some() {
            return Err(IngestError::Unbalanced {
                message: format!("second root element <{name}>"),
            });
        }
        *root = Some(value);
        return Ok(());
    };
    match parent.children.get_mut(&name) {
        // Element values are never sequences, so an existing sequence is a
        // merge from an earlier repeat.
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            parent.children.insert(name, value);
        }
    }
    Ok(())
}

fn attributes(start: &BytesStart<'_>) -> Result<Map<String, Value>> {
    let mut out = Map::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let raw_key = attribute.key.as_ref();
        if raw_key == b"xmlns" || raw_key.starts_with(b"xmlns:") {
            continue;
        }
        let key = local_name(attribute.key.local_name().as_ref())?;
        let raw_value = std::str::from_utf8(attribute.value.as_ref())?;
        out.insert(
            format!("{ATTRIBUTE_PREFIX}{key}"),
            Value::String(unescape(raw_value)?.into_owned()),
        );
    }
    Ok(out)
}

fn local_name(raw: &[u8]) -> Result<String> {
    Ok(std::str::from_utf8(raw)?.to_string())
}

/// Resolves `&name;` references. Unknown entities are kept verbatim.
fn resolve_reference(name: &str) -> String {
    if let Some(code) = name.strip_prefix('#') {
        let parsed = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
            Some(hex) => u32::from_str_radix(hex, 16).ok(),
            None => code.parse::<u32>().ok(),
        };
        if let Some(ch) = parsed.and_then(char::from_u32) {
            return ch.to_string();
        }
    } else if let Some(resolved) = resolve_predefined_entity(name) {
        return resolved.to_string();
    }
    format!("&{name};")
}
