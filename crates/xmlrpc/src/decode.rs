//! Typed decoders for the two VisTrails response shapes.
//!
//! Both calls answer with the same envelope, a one-element array wrapped
//! in the usual XML-RPC layers:
//!
//! ```text
//! methodResponse/params/param/value/array/data/value/<payload>
//! ```
//!
//! `get_tag_version` puts an `<int>` there, `get_wf_xml` a `<string>`
//! holding the `<workflow>` element. Each decoder walks that fixed path
//! with a streaming [`quick_xml::Reader`] and fails with a named
//! [`DecodeError`] as soon as the document stops matching. The rest of the
//! document is still read to the end: every open element must be closed
//! and nothing but whitespace, comments or processing instructions may
//! follow the root element.

use quick_xml::events::{BytesStart, Event};
use quick_xml::{Reader, Writer};

const METHOD_RESPONSE: &str = "methodResponse";
const PARAMS: &str = "params";
const FAULT: &str = "fault";
/// Path from `<params>` down to the first array element.
const ARRAY_VALUE_PATH: [&str; 5] = ["param", "value", "array", "data", "value"];
const STRING: &str = "string";
const WORKFLOW: &str = "workflow";
const INT_TAGS: [&str; 3] = ["int", "i4", "i8"];
/// Elements open once inside the first array element: `methodResponse`,
/// `params`, then [`ARRAY_VALUE_PATH`].
const ARRAY_VALUE_DEPTH: usize = 2 + ARRAY_VALUE_PATH.len();

/// Errors from decoding a response envelope.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The payload is not well-formed XML.
    #[error("Malformed XML: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Re-serializing the extracted element failed.
    #[error("Failed to write extracted element: {0}")]
    Write(#[from] std::io::Error),

    /// An element of the expected envelope path is absent.
    #[error("Expected <{0}> element not found")]
    MissingElement(&'static str),

    /// The server answered with a `<fault>` instead of `<params>`.
    #[error("Remote fault: {0}")]
    Fault(String),

    #[error("Invalid integer value: {0:?}")]
    InvalidInt(String),

    /// The document ended while elements were still open.
    #[error("Unexpected end of document")]
    UnexpectedEof,

    /// Markup or text after the root element was closed.
    #[error("Unexpected content after the root element")]
    TrailingContent,

    #[error("Extracted element is not valid UTF-8")]
    Encoding,
}

/// A child element found while walking the envelope.
enum Child<'a> {
    Open(BytesStart<'a>),
    Empty(BytesStart<'a>),
}

/// Decode the integer payload of a `get_tag_version` response.
pub fn decode_int_response(xml: &str) -> Result<i64, DecodeError> {
    let mut reader = Reader::from_str(xml);
    enter_array_value(&mut reader)?;

    let raw = loop {
        match next_child(&mut reader)? {
            Some(Child::Open(e)) if INT_TAGS.iter().any(|tag| is(&e, tag)) => {
                break reader.read_text(e.name())?;
            }
            Some(Child::Open(e)) => skip(&mut reader, &e)?,
            Some(Child::Empty(_)) => {}
            None => return Err(DecodeError::MissingElement("int")),
        }
    };

    let raw = raw.trim();
    let version = raw
        .parse::<i64>()
        .map_err(|_| DecodeError::InvalidInt(raw.to_string()))?;

    drain(&mut reader, ARRAY_VALUE_DEPTH)?;
    Ok(version)
}

/// Extract and re-serialize the `<workflow>` element of a `get_wf_xml`
/// response.
///
/// The input must already have its HTML entities decoded, so that the
/// workflow is real markup inside `<string>`. The element is written back
/// byte for byte, attributes and text escaping included.
pub fn decode_workflow_response(xml: &str) -> Result<String, DecodeError> {
    let mut reader = Reader::from_str(xml);
    enter_array_value(&mut reader)?;
    enter(&mut reader, STRING)?;

    let mut writer = Writer::new(Vec::new());
    loop {
        match next_child(&mut reader)? {
            Some(Child::Open(e)) if is(&e, WORKFLOW) => {
                writer.write_event(Event::Start(e))?;
                copy_subtree(&mut reader, &mut writer)?;
                break;
            }
            Some(Child::Empty(e)) if is(&e, WORKFLOW) => {
                writer.write_event(Event::Empty(e))?;
                break;
            }
            Some(Child::Open(e)) => skip(&mut reader, &e)?,
            Some(Child::Empty(_)) => {}
            None => return Err(DecodeError::MissingElement(WORKFLOW)),
        }
    }

    // Still inside `<string>`.
    drain(&mut reader, ARRAY_VALUE_DEPTH + 1)?;
    String::from_utf8(writer.into_inner()).map_err(|_| DecodeError::Encoding)
}

// ---- envelope walking ----

/// Position the reader just inside the first array element's `<value>`.
fn enter_array_value(reader: &mut Reader<&[u8]>) -> Result<(), DecodeError> {
    enter(reader, METHOD_RESPONSE)?;

    loop {
        match next_child(reader)? {
            Some(Child::Open(e)) if is(&e, PARAMS) => break,
            Some(Child::Open(e)) if is(&e, FAULT) => {
                return Err(DecodeError::Fault(collect_text(reader)?));
            }
            Some(Child::Open(e)) => skip(reader, &e)?,
            Some(Child::Empty(_)) => {}
            None => return Err(DecodeError::MissingElement(PARAMS)),
        }
    }

    for name in ARRAY_VALUE_PATH {
        enter(reader, name)?;
    }
    Ok(())
}

/// Advance to the first child named `name` and step inside it, skipping
/// earlier siblings.
fn enter(reader: &mut Reader<&[u8]>, name: &'static str) -> Result<(), DecodeError> {
    loop {
        match next_child(reader)? {
            Some(Child::Open(e)) if is(&e, name) => return Ok(()),
            Some(Child::Open(e)) => skip(reader, &e)?,
            Some(Child::Empty(e)) if is(&e, name) => return Err(DecodeError::MissingElement(name)),
            Some(Child::Empty(_)) => {}
            None => return Err(DecodeError::MissingElement(name)),
        }
    }
}

/// Next child element of the current element, or `None` once the current
/// element (or the document) ends. Text, comments and declarations are
/// ignored.
fn next_child<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Option<Child<'a>>, DecodeError> {
    loop {
        match reader.read_event()? {
            Event::Start(e) => return Ok(Some(Child::Open(e))),
            Event::Empty(e) => return Ok(Some(Child::Empty(e))),
            Event::End(_) | Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

fn skip(reader: &mut Reader<&[u8]>, start: &BytesStart<'_>) -> Result<(), DecodeError> {
    reader.read_to_end(start.name())?;
    Ok(())
}

/// Copy every event up to and including the end tag of the element whose
/// start tag was just read.
fn copy_subtree(reader: &mut Reader<&[u8]>, writer: &mut Writer<Vec<u8>>) -> Result<(), DecodeError> {
    let mut depth = 0usize;
    loop {
        let event = reader.read_event()?;
        let closes = match event {
            Event::Start(_) => {
                depth += 1;
                false
            }
            Event::End(_) if depth == 0 => true,
            Event::End(_) => {
                depth -= 1;
                false
            }
            Event::Eof => return Err(DecodeError::UnexpectedEof),
            _ => false,
        };

        writer.write_event(event)?;
        if closes {
            return Ok(());
        }
    }
}

/// Concatenate the non-blank text nodes of the current element.
fn collect_text(reader: &mut Reader<&[u8]>) -> Result<String, DecodeError> {
    let mut depth = 0usize;
    let mut parts = Vec::new();
    loop {
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) if depth == 0 => break,
            Event::End(_) => depth -= 1,
            Event::Text(text) => {
                let text = String::from_utf8_lossy(&text);
                let text = text.trim();
                if !text.is_empty() {
                    parts.push(text.to_string());
                }
            }
            Event::Eof => return Err(DecodeError::UnexpectedEof),
            _ => {}
        }
    }
    Ok(parts.join(" "))
}

/// Read the remainder of the document with `open` elements still
/// unclosed, requiring each of them to close and nothing to follow the
/// root.
fn drain(reader: &mut Reader<&[u8]>, mut open: usize) -> Result<(), DecodeError> {
    loop {
        match reader.read_event()? {
            Event::Start(_) | Event::Empty(_) | Event::End(_) | Event::CData(_) | Event::DocType(_)
                if open == 0 =>
            {
                return Err(DecodeError::TrailingContent);
            }
            Event::Text(text) if open == 0 && !text.iter().all(u8::is_ascii_whitespace) => {
                return Err(DecodeError::TrailingContent);
            }
            Event::Start(_) => open += 1,
            Event::End(_) => open -= 1,
            Event::Eof if open > 0 => return Err(DecodeError::UnexpectedEof),
            Event::Eof => return Ok(()),
            _ => {}
        }
    }
}

fn is(start: &BytesStart<'_>, name: &str) -> bool {
    start.local_name().as_ref() == name.as_bytes()
}
