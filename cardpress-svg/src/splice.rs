//! Byte-span splicing over a quick-xml event stream.
//!
//! Both rewriting passes (attribute-encoded binding, layer toggling) share
//! one mechanic: walk the events, remember how far the input has been copied,
//! and emit replacement markup only for the handful of start tags that
//! actually change. Every untouched byte range is copied verbatim, so
//! formatting, whitespace, comments and entity spelling all survive exactly
//! as authored.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::SvgError;

/// Decision for one `Start`/`Empty` event.
pub(crate) enum Rewrite {
    /// Copy the event through untouched.
    Keep,
    /// Replace just this tag's bytes with `text`.
    ReplaceTag(String),
    /// Replace this tag and swallow its children; `text` must therefore end
    /// mid-element, the source's own closing tag is copied right after it.
    /// On an `Empty` event there are no children and no closing tag, so
    /// `text` must be the complete replacement element.
    ReplaceElement(String),
}

/// Run `decide` over every `Start`/`Empty` event of `input` and splice the
/// requested replacements into a fresh document string.
pub(crate) fn rewrite_start_tags<F>(input: &str, mut decide: F) -> Result<String, SvgError>
where
    F: FnMut(&BytesStart<'_>, bool) -> Result<Rewrite, SvgError>,
{
    let mut reader = Reader::from_str(input);
    let mut out = String::with_capacity(input.len() + 128);
    let mut copied = 0usize;

    loop {
        let start = reader.buffer_position();
        let event = reader.read_event()?;
        let end = reader.buffer_position();
        match event {
            Event::Start(ref e) => match decide(e, false)? {
                Rewrite::Keep => {}
                Rewrite::ReplaceTag(text) => {
                    out.push_str(&input[copied..start]);
                    out.push_str(&text);
                    copied = end;
                }
                Rewrite::ReplaceElement(text) => {
                    out.push_str(&input[copied..start]);
                    out.push_str(&text);
                    copied = skip_children(&mut reader)?;
                }
            },
            Event::Empty(ref e) => match decide(e, true)? {
                Rewrite::Keep => {}
                Rewrite::ReplaceTag(text) | Rewrite::ReplaceElement(text) => {
                    out.push_str(&input[copied..start]);
                    out.push_str(&text);
                    copied = end;
                }
            },
            Event::Eof => break,
            _ => {}
        }
    }

    out.push_str(&input[copied..]);
    Ok(out)
}

/// Consume events up to the end tag closing the element just replaced.
/// Returns the byte offset where that end tag begins, so the caller's splice
/// resumes with the source's own `</...>`.
fn skip_children(reader: &mut Reader<&[u8]>) -> Result<usize, SvgError> {
    let mut depth = 1usize;
    loop {
        let start = reader.buffer_position();
        match reader.read_event()? {
            Event::Start(_) => depth += 1,
            Event::End(_) => {
                depth -= 1;
                if depth == 0 {
                    return Ok(start);
                }
            }
            Event::Eof => {
                return Err(SvgError::Xml(quick_xml::Error::UnexpectedEof(
                    "element is never closed".to_string(),
                )));
            }
            _ => {}
        }
    }
}

/// Attributes of a start tag in source order, with raw (still-escaped) values.
pub(crate) fn raw_attrs(e: &BytesStart<'_>) -> Result<Vec<(String, String)>, SvgError> {
    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        attrs.push((
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            String::from_utf8_lossy(&attr.value).into_owned(),
        ));
    }
    Ok(attrs)
}

pub(crate) fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

/// Write `<name k="v" ...>`, or `<name k="v" ... />` when `empty`.
///
/// Values are emitted raw. A value still carrying a double quote from
/// single-quoted source markup gets single quotes back; rewritten values
/// always have `"` escaped, so they never take this branch.
pub(crate) fn push_start_tag(
    out: &mut String,
    name: &str,
    attrs: &[(String, String)],
    empty: bool,
) {
    out.push('<');
    out.push_str(name);
    for (key, value) in attrs {
        out.push(' ');
        out.push_str(key);
        out.push('=');
        if value.contains('"') {
            out.push('\'');
            out.push_str(value);
            out.push('\'');
        } else {
            out.push('"');
            out.push_str(value);
            out.push('"');
        }
    }
    if empty {
        out.push_str(" />");
    } else {
        out.push('>');
    }
}
