//! Variable binding: one template × one row → one finished document.
//!
//! # Two substitution mechanisms
//!
//! 1. **Attribute-encoded** — an element whose `id` (or `inkscape:label`)
//!    value is wrapped in braces is a binding site. `<text id="{Attack}"/>`
//!    gets its text content replaced with the `Attack` cell and its marker
//!    attribute rewritten to the literal column name, `id="Attack"`.
//! 2. **Free-text** — after the structural pass has been serialized back to
//!    text, every remaining `{3}` / `{Attack}` token anywhere in the document
//!    is replaced with the matching cell. `{{` and `}}` produce literal
//!    braces.
//!
//! The order is load-bearing: the structural pass consumes its markers, so
//! nothing it touched is re-interpreted by the textual pass. Cell values
//! inserted structurally get their braces doubled for the same reason.
//!
//! Cell values are XML-escaped exactly once, when the [`BindingContext`] is
//! built. Both passes insert those escaped strings as-is.

use cardpress_core::Row;

use crate::error::SvgError;
use crate::splice::{self, Rewrite};

/// Attribute spellings probed for an attribute-encoded binding marker, in
/// precedence order. Hand-written templates use `id`; structured-editor
/// exports often put the author-visible name in `inkscape:label` instead.
pub const ID_ATTRS: [&str; 2] = ["id", "inkscape:label"];

// ---------------------------------------------------------------------------
// 1. Binding context
// ---------------------------------------------------------------------------

/// The key→value set one substitution pass resolves against: every column of
/// a row, addressable by name and by zero-based position, values pre-escaped
/// for markup.
#[derive(Debug, Clone)]
pub struct BindingContext {
    values: Vec<(String, String)>,
}

impl BindingContext {
    pub fn from_row(row: &Row) -> Self {
        BindingContext::from_pairs(row.columns())
    }

    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let values = pairs
            .into_iter()
            .map(|(name, value)| (name.to_string(), escape_value(value)))
            .collect();
        BindingContext { values }
    }

    /// Escaped value for a placeholder key.
    ///
    /// An all-digit key is a position (`{0}` is the first column), anything
    /// else is a column name, matched verbatim — no trimming, like the
    /// column lookup in a format string.
    pub fn resolve(&self, key: &str) -> Option<&str> {
        if let Ok(index) = key.parse::<usize>() {
            return self.values.get(index).map(|(_, v)| v.as_str());
        }
        self.values
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Escape a raw cell value for insertion into markup. Applied once, at
/// context construction.
pub fn escape_value(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

// ---------------------------------------------------------------------------
// 2. Full binding pass
// ---------------------------------------------------------------------------

/// Apply both substitution mechanisms, structural first.
pub fn bind_document(template: &str, ctx: &BindingContext) -> Result<String, SvgError> {
    let structural = bind_elements(template, ctx)?;
    format_text(&structural, ctx)
}

// ---------------------------------------------------------------------------
// 3. Attribute-encoded substitution
// ---------------------------------------------------------------------------

/// Structural pass only: rewrite every binding-marker element, leave all
/// other bytes untouched.
pub fn bind_elements(template: &str, ctx: &BindingContext) -> Result<String, SvgError> {
    splice::rewrite_start_tags(template, |e, empty| {
        let mut attrs = splice::raw_attrs(e)?;
        let Some((marker, key)) = marker_attr(&attrs) else {
            return Ok(Rewrite::Keep);
        };
        let value = ctx
            .resolve(&key)
            .ok_or_else(|| SvgError::UnboundVariable { name: key.clone() })?;

        // Consume the marker: the attribute becomes the literal column name.
        attrs[marker].1 = escape_value(&key);

        let name = splice::tag_name(e);
        let mut text = String::new();
        splice::push_start_tag(&mut text, &name, &attrs, false);
        text.push_str(&double_braces(value));
        if empty {
            text.push_str("</");
            text.push_str(&name);
            text.push('>');
        }
        Ok(Rewrite::ReplaceElement(text))
    })
}

/// Find the first identity attribute whose value is `{...}`-wrapped.
/// Returns the attribute's position and the unescaped key inside the braces.
fn marker_attr(attrs: &[(String, String)]) -> Option<(usize, String)> {
    for id_attr in ID_ATTRS {
        let Some(idx) = attrs.iter().position(|(k, _)| k == id_attr) else {
            continue;
        };
        let raw = attrs[idx].1.as_str();
        if raw.len() < 3 || !raw.starts_with('{') || !raw.ends_with('}') {
            continue;
        }
        let inner = &raw[1..raw.len() - 1];
        let key = quick_xml::escape::unescape(inner)
            .map(|c| c.into_owned())
            .unwrap_or_else(|_| inner.to_string());
        return Some((idx, key));
    }
    None
}

/// Protect literal braces in structurally-inserted text from the later
/// free-text pass.
fn double_braces(value: &str) -> String {
    value.replace('{', "{{").replace('}', "}}")
}

// ---------------------------------------------------------------------------
// 4. Free-text substitution
// ---------------------------------------------------------------------------

/// Textual pass: resolve every `{key}` token in `text`, un-double `{{`/`}}`.
///
/// Inserted values are not re-scanned, so a cell containing braces comes out
/// literally. A lone brace is [`SvgError::UnbalancedBrace`]; a key the
/// context cannot resolve is [`SvgError::UnboundVariable`].
pub fn format_text(text: &str, ctx: &BindingContext) -> Result<String, SvgError> {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.char_indices().peekable();

    while let Some((at, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut key = String::new();
                let mut closed = false;
                for (_, k) in chars.by_ref() {
                    match k {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(unbalanced(text, at)),
                        _ => key.push(k),
                    }
                }
                if !closed {
                    return Err(unbalanced(text, at));
                }
                let value = ctx
                    .resolve(&key)
                    .ok_or(SvgError::UnboundVariable { name: key })?;
                out.push_str(value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                    continue;
                }
                return Err(unbalanced(text, at));
            }
            _ => out.push(c),
        }
    }
    Ok(out)
}

fn unbalanced(text: &str, at: usize) -> SvgError {
    let snippet: String = text[at..].chars().take(24).collect();
    SvgError::UnbalancedBrace { snippet }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
