//! Layer toggling: show/hide named layer groups in a bound document.
//!
//! A deck row's `Layers` cell carries a compact directive such as
//! `+common,-rare,-foil`. Each entry is a `+` (show) or `-` (hide) prefix
//! followed by a layer name. The toggler walks the document for groups
//! marked `inkscape:groupmode="layer"`, compares their `inkscape:label`
//! against the directive, and forces the matching groups' `style` to
//! `display:inline` or `display:none`.
//!
//! Directive entries that match nothing are ignored per-entry; only a
//! directive that matches *no* layer at all is worth a warning, which is the
//! caller's call to make via [`ToggleOutcome::matched`].

use std::collections::BTreeSet;

use crate::error::SvgError;
use crate::splice::{self, Rewrite};

/// Attribute marking a group as a layer.
pub const GROUPMODE_ATTR: &str = "inkscape:groupmode";
/// `GROUPMODE_ATTR` value identifying layer groups.
pub const GROUPMODE_LAYER: &str = "layer";
/// Attribute carrying the author-visible layer name.
pub const LABEL_ATTR: &str = "inkscape:label";

/// Style forced onto layers in the show-set.
pub const STYLE_SHOW: &str = "display:inline";
/// Style forced onto layers in the hide-set.
pub const STYLE_HIDE: &str = "display:none";

// ---------------------------------------------------------------------------
// 1. Directive parsing
// ---------------------------------------------------------------------------

/// Parsed `Layers` cell: disjoint show/hide name sets.
///
/// When one name appears with both prefixes the last entry wins, keeping the
/// sets disjoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerDirective {
    show: BTreeSet<String>,
    hide: BTreeSet<String>,
}

impl LayerDirective {
    /// Parse a comma-separated directive string. Blank entries are skipped;
    /// an entry without a `+`/`-` prefix is fatal.
    pub fn parse(directive: &str) -> Result<LayerDirective, SvgError> {
        let mut parsed = LayerDirective::default();
        for raw in directive.split(',') {
            let entry = raw.trim();
            if entry.is_empty() {
                continue;
            }
            if let Some(name) = entry.strip_prefix('+') {
                let name = name.trim().to_string();
                parsed.hide.remove(&name);
                parsed.show.insert(name);
            } else if let Some(name) = entry.strip_prefix('-') {
                let name = name.trim().to_string();
                parsed.show.remove(&name);
                parsed.hide.insert(name);
            } else {
                return Err(SvgError::BadLayerPrefix {
                    entry: entry.to_string(),
                });
            }
        }
        Ok(parsed)
    }

    pub fn is_empty(&self) -> bool {
        self.show.is_empty() && self.hide.is_empty()
    }

    /// The style a layer with this label should be forced to, if any.
    fn style_for(&self, label: &str) -> Option<&'static str> {
        if self.show.contains(label) {
            Some(STYLE_SHOW)
        } else if self.hide.contains(label) {
            Some(STYLE_HIDE)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Toggling
// ---------------------------------------------------------------------------

/// Result of one toggling pass.
pub struct ToggleOutcome {
    /// Document with matching layers' style rewritten.
    pub svg: String,
    /// Number of layer groups the directive touched.
    pub matched: usize,
}

/// Force visibility on every layer group the directive names.
///
/// Layers the directive does not mention keep whatever `style` they carry;
/// matched layers get their whole `style` attribute replaced (or appended if
/// absent).
pub fn toggle_layers(
    document: &str,
    directive: &LayerDirective,
) -> Result<ToggleOutcome, SvgError> {
    if directive.is_empty() {
        return Ok(ToggleOutcome {
            svg: document.to_string(),
            matched: 0,
        });
    }

    let mut matched = 0usize;
    let svg = splice::rewrite_start_tags(document, |e, empty| {
        let mut attrs = splice::raw_attrs(e)?;
        if attr_value(&attrs, GROUPMODE_ATTR) != Some(GROUPMODE_LAYER) {
            return Ok(Rewrite::Keep);
        }
        let Some(label_raw) = attr_value(&attrs, LABEL_ATTR) else {
            return Ok(Rewrite::Keep);
        };
        let label = quick_xml::escape::unescape(label_raw)
            .map(|c| c.into_owned())
            .unwrap_or_else(|_| label_raw.to_string());
        let Some(style) = directive.style_for(&label) else {
            return Ok(Rewrite::Keep);
        };

        matched += 1;
        match attrs.iter().position(|(k, _)| k == "style") {
            Some(idx) => attrs[idx].1 = style.to_string(),
            None => attrs.push(("style".to_string(), style.to_string())),
        }
        let mut text = String::new();
        splice::push_start_tag(&mut text, &splice::tag_name(e), &attrs, empty);
        Ok(Rewrite::ReplaceTag(text))
    })?;

    Ok(ToggleOutcome { svg, matched })
}

fn attr_value<'a>(attrs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
