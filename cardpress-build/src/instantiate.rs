//! Card instantiation: one deck row → zero-or-more registered instances.
//!
//! Per-row protocol:
//!
//! 1. Duplicate display name already registered → skip the row, warn.
//! 2. Pull the row's template from the store.
//! 3. Bind row values (structural pass, then free-text pass).
//! 4. Apply the row's layer directive, if any; a directive matching no layer
//!    at all gets a warning, not an error.
//! 5. Expand to `Copies` instances with copy-numbered identities and register
//!    each one.
//!
//! Binder and toggler failures abort the whole run. The only row-local
//! recoverable condition is the duplicate name.

use std::path::Path;

use cardpress_core::{CardId, CardName, Row};
use cardpress_svg::{bind_document, toggle_layers, BindingContext, LayerDirective, TemplateStore};

use crate::error::BuildError;
use crate::registry::{CardInstance, CardRegistry};

/// Outcome of pushing one row through the instantiation pipeline.
#[derive(Debug)]
pub enum RowOutcome {
    /// The row produced instances, now registered.
    Expanded(ExpandedRow),
    /// A row with this display name was already processed; nothing happened.
    SkippedDuplicate { name: CardName },
}

/// The per-row artifacts the caller still has to persist.
#[derive(Debug)]
pub struct ExpandedRow {
    pub name: CardName,
    /// Finished document text, shared by every copy.
    pub document: String,
    /// Identities registered for this row, in copy order.
    pub identities: Vec<CardId>,
    /// How many layers the row's directive toggled; `None` when the row
    /// carries no directive.
    pub directive_matches: Option<usize>,
}

/// Drive one row through binding, toggling, expansion and registration.
///
/// Instances are registered with `<output_root>/<identity>.svg` paths; the
/// caller writes `document` to each of those paths afterwards.
pub fn instantiate_row(
    row: &Row,
    store: &mut TemplateStore,
    registry: &mut CardRegistry,
    output_root: &Path,
) -> Result<RowOutcome, BuildError> {
    if registry.seen(&row.name) {
        tracing::warn!("duplicate card name '{}' ignored", row.name);
        return Ok(RowOutcome::SkippedDuplicate {
            name: row.name.clone(),
        });
    }

    let template = store.load(&row.template)?;
    let ctx = BindingContext::from_row(row);
    let mut document = bind_document(template, &ctx)?;

    let mut directive_matches = None;
    if let Some(cell) = row.layers() {
        let directive = LayerDirective::parse(cell)?;
        let outcome = toggle_layers(&document, &directive)?;
        if !directive.is_empty() {
            if outcome.matched == 0 {
                tracing::warn!(
                    "layer directive '{}' matched no layer in template '{}'",
                    cell,
                    row.template
                );
            }
            directive_matches = Some(outcome.matched);
        }
        document = outcome.svg;
    }

    let mut identities = Vec::with_capacity(row.copies as usize);
    for copy in 1..=row.copies {
        let copy = (row.copies > 1).then_some(copy);
        let id = CardId::for_copy(&row.name, copy);
        let svg_path = output_root.join(format!("{id}.svg"));
        registry.register(CardInstance {
            id: id.clone(),
            name: row.name.clone(),
            copy,
            row: row.clone(),
            svg_path,
        })?;
        identities.push(id);
    }

    Ok(RowOutcome::Expanded(ExpandedRow {
        name: row.name.clone(),
        document,
        identities,
        directive_matches,
    }))
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
