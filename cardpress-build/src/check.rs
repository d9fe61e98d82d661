//! Deck checking: a writes-nothing pass that reports every row's fate.
//!
//! `check_deck` pushes each row through the same template loading, binding,
//! toggling and expansion a real build performs, but touches no files and
//! keeps going after a row fails, so one report covers the whole deck. On
//! top of the hard verdicts it collects advisory notes for things a build
//! accepts silently: layer directives that touch nothing, cross-references
//! that resolve to no card, multi-copy cards that shadow their own name.

use std::path::Path;

use cardpress_core::{CardId, CardName, Table, TemplateName};
use cardpress_svg::TemplateStore;

use crate::instantiate::{instantiate_row, RowOutcome};
use crate::registry::CardRegistry;

// ---------------------------------------------------------------------------
// 1. Report types
// ---------------------------------------------------------------------------

/// Hard verdict for one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowStatus {
    /// The row binds, toggles and expands cleanly.
    Ready,
    /// An earlier row already claimed this display name; a build skips it.
    DuplicateName,
    /// The row cannot build; the message is the error a build would report.
    Failed(String),
}

/// One checked row.
#[derive(Debug)]
pub struct RowCheck {
    /// CSV line the row came from.
    pub line: u64,
    pub name: CardName,
    pub template: TemplateName,
    pub copies: u32,
    pub status: RowStatus,
    /// Advisory findings; none of these fail a build.
    pub notes: Vec<String>,
}

/// Whole-deck verdict, one entry per data row in deck order.
#[derive(Debug, Default)]
pub struct CheckReport {
    pub rows: Vec<RowCheck>,
}

impl CheckReport {
    pub fn ready(&self) -> usize {
        self.count(|s| matches!(s, RowStatus::Ready))
    }

    pub fn duplicates(&self) -> usize {
        self.count(|s| matches!(s, RowStatus::DuplicateName))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, RowStatus::Failed(_)))
    }

    /// Total advisory notes across all rows.
    pub fn notes(&self) -> usize {
        self.rows.iter().map(|row| row.notes.len()).sum()
    }

    /// True when no row is outright broken. Duplicates and notes do not
    /// dirty a deck.
    pub fn is_clean(&self) -> bool {
        self.failed() == 0
    }

    fn count(&self, pred: impl Fn(&RowStatus) -> bool) -> usize {
        self.rows.iter().filter(|row| pred(&row.status)).count()
    }
}

// ---------------------------------------------------------------------------
// 2. The check pass
// ---------------------------------------------------------------------------

/// Check every row of `table` against the templates in `store`.
pub fn check_deck(table: &Table, store: &mut TemplateStore) -> CheckReport {
    let mut registry = CardRegistry::new();
    let mut report = CheckReport::default();

    // First pass: run the instantiation pipeline per row, capturing the
    // verdict instead of aborting. Registered identities feed pass two.
    for row in &table.rows {
        let mut notes = Vec::new();
        let status = match instantiate_row(row, store, &mut registry, Path::new("")) {
            Ok(RowOutcome::Expanded(expanded)) => {
                if expanded.directive_matches == Some(0) {
                    notes.push(format!(
                        "layer directive matches no layer in template '{}'",
                        row.template
                    ));
                }
                RowStatus::Ready
            }
            Ok(RowOutcome::SkippedDuplicate { .. }) => RowStatus::DuplicateName,
            Err(err) => RowStatus::Failed(err.to_string()),
        };
        report.rows.push(RowCheck {
            line: row.line,
            name: row.name.clone(),
            template: row.template.clone(),
            copies: row.copies,
            status,
            notes,
        });
    }

    // Second pass: cross-reference notes. These need the full registry, so
    // forward references still count as resolved.
    for (row, check) in table.rows.iter().zip(report.rows.iter_mut()) {
        if check.status != RowStatus::Ready {
            continue;
        }
        for (label, target) in [("back", row.back()), ("halo", row.halo())] {
            if let Some(target) = target {
                if registry.get(&CardId::from(target)).is_none() {
                    check.notes.push(format!(
                        "{label} reference '{target}' does not name a card in this deck"
                    ));
                }
            }
        }
        // A multi-copy card only registers suffixed identities, so the bare
        // name every default cross-reference uses finds nothing.
        if row.copies > 1 && matches!(row.name.as_str(), "Back" | "Halo") {
            check.notes.push(format!(
                "'{}' has {} copies; cross-references look up the bare name and will miss it",
                row.name, row.copies
            ));
        }
    }

    tracing::info!(
        "checked {} row(s): {} ready, {} duplicate, {} failed",
        report.rows.len(),
        report.ready(),
        report.duplicates(),
        report.failed()
    );
    report
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
