//! Dry-run unified diff support for `cardpress diff`.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use similar::TextDiff;

use cardpress_core::Table;
use cardpress_svg::TemplateStore;

use crate::{
    error::{io_err, BuildError},
    instantiate::{instantiate_row, RowOutcome},
    registry::CardRegistry,
};

/// A single card document diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub path: PathBuf,
    pub unified_diff: String,
}

/// Diff result for a deck.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeckDiffResult {
    /// Cards whose on-disk content differs from a fresh render.
    pub diffs: Vec<FileDiff>,
    /// How many card documents were compared in total.
    pub cards: usize,
}

/// Render what `build` would generate and compare it against the current
/// content under `output`. Only card documents take part; the manifest
/// carries a build timestamp and would never compare clean.
///
/// No files are written. A row a build would reject fails the diff the same
/// way.
pub fn deck_diff(
    table: &Table,
    store: &mut TemplateStore,
    output: &Path,
) -> Result<DeckDiffResult, BuildError> {
    let mut registry = CardRegistry::new();
    let mut diffs = Vec::new();
    let mut cards = 0;

    for row in &table.rows {
        let RowOutcome::Expanded(expanded) =
            instantiate_row(row, store, &mut registry, output)?
        else {
            continue;
        };

        let rendered = normalize_line_endings(&expanded.document);
        for id in &expanded.identities {
            cards += 1;
            let path = output.join(format!("{id}.svg"));
            let existing = read_existing_or_empty(&path)?;
            if existing == rendered {
                continue;
            }

            let relative = path.strip_prefix(output).unwrap_or(path.as_path());
            let old_header = format!("a/{}", relative.display());
            let new_header = format!("b/{}", relative.display());
            let unified = TextDiff::from_lines(&existing, &rendered)
                .unified_diff()
                .header(&old_header, &new_header)
                .context_radius(3)
                .to_string();

            diffs.push(FileDiff {
                path,
                unified_diff: unified,
            });
        }
    }

    Ok(DeckDiffResult { diffs, cards })
}

fn read_existing_or_empty(path: &Path) -> Result<String, BuildError> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(normalize_line_endings(&content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(String::new()),
        Err(err) => Err(io_err(path, err)),
    }
}

fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n")
}
