//! Deck list ingestion.
//!
//! # Input shape
//!
//! ```text
//! Card Name,Template,Copies,Layers,Attack,Health
//! Goblin,minion,3,"+common,-rare",2,1
//! Dragon,minion,1,,9,9
//! ```
//!
//! The first record is the header. `Card Name`, `Template` and `Copies` must
//! be present; every other column is free-form deck data that templates can
//! reference by name (`{Attack}`) or by zero-based position (`{4}`).
//!
//! A handful of column names are reserved for the pipeline itself (`Layers`,
//! `Back`, `Halo`, `Skip`). They stay visible to templates like any other
//! column — reservation only means the pipeline also reads them.

use std::path::Path;

use crate::error::{table_io_err, TableError};
use crate::types::{CardName, TemplateName};

// ---------------------------------------------------------------------------
// 1. Column names
// ---------------------------------------------------------------------------

/// Header of the column holding the card's display name and identity stem.
pub const COL_CARD_NAME: &str = "Card Name";
/// Header of the column naming the SVG template (without `.svg`).
pub const COL_TEMPLATE: &str = "Template";
/// Header of the column holding the positive copy count.
pub const COL_COPIES: &str = "Copies";
/// Header of the optional layer-toggle directive column.
pub const COL_LAYERS: &str = "Layers";
/// Header of the optional back-reference column.
pub const COL_BACK: &str = "Back";
/// Header of the optional halo-reference column.
pub const COL_HALO: &str = "Halo";
/// Header of the optional skip-marker column.
pub const COL_SKIP: &str = "Skip";

/// Columns a deck list cannot be loaded without.
pub const REQUIRED_COLUMNS: [&str; 3] = [COL_CARD_NAME, COL_TEMPLATE, COL_COPIES];

// ---------------------------------------------------------------------------
// 2. Row
// ---------------------------------------------------------------------------

/// One deck-list record with its cells kept in CSV column order.
///
/// The order matters: templates may address cells positionally (`{0}` is the
/// first column), so cells are stored as an ordered list, not a map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based line number in the source file (header is line 1).
    pub line: u64,
    pub name: CardName,
    pub template: TemplateName,
    pub copies: u32,
    columns: Vec<(String, String)>,
}

impl Row {
    /// Cell value for a column header, `None` if the column doesn't exist.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Cell value by zero-based column position.
    pub fn get_index(&self, index: usize) -> Option<&str> {
        self.columns.get(index).map(|(_, value)| value.as_str())
    }

    /// All `(header, value)` pairs in CSV column order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &str)> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Number of columns in the record.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// The `Layers` directive, if the column exists and the cell is non-blank.
    pub fn layers(&self) -> Option<&str> {
        self.reserved(COL_LAYERS)
    }

    /// The `Back` cross-reference, if present and non-blank.
    pub fn back(&self) -> Option<&str> {
        self.reserved(COL_BACK)
    }

    /// The `Halo` cross-reference, if present and non-blank.
    pub fn halo(&self) -> Option<&str> {
        self.reserved(COL_HALO)
    }

    /// True when the `Skip` cell carries any non-blank value.
    ///
    /// There is no falsy vocabulary: `no` and `0` skip the card just as
    /// `yes` does. Leave the cell empty to build the card.
    pub fn skip(&self) -> bool {
        self.reserved(COL_SKIP).is_some()
    }

    fn reserved(&self, column: &str) -> Option<&str> {
        self.get(column)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }
}

// ---------------------------------------------------------------------------
// 3. Table
// ---------------------------------------------------------------------------

/// A parsed deck list: the header row plus every data row, in file order.
#[derive(Debug, Clone)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Read and parse a deck list from `path`.
    pub fn load(path: &Path) -> Result<Table, TableError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| table_io_err(path, e))?;
        Table::parse(&contents)
    }

    /// Parse a deck list from an in-memory CSV string.
    ///
    /// Validation performed here, so later stages can assume a well-formed
    /// table:
    /// - every required column is present in the header,
    /// - every record has exactly as many cells as the header,
    /// - every `Copies` cell parses as an integer >= 1.
    pub fn parse(contents: &str) -> Result<Table, TableError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(contents.as_bytes());

        let headers: Vec<String> =
            reader.headers()?.iter().map(str::to_string).collect();
        for required in REQUIRED_COLUMNS {
            if !headers.iter().any(|h| h == required) {
                return Err(TableError::MissingColumn {
                    column: required.to_string(),
                });
            }
        }

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or(0);
            let columns: Vec<(String, String)> = headers
                .iter()
                .cloned()
                .zip(record.iter().map(str::to_string))
                .collect();

            let row = Row {
                line,
                name: CardName::from(cell(&columns, COL_CARD_NAME)),
                template: TemplateName::from(cell(&columns, COL_TEMPLATE)),
                copies: parse_copies(line, &cell(&columns, COL_COPIES))?,
                columns,
            };
            rows.push(row);
        }

        Ok(Table { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn cell(columns: &[(String, String)], name: &str) -> String {
    columns
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.clone())
        .unwrap_or_default()
}

fn parse_copies(line: u64, value: &str) -> Result<u32, TableError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n >= 1 => Ok(n),
        _ => Err(TableError::BadCopies {
            line,
            value: value.to_string(),
        }),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
