//! Core identifier types shared across the cardpress crates.
//!
//! Everything here is a thin newtype over `String`. The wrappers exist so a
//! card name, a template name and a generated card identity cannot be mixed
//! up at call sites, which matters once copies enter the picture: a deck row
//! named `Goblin` with three copies produces the identities `Goblin_1`,
//! `Goblin_2` and `Goblin_3`, and only `CardId` values are unique.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// 1. CardName
// ---------------------------------------------------------------------------

/// Human-facing card name, exactly as it appears in the `Card Name` column.
///
/// Names are compared verbatim. Two rows carrying the same name are a
/// duplicate, and the second row is dropped with a warning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardName(pub String);

impl CardName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CardName {
    fn from(s: String) -> Self {
        CardName(s)
    }
}

impl From<&str> for CardName {
    fn from(s: &str) -> Self {
        CardName(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// 2. TemplateName
// ---------------------------------------------------------------------------

/// Name of an SVG template, without directory or `.svg` extension.
///
/// The template store resolves `TemplateName("minion")` to
/// `<templates>/minion.svg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TemplateName(pub String);

impl TemplateName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for TemplateName {
    fn from(s: String) -> Self {
        TemplateName(s)
    }
}

impl From<&str> for TemplateName {
    fn from(s: &str) -> Self {
        TemplateName(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// 3. CardId
// ---------------------------------------------------------------------------

/// Identity of one generated card instance.
///
/// For a single-copy row this is the card name unchanged. For a multi-copy
/// row it is `<name>_<copy>` with copies numbered from 1. The identity doubles
/// as the output file stem: `CardId("Goblin_2")` becomes `Goblin_2.svg` and
/// later `Goblin_2.png`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardId(pub String);

impl CardId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build the identity for one copy of a named card.
    ///
    /// `copy` is `None` for rows with a single copy and `Some(n)` (1-based)
    /// when the row asked for more than one.
    pub fn for_copy(name: &CardName, copy: Option<u32>) -> Self {
        match copy {
            None => CardId(name.0.clone()),
            Some(n) => CardId(format!("{}_{}", name.0, n)),
        }
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CardId {
    fn from(s: String) -> Self {
        CardId(s)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        CardId(s.to_string())
    }
}
