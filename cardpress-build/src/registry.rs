//! Card registry: every instantiated card, in deck order.
//!
//! The registry is the bridge between instantiation and cross-reference
//! resolution. Insertion order is a contract: the manifest walks the registry
//! front to back and hands out placement coordinates as it goes, so deck-list
//! order determines stacking order downstream.
//!
//! Two levels of uniqueness apply:
//! - **Card Name** — a repeated name means a repeated deck-list row; the row
//!   is skipped with a warning (the caller checks [`CardRegistry::seen`]).
//! - **Identity** — the copy-numbered key (`Goblin_2`). A collision here is
//!   fatal, since identities double as output file names.

use std::collections::{BTreeSet, HashMap};
use std::path::PathBuf;

use cardpress_core::{CardId, CardName, Row};

use crate::error::BuildError;

// ---------------------------------------------------------------------------
// 1. Card instance
// ---------------------------------------------------------------------------

/// One physical output unit: a single renderable card file.
#[derive(Debug, Clone)]
pub struct CardInstance {
    /// Unique identity; also the output file stem.
    pub id: CardId,
    /// Display name shared by all copies from one row.
    pub name: CardName,
    /// 1-based copy index, `None` when the row asked for a single copy.
    pub copy: Option<u32>,
    /// The deck-list row this instance came from.
    pub row: Row,
    /// Where the bound SVG document is written.
    pub svg_path: PathBuf,
}

impl CardInstance {
    /// The rasterized image path: same location, `.png` extension.
    pub fn png_path(&self) -> PathBuf {
        self.svg_path.with_extension("png")
    }
}

// ---------------------------------------------------------------------------
// 2. Registry
// ---------------------------------------------------------------------------

/// Insertion-ordered identity→instance map plus the seen-name set used for
/// duplicate-row detection.
#[derive(Debug, Default)]
pub struct CardRegistry {
    entries: Vec<CardInstance>,
    index: HashMap<CardId, usize>,
    seen_names: BTreeSet<CardName>,
}

impl CardRegistry {
    pub fn new() -> Self {
        CardRegistry::default()
    }

    /// Has a row with this display name already been instantiated?
    pub fn seen(&self, name: &CardName) -> bool {
        self.seen_names.contains(name)
    }

    /// Insert one instance, keyed by identity, and mark its name as seen.
    pub fn register(&mut self, instance: CardInstance) -> Result<(), BuildError> {
        if self.index.contains_key(&instance.id) {
            return Err(BuildError::DuplicateIdentity {
                identity: instance.id.clone(),
            });
        }
        self.seen_names.insert(instance.name.clone());
        self.index.insert(instance.id.clone(), self.entries.len());
        self.entries.push(instance);
        Ok(())
    }

    /// Instance by identity. Cross-references (`Back`, `Halo`) resolve here.
    pub fn get(&self, id: &CardId) -> Option<&CardInstance> {
        self.index.get(id).map(|&at| &self.entries[at])
    }

    /// All instances in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &CardInstance> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use cardpress_core::Table;

    fn instance(id: &str, name: &str, copy: Option<u32>) -> CardInstance {
        let table = Table::parse(&format!("Card Name,Template,Copies\n{name},minion,1\n"))
            .expect("parse");
        CardInstance {
            id: CardId::from(id),
            name: CardName::from(name),
            copy,
            row: table.rows.into_iter().next().expect("row"),
            svg_path: PathBuf::from(format!("/out/{id}.svg")),
        }
    }

    #[test]
    fn register_then_get_by_identity() {
        let mut registry = CardRegistry::new();
        registry.register(instance("Goblin_1", "Goblin", Some(1))).expect("register");
        registry.register(instance("Goblin_2", "Goblin", Some(2))).expect("register");

        let found = registry.get(&CardId::from("Goblin_2")).expect("get");
        assert_eq!(found.copy, Some(2));
        assert!(registry.get(&CardId::from("Goblin_3")).is_none());
    }

    #[test]
    fn iteration_preserves_insertion_order() {
        let mut registry = CardRegistry::new();
        for id in ["Zebra", "Apple", "Mango"] {
            registry.register(instance(id, id, None)).expect("register");
        }
        let order: Vec<&str> = registry.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(order, ["Zebra", "Apple", "Mango"]);
    }

    #[test]
    fn registering_marks_the_name_seen() {
        let mut registry = CardRegistry::new();
        assert!(!registry.seen(&CardName::from("Goblin")));
        registry.register(instance("Goblin_1", "Goblin", Some(1))).expect("register");
        assert!(registry.seen(&CardName::from("Goblin")));
        assert!(!registry.seen(&CardName::from("Dragon")));
    }

    #[test]
    fn identity_collision_is_fatal() {
        let mut registry = CardRegistry::new();
        // "Goblin_1" can be reached both as a copy of "Goblin" and as a
        // literal card name; the seen-name check cannot catch that.
        registry.register(instance("Goblin_1", "Goblin", Some(1))).expect("register");
        let err = registry.register(instance("Goblin_1", "Goblin_1", None)).unwrap_err();
        assert!(matches!(err, BuildError::DuplicateIdentity { .. }), "got: {err}");
    }

    #[test]
    fn png_path_swaps_the_extension() {
        let card = instance("Imp", "Imp", None);
        assert_eq!(card.png_path(), PathBuf::from("/out/Imp.png"));
    }
}
