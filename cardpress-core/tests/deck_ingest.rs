//! Deck-list and config ingestion integration tests.
//! Exercises file-backed loading end to end: real CSV/YAML files in a tempdir.

use assert_fs::prelude::*;
use cardpress_core::{load_config, load_config_if_present, ConfigError, Table, TableError};
use rstest::rstest;
use std::path::PathBuf;

fn deck_file(dir: &assert_fs::TempDir, contents: &str) -> PathBuf {
    let child = dir.child("deck.csv");
    child.write_str(contents).expect("write deck");
    child.path().to_path_buf()
}

// ---------------------------------------------------------------------------
// 1. Deck list loading
// ---------------------------------------------------------------------------

#[test]
fn load_full_deck_with_reserved_columns() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let path = deck_file(
        &dir,
        "Card Name,Template,Copies,Layers,Back,Halo,Skip,Flavor\n\
         Goblin,minion,3,\"+common,-rare\",Goblin Back,,,Sneaky\n\
         Dragon,minion,1,,,Dragon Halo,x,Old\n",
    );

    let table = Table::load(&path).expect("load");
    assert_eq!(table.len(), 2);

    let goblin = &table.rows[0];
    assert_eq!(goblin.copies, 3);
    assert_eq!(goblin.layers(), Some("+common,-rare"));
    assert_eq!(goblin.back(), Some("Goblin Back"));
    assert_eq!(goblin.halo(), None);
    assert!(!goblin.skip());
    assert_eq!(goblin.get("Flavor"), Some("Sneaky"));

    let dragon = &table.rows[1];
    assert_eq!(dragon.back(), None);
    assert_eq!(dragon.halo(), Some("Dragon Halo"));
    assert!(dragon.skip());
}

#[rstest]
#[case("1", 1)]
#[case("2", 2)]
#[case(" 12 ", 12)]
fn copies_accepts_positive_integers(#[case] cell: &str, #[case] expected: u32) {
    let table = Table::parse(&format!("Card Name,Template,Copies\nGoblin,minion,{cell}\n"))
        .expect("parse");
    assert_eq!(table.rows[0].copies, expected);
}

#[rstest]
#[case("")]
#[case("0")]
#[case("-1")]
#[case("2.5")]
#[case("many")]
fn copies_rejects_non_positive_values(#[case] cell: &str) {
    let err = Table::parse(&format!("Card Name,Template,Copies\nGoblin,minion,{cell}\n"))
        .unwrap_err();
    assert!(matches!(err, TableError::BadCopies { line: 2, .. }), "got: {err}");
}

#[rstest]
#[case("Template,Copies\nminion,1\n", "Card Name")]
#[case("Card Name,Copies\nGoblin,1\n", "Template")]
#[case("Card Name,Template\nGoblin,minion\n", "Copies")]
fn each_required_column_is_enforced(#[case] csv: &str, #[case] missing: &str) {
    let err = Table::parse(csv).unwrap_err();
    match err {
        TableError::MissingColumn { column } => assert_eq!(column, missing),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn error_from_later_row_carries_its_line_number() {
    let err = Table::parse(
        "Card Name,Template,Copies\n\
         Goblin,minion,1\n\
         Dragon,minion,1\n\
         Imp,minion,zero\n",
    )
    .unwrap_err();
    assert!(matches!(err, TableError::BadCopies { line: 4, .. }), "got: {err}");
}

// ---------------------------------------------------------------------------
// 2. Config loading
// ---------------------------------------------------------------------------

#[test]
fn config_file_feeds_paths_and_numbers() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let cfg_file = dir.child("cardpress.yaml");
    cfg_file
        .write_str("data: decks/base.csv\ndpi: 150\n")
        .expect("write config");

    let cfg = load_config(cfg_file.path()).expect("load");
    assert_eq!(cfg.data, Some(PathBuf::from("decks/base.csv")));
    assert_eq!(cfg.dpi, Some(150));
    assert_eq!(cfg.output, None);
}

#[test]
fn explicit_config_path_must_exist() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let missing = dir.path().join("custom.yaml");
    let err = load_config(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound { .. }), "got: {err}");
    assert!(err.to_string().contains("custom.yaml"));
}

#[test]
fn conventional_config_lookup_tolerates_absence() {
    let dir = assert_fs::TempDir::new().expect("tempdir");
    let cfg = load_config_if_present(&dir.path().join("cardpress.yaml")).expect("load");
    assert_eq!(cfg, cardpress_core::DeckConfig::default());
}
