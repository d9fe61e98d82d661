use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::str::contains;
use tempfile::TempDir;

const TEMPLATE: &str = "<svg>\n<text>{Card Name}</text>\n</svg>\n";

fn cardpress_cmd(root: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cardpress"));
    cmd.current_dir(root);
    cmd
}

fn scaffold(root: &TempDir, csv: &str) {
    let templates = root.path().join("templates");
    fs::create_dir_all(&templates).expect("create templates dir");
    fs::write(root.path().join("deck.csv"), csv).expect("write deck");
    fs::write(templates.join("minion.svg"), TEMPLATE).expect("write template");
}

#[test]
fn check_reports_ready_rows() {
    let root = TempDir::new().expect("root");
    scaffold(
        &root,
        "Card Name,Template,Copies\n\
         Goblin,minion,1\n\
         Fireball,minion,3\n",
    );

    cardpress_cmd(root.path())
        .args(["check"])
        .assert()
        .success()
        .stdout(contains("2 ready"))
        .stdout(contains("READY"));
}

#[test]
fn check_fails_when_a_row_cannot_build() {
    let root = TempDir::new().expect("root");
    scaffold(
        &root,
        "Card Name,Template,Copies\n\
         Goblin,ghost,1\n\
         Imp,minion,1\n",
    );

    cardpress_cmd(root.path())
        .args(["check"])
        .assert()
        .failure()
        .stdout(contains("FAILED"))
        .stdout(contains("READY"))
        .stderr(contains("1 of 2 row(s) cannot build"));
}

#[test]
fn check_notes_surface_dangling_references() {
    let root = TempDir::new().expect("root");
    scaffold(
        &root,
        "Card Name,Template,Copies,Back\n\
         Goblin,minion,1,GhostBack\n",
    );

    cardpress_cmd(root.path())
        .args(["check"])
        .assert()
        .success()
        .stdout(contains("note: Goblin"))
        .stdout(contains("GhostBack"));
}

#[test]
fn check_json_schema_is_stable() {
    let root = TempDir::new().expect("root");
    scaffold(
        &root,
        "Card Name,Template,Copies\n\
         Goblin,minion,1\n\
         Goblin,minion,2\n",
    );

    let assert = cardpress_cmd(root.path())
        .args(["check", "--json"])
        .assert()
        .success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8");
    let payload: serde_json::Value = serde_json::from_str(&stdout).expect("parse check json");

    let top_keys: BTreeSet<String> = payload
        .as_object()
        .expect("check root object")
        .keys()
        .cloned()
        .collect();
    let expected_top: BTreeSet<String> =
        ["summary", "rows"].into_iter().map(str::to_string).collect();
    assert_eq!(top_keys, expected_top, "check root schema changed");

    let summary_keys: BTreeSet<String> = payload["summary"]
        .as_object()
        .expect("summary object")
        .keys()
        .cloned()
        .collect();
    let expected_summary: BTreeSet<String> = ["rows", "ready", "duplicates", "failed", "notes"]
        .into_iter()
        .map(str::to_string)
        .collect();
    assert_eq!(summary_keys, expected_summary, "summary schema changed");

    let rows = payload["rows"].as_array().expect("rows array");
    assert_eq!(rows.len(), 2);
    let expected_row_fields: BTreeSet<String> =
        ["line", "card", "template", "copies", "status", "detail", "notes"]
            .into_iter()
            .map(str::to_string)
            .collect();
    for row in rows {
        let keys: BTreeSet<String> = row.as_object().expect("row object").keys().cloned().collect();
        assert_eq!(keys, expected_row_fields, "check row schema changed");
    }

    assert_eq!(rows[0]["status"].as_str(), Some("ready"));
    assert_eq!(rows[1]["status"].as_str(), Some("duplicate"));
    assert_eq!(payload["summary"]["failed"].as_u64(), Some(0));
}

#[test]
fn diff_shows_pending_changes_then_reads_clean() {
    let root = TempDir::new().expect("root");
    scaffold(&root, "Card Name,Template,Copies\nGoblin,minion,1\n");

    let assert = cardpress_cmd(root.path())
        .args(["diff"])
        .assert()
        .success()
        .stdout(contains("+++ b/Goblin.svg"));
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).expect("stdout utf8");
    assert!(
        stdout
            .lines()
            .any(|line| line.starts_with('+') && line.contains("<text>Goblin</text>")),
        "expected an added line for the unbuilt card"
    );

    cardpress_cmd(root.path())
        .args(["build", "--no-render"])
        .assert()
        .success();

    cardpress_cmd(root.path())
        .args(["diff"])
        .assert()
        .success()
        .stdout(contains("No differences"));
}

#[test]
fn diff_ignores_manifest_date_churn() {
    let root = TempDir::new().expect("root");
    scaffold(&root, "Card Name,Template,Copies\nGoblin,minion,1\n");

    cardpress_cmd(root.path())
        .args(["build", "--no-render"])
        .assert()
        .success();

    // A later build rewrites the manifest date; the diff must stay clean.
    cardpress_cmd(root.path())
        .args(["build", "--no-render"])
        .assert()
        .success();
    cardpress_cmd(root.path())
        .args(["diff"])
        .assert()
        .success()
        .stdout(contains("No differences"));
}
