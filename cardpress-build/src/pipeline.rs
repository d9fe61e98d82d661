//! Shared build pipeline entrypoint used by the CLI.
//!
//! `build_deck` runs the full deck build:
//!
//! 1. Parse the deck CSV.
//! 2. Instantiate every row: bind, toggle, expand, register.
//! 3. Write one SVG per instance with hash-gated atomic writes.
//! 4. Resolve cross-references and write the deck manifest.
//! 5. Persist the hash store.
//! 6. Rasterize the cards that need a fresh PNG, in memory-bounded batches.
//!
//! The hash store is saved before rasterization so a failed Inkscape run
//! never loses the record of what was written.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::Utc;

use cardpress_core::{CardName, Table};
use cardpress_svg::TemplateStore;

use crate::error::{io_err, BuildError};
use crate::hash_store::{self, HashStore, HashStoreFile};
use crate::instantiate::{instantiate_row, RowOutcome};
use crate::manifest::{manifest_json, resolve_manifest, MANIFEST_FILE};
use crate::raster::{rasterize_all, RasterOptions};
use crate::registry::CardRegistry;
use crate::writer::{atomic_write, WriteResult};

// ---------------------------------------------------------------------------
// 1. Options
// ---------------------------------------------------------------------------

/// Where a build reads from and writes to.
#[derive(Debug, Clone)]
pub struct BuildPaths {
    /// Deck list CSV.
    pub data: PathBuf,
    /// Directory holding `<Template>.svg` files.
    pub templates: PathBuf,
    /// Directory that receives card files and the manifest.
    pub output: PathBuf,
}

/// Everything a build run needs to know.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub paths: BuildPaths,
    /// Report what would be written without touching the filesystem.
    pub dry_run: bool,
    /// Ignore stored hashes and rewrite every card.
    pub force: bool,
    /// Run the rasterizer after writing.
    pub render: bool,
    pub raster: RasterOptions,
    /// Write the deck manifest alongside the cards.
    pub manifest: bool,
    /// `SaveName` recorded in the manifest.
    pub save_name: String,
}

impl BuildOptions {
    pub fn new(paths: BuildPaths) -> Self {
        BuildOptions {
            paths,
            dry_run: false,
            force: false,
            render: true,
            raster: RasterOptions::default(),
            manifest: true,
            save_name: "Deck".to_string(),
        }
    }
}

/// Outcome of building a deck.
#[derive(Debug)]
pub struct BuildReport {
    /// Per-file write outcomes: one per card instance, plus the manifest.
    pub writes: Vec<WriteResult>,
    /// Display names of rows dropped as duplicates, in deck order.
    pub skipped_duplicates: Vec<CardName>,
    /// Registered card instances.
    pub cards: usize,
    /// SVG files handed to the rasterizer.
    pub rasterized: usize,
    /// Rasterizer invocations.
    pub batches: usize,
    /// Manifest location, when manifest output is enabled.
    pub manifest_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// 2. The build
// ---------------------------------------------------------------------------

/// Build the whole deck described by `options`.
pub fn build_deck(options: &BuildOptions) -> Result<BuildReport, BuildError> {
    let built_at = Utc::now();
    let paths = &options.paths;
    // Manifest URLs and hash-store keys both want absolute paths.
    let output = absolute(&paths.output)?;

    let csv = std::fs::read_to_string(&paths.data).map_err(|e| io_err(&paths.data, e))?;
    let table = Table::parse(&csv)?;
    tracing::info!(
        "building deck {} ({} row(s))",
        paths.data.display(),
        table.rows.len()
    );

    let mut store = TemplateStore::new(&paths.templates);
    let mut registry = CardRegistry::new();
    let mut hashes = if options.force {
        HashStoreFile {
            built_at,
            files: HashStore::new(),
        }
    } else {
        hash_store::load_at(&output)?
    };

    let mut writes = Vec::new();
    let mut skipped_duplicates = Vec::new();

    for row in &table.rows {
        match instantiate_row(row, &mut store, &mut registry, &output)? {
            RowOutcome::SkippedDuplicate { name } => skipped_duplicates.push(name),
            RowOutcome::Expanded(expanded) => {
                for id in &expanded.identities {
                    let path = output.join(format!("{id}.svg"));
                    let result =
                        atomic_write(&path, &expanded.document, &mut hashes.files, options.dry_run)?;
                    writes.push(result);
                }
            }
        }
    }

    let mut manifest_path = None;
    if options.manifest {
        let manifest = resolve_manifest(&registry, &options.save_name, built_at);
        let json = manifest_json(&manifest)?;
        let path = output.join(MANIFEST_FILE);
        let result = atomic_write(&path, &json, &mut hashes.files, options.dry_run)?;
        writes.push(result);
        manifest_path = Some(path);
    }

    if !options.dry_run {
        hashes.built_at = built_at;
        hash_store::save_at(&output, &hashes)?;
    }

    let (rasterized, batches) = if options.render && !options.dry_run {
        let files = raster_candidates(&registry, &writes)?;
        let batches = rasterize_all(&options.raster, &files)?;
        (files.len(), batches)
    } else {
        (0, 0)
    };

    tracing::info!(
        "deck built: {} card(s), {} rasterized in {} batch(es)",
        registry.len(),
        rasterized,
        batches
    );

    Ok(BuildReport {
        writes,
        skipped_duplicates,
        cards: registry.len(),
        rasterized,
        batches,
        manifest_path,
    })
}

/// Cards that need a fresh PNG: everything written this run, plus unchanged
/// cards whose PNG is missing (deleted, or a previous rasterization failed).
fn raster_candidates(
    registry: &CardRegistry,
    writes: &[WriteResult],
) -> Result<Vec<(PathBuf, u64)>, BuildError> {
    let written: HashSet<&Path> = writes
        .iter()
        .filter(|w| matches!(w, WriteResult::Written { .. }))
        .map(|w| w.path())
        .collect();

    let mut files = Vec::new();
    for card in registry.iter() {
        let svg = &card.svg_path;
        if written.contains(svg.as_path()) || !card.png_path().exists() {
            let size = std::fs::metadata(svg).map_err(|e| io_err(svg, e))?.len();
            files.push((svg.clone(), size));
        }
    }
    Ok(files)
}

fn absolute(path: &Path) -> Result<PathBuf, BuildError> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        let cwd = std::env::current_dir().map_err(|e| io_err(path, e))?;
        Ok(cwd.join(path))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::CardInstance;
    use cardpress_core::CardId;
    use std::fs;
    use tempfile::TempDir;

    const TEMPLATE: &str = "<svg>\n<text>{Card Name}</text>\n</svg>\n";

    struct Fixture {
        root: TempDir,
        options: BuildOptions,
    }

    fn fixture(csv: &str) -> Fixture {
        let root = TempDir::new().expect("tempdir");
        let data = root.path().join("deck.csv");
        let templates = root.path().join("templates");
        let output = root.path().join("build");
        fs::create_dir_all(&templates).expect("mkdir templates");
        fs::write(&data, csv).expect("write deck");
        fs::write(templates.join("minion.svg"), TEMPLATE).expect("write template");

        let mut options = BuildOptions::new(BuildPaths {
            data,
            templates,
            output,
        });
        options.render = false;
        Fixture { root, options }
    }

    fn written(report: &BuildReport) -> usize {
        report
            .writes
            .iter()
            .filter(|w| matches!(w, WriteResult::Written { .. }))
            .count()
    }

    fn unchanged(report: &BuildReport) -> usize {
        report
            .writes
            .iter()
            .filter(|w| matches!(w, WriteResult::Unchanged { .. }))
            .count()
    }

    #[test]
    fn first_build_writes_cards_and_manifest() {
        let fx = fixture(
            "Card Name,Template,Copies\n\
             Goblin,minion,1\n\
             Fireball,minion,2\n",
        );
        let report = build_deck(&fx.options).expect("build");

        assert_eq!(report.cards, 3);
        assert_eq!(written(&report), 4, "3 cards + manifest");
        let output = &fx.options.paths.output;
        assert!(output.join("Goblin.svg").exists());
        assert!(output.join("Fireball_1.svg").exists());
        assert!(output.join("Fireball_2.svg").exists());
        assert!(output.join(MANIFEST_FILE).exists());
        assert!(hash_store::store_path_at(output).exists());

        let goblin = fs::read_to_string(output.join("Goblin.svg")).expect("read");
        assert_eq!(goblin, "<svg>\n<text>Goblin</text>\n</svg>\n");
    }

    #[test]
    fn second_build_leaves_cards_unchanged() {
        let fx = fixture("Card Name,Template,Copies\nGoblin,minion,1\n");
        build_deck(&fx.options).expect("first build");
        let report = build_deck(&fx.options).expect("second build");

        assert_eq!(unchanged(&report), 1, "card must be hash-gated");
        // The manifest embeds the build date, so it rewrites each run.
        assert_eq!(written(&report), 1);
    }

    #[test]
    fn force_rewrites_unchanged_cards() {
        let fx = fixture("Card Name,Template,Copies\nGoblin,minion,1\n");
        build_deck(&fx.options).expect("first build");

        let mut options = fx.options.clone();
        options.force = true;
        let report = build_deck(&options).expect("forced build");
        assert_eq!(unchanged(&report), 0);
        assert_eq!(written(&report), 2, "card + manifest");
    }

    #[test]
    fn dry_run_touches_nothing() {
        let fx = fixture("Card Name,Template,Copies\nGoblin,minion,1\n");
        let mut options = fx.options.clone();
        options.dry_run = true;

        let report = build_deck(&options).expect("dry run");
        assert!(report
            .writes
            .iter()
            .all(|w| matches!(w, WriteResult::WouldWrite { .. })));
        assert!(
            !options.paths.output.exists(),
            "dry run must not create the output directory"
        );
    }

    #[test]
    fn duplicate_rows_are_reported_not_built() {
        let fx = fixture(
            "Card Name,Template,Copies\n\
             Goblin,minion,1\n\
             Goblin,minion,3\n",
        );
        let report = build_deck(&fx.options).expect("build");
        assert_eq!(report.cards, 1);
        assert_eq!(report.skipped_duplicates, vec![CardName::from("Goblin")]);
    }

    #[test]
    fn manifest_can_be_disabled() {
        let fx = fixture("Card Name,Template,Copies\nGoblin,minion,1\n");
        let mut options = fx.options.clone();
        options.manifest = false;

        let report = build_deck(&options).expect("build");
        assert_eq!(report.manifest_path, None);
        assert!(!options.paths.output.join(MANIFEST_FILE).exists());
        assert_eq!(written(&report), 1, "just the card");
    }

    #[test]
    fn manifest_urls_are_absolute_file_urls() {
        let fx = fixture("Card Name,Template,Copies\nGoblin,minion,1\n");
        let report = build_deck(&fx.options).expect("build");

        let manifest_path = report.manifest_path.expect("manifest path");
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(manifest_path).expect("read"))
                .expect("parse manifest");
        let face = json["ObjectStates"][0]["FaceURL"].as_str().expect("FaceURL");
        assert!(face.starts_with("file:///"), "got: {face}");
        assert!(face.ends_with("Goblin.png"), "got: {face}");
    }

    #[test]
    fn raster_candidates_cover_written_and_missing_pngs() {
        let dir = TempDir::new().expect("tempdir");
        let mut registry = CardRegistry::new();
        let mut writes = Vec::new();
        let table = Table::parse(
            "Card Name,Template,Copies\n\
             A,minion,1\nB,minion,1\nC,minion,1\n",
        )
        .expect("parse");

        for (row, state) in table.rows.iter().zip(["written", "has png", "no png"]) {
            let svg_path = dir.path().join(format!("{}.svg", row.name));
            fs::write(&svg_path, "<svg/>").expect("write svg");
            if state == "has png" {
                fs::write(svg_path.with_extension("png"), "png").expect("write png");
            }
            if state == "written" {
                writes.push(WriteResult::Written {
                    path: svg_path.clone(),
                });
            } else {
                writes.push(WriteResult::Unchanged {
                    path: svg_path.clone(),
                });
            }
            registry
                .register(CardInstance {
                    id: CardId::from(row.name.as_str()),
                    name: row.name.clone(),
                    copy: None,
                    row: row.clone(),
                    svg_path,
                })
                .expect("register");
        }

        let files = raster_candidates(&registry, &writes).expect("candidates");
        let names: Vec<String> = files
            .iter()
            .map(|(p, _)| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["A.svg", "C.svg"]);
    }

    #[test]
    fn relative_paths_become_absolute() {
        let relative = absolute(Path::new("build/cards")).expect("absolute");
        assert!(relative.is_absolute());
        assert!(relative.ends_with("build/cards"));

        let already = absolute(Path::new("/srv/cards")).expect("absolute");
        assert_eq!(already, PathBuf::from("/srv/cards"));
    }

    #[test]
    fn missing_deck_csv_is_an_io_error() {
        let fx = fixture("Card Name,Template,Copies\nGoblin,minion,1\n");
        let mut options = fx.options.clone();
        options.paths.data = fx.root.path().join("nope.csv");

        let err = build_deck(&options).expect_err("must fail");
        assert!(matches!(err, BuildError::Io { .. }), "got: {err}");
    }
}
