//! # cardpress-build
//!
//! Deck builds: row instantiation, hash-gated atomic card writes, the deck
//! manifest, and batched rasterization.
//!
//! Call [`build_deck`] to run the whole pipeline, [`check_deck`] for a
//! writes-nothing deck report, or [`deck_diff`] to see what a build would
//! change.

pub mod check;
pub mod diff;
pub mod error;
pub mod hash_store;
pub mod instantiate;
pub mod manifest;
pub mod pipeline;
pub mod raster;
pub mod registry;
pub mod writer;

pub use check::{check_deck, CheckReport, RowCheck, RowStatus};
pub use diff::{deck_diff, DeckDiffResult, FileDiff};
pub use error::BuildError;
pub use instantiate::{instantiate_row, ExpandedRow, RowOutcome};
pub use manifest::{resolve_manifest, DeckManifest, MANIFEST_FILE};
pub use pipeline::{build_deck, BuildOptions, BuildPaths, BuildReport};
pub use raster::{default_inkscape, RasterOptions, DEFAULT_MEMORY_BUDGET_MB};
pub use registry::{CardInstance, CardRegistry};
pub use writer::WriteResult;
