//! `cardpress build` — write every card, the manifest, and fresh PNGs.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Args;

use cardpress_build::{
    build_deck, default_inkscape, BuildError, BuildOptions, BuildReport, RasterOptions,
    WriteResult, DEFAULT_MEMORY_BUDGET_MB,
};

use super::super::DeckArgs;

/// Arguments for `cardpress build`.
#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub deck: DeckArgs,

    /// Show what would be written without touching any files.
    #[arg(long)]
    pub dry_run: bool,

    /// Rewrite every card even when its stored hash matches.
    #[arg(long)]
    pub force: bool,

    /// Skip rasterization; leave PNGs as they are.
    #[arg(long)]
    pub no_render: bool,

    /// Skip the deck manifest.
    #[arg(long)]
    pub no_manifest: bool,

    /// Inkscape executable (default: a well-known install location,
    /// then `PATH`).
    #[arg(long, value_name = "PATH")]
    pub inkscape: Option<PathBuf>,

    /// Export resolution handed to Inkscape.
    #[arg(long, value_name = "DPI")]
    pub dpi: Option<u32>,

    /// Memory budget for one rasterization batch, in MiB.
    #[arg(long, value_name = "MIB")]
    pub memory_budget: Option<u64>,

    /// `SaveName` recorded in the manifest.
    #[arg(long, value_name = "NAME")]
    pub save_name: Option<String>,
}

impl BuildArgs {
    pub fn run(self) -> Result<()> {
        let (config, paths) = self.deck.resolve()?;

        let mut options = BuildOptions::new(paths);
        options.dry_run = self.dry_run;
        options.force = self.force;
        options.render = !self.no_render;
        options.manifest = !self.no_manifest;
        options.raster = RasterOptions {
            inkscape: self
                .inkscape
                .or(config.inkscape)
                .unwrap_or_else(default_inkscape),
            dpi: self.dpi.or(config.dpi),
            memory_budget_mb: self
                .memory_budget
                .or(config.memory_budget_mb)
                .unwrap_or(DEFAULT_MEMORY_BUDGET_MB),
        };
        if let Some(name) = self.save_name.or(config.save_name) {
            options.save_name = name;
        }

        let report = match build_deck(&options) {
            Ok(report) => report,
            Err(err) => {
                // A rasterizer failure exits with Inkscape's own status.
                if let BuildError::RasterFailed { status, .. } = &err {
                    eprintln!("error: {err}");
                    process::exit(status.code().unwrap_or(1));
                }
                return Err(err).with_context(|| {
                    format!("build failed for '{}'", options.paths.data.display())
                });
            }
        };
        print_report(&report, self.dry_run);
        Ok(())
    }
}

fn print_report(report: &BuildReport, dry_run: bool) {
    let prefix = if dry_run { "[dry-run] " } else { "" };
    let written = report
        .writes
        .iter()
        .filter(|r| {
            matches!(
                r,
                WriteResult::Written { .. } | WriteResult::WouldWrite { .. }
            )
        })
        .count();
    let unchanged = report
        .writes
        .iter()
        .filter(|r| matches!(r, WriteResult::Unchanged { .. }))
        .count();

    println!(
        "{prefix}✓ {} card(s) built ({} written, {} unchanged)",
        report.cards, written, unchanged
    );

    for r in &report.writes {
        match r {
            WriteResult::Written { path } => println!("  ✎  {}", path.display()),
            WriteResult::WouldWrite { path } => println!("  ~  {}", path.display()),
            WriteResult::Unchanged { path } => println!("  ·  {}", path.display()),
        }
    }

    for name in &report.skipped_duplicates {
        println!("  !  duplicate row skipped: {name}");
    }

    if report.rasterized > 0 {
        println!(
            "{prefix}✓ rasterized {} file(s) in {} batch(es)",
            report.rasterized, report.batches
        );
    }
}
