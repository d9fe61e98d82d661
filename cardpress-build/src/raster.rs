//! External rasterization: batched Inkscape invocation.
//!
//! Inkscape renders whole pages to PNG next to each SVG. It is invoked once
//! per batch rather than once per file (process startup dwarfs per-card cost
//! for small decks) and batches are sized against a memory budget, since
//! Inkscape holds every document of an invocation in memory at once.
//!
//! Batches run sequentially. The first non-zero exit aborts the run with the
//! process's combined stdout/stderr attached; there is no retry policy here.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::BuildError;

/// Default cap for one batch, in MiB.
pub const DEFAULT_MEMORY_BUDGET_MB: u64 = 512;

/// Budgeted fixed overhead of one rasterizer process.
const BATCH_OVERHEAD_BYTES: u64 = 32 * 1024 * 1024;
/// Budgeted peak memory per byte of SVG source. Rendered page buffers far
/// exceed the source text; 12x is a coarse upper estimate that keeps small
/// decks in one batch and splits poster-sized ones.
const SVG_COST_FACTOR: u64 = 12;

/// Well-known install locations probed before falling back to `PATH`.
pub const INKSCAPE_CANDIDATES: [&str; 2] = [
    "C:/Program Files/Inkscape/bin/inkscape.exe",
    "/Applications/Inkscape.app/Contents/MacOS/Inkscape",
];

/// Locate an Inkscape executable: first existing well-known install path,
/// else bare `inkscape` resolved through `PATH` at spawn time.
pub fn default_inkscape() -> PathBuf {
    for candidate in INKSCAPE_CANDIDATES {
        let path = Path::new(candidate);
        if path.exists() {
            return path.to_path_buf();
        }
    }
    PathBuf::from("inkscape")
}

/// How rasterization runs.
#[derive(Debug, Clone)]
pub struct RasterOptions {
    pub inkscape: PathBuf,
    /// Export resolution; `None` leaves Inkscape's default in place.
    pub dpi: Option<u32>,
    pub memory_budget_mb: u64,
}

impl Default for RasterOptions {
    fn default() -> Self {
        RasterOptions {
            inkscape: default_inkscape(),
            dpi: None,
            memory_budget_mb: DEFAULT_MEMORY_BUDGET_MB,
        }
    }
}

// ---------------------------------------------------------------------------
// 1. Batch planning
// ---------------------------------------------------------------------------

/// Greedily pack `(path, svg_size_bytes)` pairs into batches that stay under
/// the memory budget. Order is preserved. A file too big for the budget on
/// its own still gets a batch — batching bounds memory, it must never drop
/// work.
pub fn plan_batches(files: &[(PathBuf, u64)], memory_budget_mb: u64) -> Vec<Vec<PathBuf>> {
    let budget = memory_budget_mb.saturating_mul(1024 * 1024);
    let mut batches = Vec::new();
    let mut current: Vec<PathBuf> = Vec::new();
    let mut cost = BATCH_OVERHEAD_BYTES;

    for (path, size) in files {
        let file_cost = size.saturating_mul(SVG_COST_FACTOR);
        if !current.is_empty() && cost.saturating_add(file_cost) > budget {
            batches.push(std::mem::take(&mut current));
            cost = BATCH_OVERHEAD_BYTES;
        }
        current.push(path.clone());
        cost = cost.saturating_add(file_cost);
    }
    if !current.is_empty() {
        batches.push(current);
    }
    batches
}

// ---------------------------------------------------------------------------
// 2. Invocation
// ---------------------------------------------------------------------------

/// Rasterize one batch: whole-page PNG export for every listed SVG.
pub fn rasterize_batch(options: &RasterOptions, batch: &[PathBuf]) -> Result<(), BuildError> {
    let mut cmd = Command::new(&options.inkscape);
    cmd.arg("--export-area-page").arg("--export-type=png");
    if let Some(dpi) = options.dpi {
        cmd.arg(format!("--export-dpi={dpi}"));
    }
    cmd.args(batch);

    tracing::info!("rasterizing {} file(s)", batch.len());
    let output = cmd.output().map_err(|e| BuildError::RasterLaunch {
        program: options.inkscape.clone(),
        source: e,
    })?;

    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(BuildError::RasterFailed {
            status: output.status,
            output: combined,
        });
    }
    Ok(())
}

/// Plan batches for `files` and run them in order. Returns the batch count.
pub fn rasterize_all(
    options: &RasterOptions,
    files: &[(PathBuf, u64)],
) -> Result<usize, BuildError> {
    let batches = plan_batches(files, options.memory_budget_mb);
    for batch in &batches {
        rasterize_batch(options, batch)?;
    }
    Ok(batches.len())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
