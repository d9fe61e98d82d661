//! Error types for the deck build pipeline.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use cardpress_core::error::TableError;
use cardpress_core::CardId;
use cardpress_svg::SvgError;

/// All errors that can arise while building a deck.
#[derive(Debug, Error)]
pub enum BuildError {
    /// An error from deck-list ingestion.
    #[error("deck list error: {0}")]
    Table(#[from] TableError),

    /// An error from template loading, binding or layer toggling.
    #[error("template error: {0}")]
    Svg(#[from] SvgError),

    /// An I/O error, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization error (hash store, manifest).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two rows produced the same card identity. Distinct from a duplicate
    /// *name* (which is skipped): identities become file names and manifest
    /// keys, so a collision would silently overwrite a card.
    #[error("duplicate card identity '{identity}'")]
    DuplicateIdentity { identity: CardId },

    /// The rasterizer executable could not be started at all.
    #[error("failed to launch rasterizer '{program}': {source}")]
    RasterLaunch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The rasterizer ran and exited non-zero; `output` is its combined
    /// stdout and stderr.
    #[error("rasterizer failed ({status}):\n{output}")]
    RasterFailed { status: ExitStatus, output: String },
}

/// Convenience constructor for [`BuildError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> BuildError {
    BuildError::Io {
        path: path.into(),
        source,
    }
}
