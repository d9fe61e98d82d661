//! Error types for deck-list and configuration loading.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while reading or validating a deck list.
#[derive(Debug, Error)]
pub enum TableError {
    /// The CSV file could not be read from disk.
    #[error("failed to read deck list {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV payload itself is malformed (bad quoting, ragged rows, ...).
    #[error("malformed deck list: {0}")]
    Csv(#[from] csv::Error),

    /// A column the pipeline cannot work without is absent from the header.
    #[error("deck list is missing required column '{column}'")]
    MissingColumn { column: String },

    /// The `Copies` cell is not a positive integer.
    #[error("line {line}: invalid Copies value '{value}' (expected a positive integer)")]
    BadCopies { line: u64, value: String },
}

pub(crate) fn table_io_err(path: &Path, source: std::io::Error) -> TableError {
    TableError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Errors raised while loading a `cardpress.yaml` project file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML or has the wrong shape.
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An explicitly requested config file does not exist.
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },
}
