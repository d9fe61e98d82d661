//! Hash store — SHA-256-based idempotency tracking for generated files.
//!
//! Persists a `HashStoreFile` JSON document at `<output>/.cardpress/hashes.json`.
//! Writes use the same atomic `.tmp` + rename pattern as the card files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{io_err, BuildError};

/// In-memory hash store: maps output file path strings to the SHA-256 hex
/// digest last written there.
pub type HashStore = HashMap<String, String>;

/// On-disk hash store payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HashStoreFile {
    pub built_at: DateTime<Utc>,
    pub files: HashStore,
}

/// `<output>/.cardpress/hashes.json`
pub fn store_path_at(output: &Path) -> PathBuf {
    output.join(".cardpress").join("hashes.json")
}

/// Load the hash store for an output directory.
///
/// Returns an empty store if the file does not yet exist.
pub fn load_at(output: &Path) -> Result<HashStoreFile, BuildError> {
    let path = store_path_at(output);
    if !path.exists() {
        return Ok(HashStoreFile {
            built_at: Utc::now(),
            files: HashMap::new(),
        });
    }
    let contents = std::fs::read_to_string(&path).map_err(|e| io_err(&path, e))?;
    Ok(serde_json::from_str(&contents)?)
}

/// Save the hash store atomically: `.tmp` sibling, then rename.
pub fn save_at(output: &Path, store: &HashStoreFile) -> Result<(), BuildError> {
    let path = store_path_at(output);
    let Some(dir) = path.parent() else {
        return Err(io_err(
            path,
            std::io::Error::other("invalid hash store path"),
        ));
    };
    std::fs::create_dir_all(dir).map_err(|e| io_err(dir, e))?;

    let json = serde_json::to_string_pretty(store)?;
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, &json).map_err(|e| io_err(&tmp, e))?;
    std::fs::rename(&tmp, &path).map_err(|e| io_err(&path, e))?;
    Ok(())
}
