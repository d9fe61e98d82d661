//! Project configuration (`cardpress.yaml`).
//!
//! Every key is optional; the CLI fills in the gaps with its own defaults and
//! command-line flags always win over the file. A project that is happy with
//! the defaults needs no config file at all.
//!
//! ```yaml
//! data: decks/base_set.csv
//! templates: art/templates
//! output: build
//! inkscape: /usr/local/bin/inkscape
//! dpi: 300
//! memory_budget_mb: 1024
//! save_name: Base Set
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Conventional file name looked up in the working directory.
pub const CONFIG_FILE: &str = "cardpress.yaml";

/// Contents of a `cardpress.yaml`, all keys optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckConfig {
    /// Deck list CSV path.
    pub data: Option<PathBuf>,
    /// Directory holding `<Template>.svg` files.
    pub templates: Option<PathBuf>,
    /// Directory that receives generated SVG/PNG files and the manifest.
    pub output: Option<PathBuf>,
    /// Inkscape executable used for rasterization.
    pub inkscape: Option<PathBuf>,
    /// Export resolution passed to Inkscape as `--export-dpi`.
    pub dpi: Option<u32>,
    /// Upper bound for one rasterization batch, in MiB.
    pub memory_budget_mb: Option<u64>,
    /// `SaveName` written into the deck manifest.
    pub save_name: Option<String>,
}

/// Load a config file that must exist.
///
/// Used when the path came from an explicit `--config` flag: a typo there
/// should fail loudly, not silently fall back to defaults.
pub fn load_config(path: &Path) -> Result<DeckConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::NotFound {
            path: path.to_path_buf(),
        });
    }
    read_config(path)
}

/// Load `path` if it exists, otherwise return the all-defaults config.
///
/// Used for the conventional `cardpress.yaml` lookup where absence is the
/// common case.
pub fn load_config_if_present(path: &Path) -> Result<DeckConfig, ConfigError> {
    if !path.exists() {
        return Ok(DeckConfig::default());
    }
    read_config(path)
}

fn read_config(path: &Path) -> Result<DeckConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    // An empty file is a valid "all defaults" config.
    if contents.trim().is_empty() {
        return Ok(DeckConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
